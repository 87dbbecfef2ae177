//! Workspace root package. Exists to host repo-wide dev tooling
//! (cargo-husky git hooks); all functionality lives in `crates/*`.
