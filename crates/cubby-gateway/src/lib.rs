//! Session Request Gateway.
//!
//! Thin request/response calls to the locker backend: begin a deposit for an
//! email address, submit a PIN to unlock, and fetch the current locker
//! snapshot. The gateway never touches session state — callers receive a
//! typed success/failure result and decide what it means.
//!
//! Failures are mapped into the closed [`GatewayError`] taxonomy at this
//! boundary; nothing from the transport layer escapes untyped.

pub mod backend;
pub mod client;
pub mod error;

pub use backend::LockerBackend;
pub use client::GatewayClient;
pub use error::GatewayError;
