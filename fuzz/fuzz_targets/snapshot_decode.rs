//! Fuzz target for LockerSnapshot decoding.
//!
//! Backend response bodies are attacker-adjacent input; decoding must never
//! panic on malformed JSON.

#![no_main]

use cubby_proto::LockerSnapshot;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = serde_json::from_str::<LockerSnapshot>(text);
    }
});
