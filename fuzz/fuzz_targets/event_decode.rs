//! Fuzz target for LockerEvent decoding.
//!
//! The stream client feeds controller frames straight into the decoder, so
//! arbitrary bytes must never panic — only return an error that the client
//! logs and drops.

#![no_main]

use cubby_proto::LockerEvent;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = LockerEvent::decode(text);
    }
});
