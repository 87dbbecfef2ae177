//! Wire types shared by the stream client and the backend gateway.
//!
//! Two surfaces meet the kiosk from outside:
//!
//! - The locker controller streams JSON text frames, one [`LockerEvent`] per
//!   frame, tagged on the `event` field.
//! - The backend API answers request/response calls with a [`LockerSnapshot`].
//!
//! Decoding is total: malformed input returns [`DecodeError`], never panics.
//! Callers (the stream client) drop and log undecodable frames.

pub mod event;
pub mod snapshot;

pub use event::{DecodeError, LockerEvent};
pub use snapshot::LockerSnapshot;
