//! Hardware events streamed by the locker controller.
//!
//! One JSON object per stream frame, discriminated by the `event` field:
//!
//! ```json
//! {"event": "store_timer", "value": 8, "context": "door open"}
//! ```
//!
//! The controller firmware is not versioned in lockstep with the kiosk, so
//! decoding is forgiving where it can be: timer `context` strings default to
//! empty when absent. An unknown `event` tag is a decode error and the frame
//! is dropped by the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failed to decode a stream frame into a [`LockerEvent`].
#[derive(Debug, Error)]
#[error("undecodable locker event: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// An asynchronous status event from the locker controller.
///
/// Events fall into three groups:
///
/// - Door lifecycle: [`Opening`](Self::Opening) and [`Closed`](Self::Closed).
///   `Closed` is the authoritative end of an open cycle; everything else is
///   advisory.
/// - Countdown reports: [`StoreTimer`](Self::StoreTimer),
///   [`ClosingTimer`](Self::ClosingTimer), [`ClosingIn`](Self::ClosingIn).
/// - Presence sensor readings: the `Object*` variants and
///   [`DistanceChange`](Self::DistanceChange).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LockerEvent {
    /// The door has physically opened.
    Opening,

    /// Remaining seconds of the storage window while the door is open.
    StoreTimer {
        /// Seconds left before the controller closes the door.
        value: u32,
        /// Operator-facing hint from the controller.
        #[serde(default)]
        context: String,
    },

    /// Remaining seconds until the door closes.
    ClosingTimer {
        /// Seconds left before the controller closes the door.
        value: u32,
        /// Operator-facing hint from the controller.
        #[serde(default)]
        context: String,
    },

    /// Advisory "closing soon" notice.
    ClosingIn {
        /// Seconds until close, advisory only.
        value: u32,
        /// Operator-facing hint from the controller.
        #[serde(default)]
        context: String,
    },

    /// The presence sensor detected an object.
    ObjectDetected,

    /// An object is present; `value` is the raw sensor distance reading.
    ObjectPresent {
        /// Raw distance reading from the presence sensor.
        value: f64,
    },

    /// An object remains present since the last reading.
    ObjectStillPresent,

    /// No object is present.
    ObjectAbsent,

    /// The object was taken out during a retrieval cycle. Informational;
    /// [`Closed`](Self::Closed) remains the authoritative completion signal.
    ObjectRetrieved,

    /// Raw sensor distance changed. Not consumed by the session machine.
    DistanceChange {
        /// New raw distance reading.
        value: f64,
    },

    /// The door has physically closed. Authoritative end of an open cycle.
    Closed,
}

impl LockerEvent {
    /// Decode a single stream frame.
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(raw)?)
    }
}
