//! Session input events.
//!
//! [`SessionEvent`] is the complete set of inputs that drive the
//! [`crate::Session`] state machine. Nothing else mutates session state.
//!
//! Events originate from four sources:
//! - User intents forwarded by the driver (deposit request, PIN entry,
//!   reset).
//! - Gateway call outcomes fed back by the runtime.
//! - Stream notifications and hardware events from the controller.
//! - Time ticks driving fallback timer expiry.

use cubby_proto::LockerEvent;

/// Events processed by the session state machine.
///
/// Generic over `I` (instant type) to support both production
/// (`std::time::Instant`) and virtual-clock test environments.
#[derive(Debug, Clone)]
pub enum SessionEvent<I = std::time::Instant> {
    /// User asked to deposit an item under `email`.
    DepositRequested {
        /// Email entered on the idle screen.
        email: String,
    },

    /// User submitted a retrieval PIN.
    PinSubmitted {
        /// PIN entered on the occupied screen.
        pin: String,
    },

    /// Operator asked for a full reset to idle.
    ResetRequested,

    /// The backend accepted the deposit request.
    DepositAccepted {
        /// Email the locker is now assigned to.
        email: String,
    },

    /// The backend rejected the deposit request.
    DepositRejected {
        /// Human-readable failure description.
        message: String,
    },

    /// The backend accepted the PIN and authorized the unlock.
    UnlockAccepted,

    /// The backend rejected the PIN.
    UnlockRejected {
        /// Human-readable failure description.
        message: String,
    },

    /// The event stream connection is established.
    StreamOpened,

    /// The event stream connection is gone; fall back to local timing.
    StreamLost,

    /// A hardware event from the locker controller.
    Hardware(LockerEvent),

    /// Time tick for countdown and timeout processing.
    ///
    /// The runtime sends ticks periodically so the machine can advance the
    /// fallback countdown and fire the auto-reset delay.
    Tick {
        /// Current time from the environment.
        now: I,
    },
}
