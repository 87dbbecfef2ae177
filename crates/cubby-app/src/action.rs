//! Session side-effects and intents.
//!
//! [`SessionAction`]s are instructions produced by the [`crate::Session`]
//! state machine for the runtime to execute. The machine itself performs no
//! I/O; gateway calls happen in the runtime and their outcomes come back as
//! [`crate::SessionEvent`]s.

/// Actions produced by the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Render the current projection.
    Render,

    /// Call the backend to begin a deposit for `email`.
    BeginDeposit {
        /// Validated email to assign the locker to.
        email: String,
    },

    /// Call the backend to submit a retrieval PIN.
    SubmitUnlock {
        /// Validated 6-digit PIN.
        pin: String,
    },
}
