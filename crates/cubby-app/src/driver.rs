//! Driver trait for abstracting kiosk I/O.
//!
//! The [`Driver`] decouples the runtime from the frontend: each frontend
//! polls user intents and renders projections its own way, while the generic
//! [`crate::Runtime`] handles all orchestration.

use std::future::Future;

use crate::screen::ScreenView;

/// A user intent from the kiosk frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KioskInput {
    /// Begin a deposit under the given email.
    BeginDeposit {
        /// Email as typed; validated by the session machine.
        email: String,
    },

    /// Submit a retrieval PIN.
    SubmitPin {
        /// PIN as typed; validated by the session machine.
        pin: String,
    },

    /// Force the session back to idle.
    Reset,

    /// Shut the kiosk down.
    Quit,
}

/// Abstracts frontend I/O for the kiosk runtime.
///
/// Implementations: the console frontend in the kiosk binary, and scripted
/// drivers in tests. Futures returned by `poll_input` must be
/// cancellation-safe — the runtime races them against stream delivery and
/// ticks.
pub trait Driver: Send {
    /// Frontend-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next user intent. `None` means the input source is
    /// exhausted and the kiosk should shut down.
    fn poll_input(&mut self)
    -> impl Future<Output = Result<Option<KioskInput>, Self::Error>> + Send;

    /// Render the current projection.
    fn render(&mut self, view: &ScreenView) -> Result<(), Self::Error>;
}
