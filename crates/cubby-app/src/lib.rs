//! Application layer for the cubby kiosk.
//!
//! Pure state machine and generic runtime for the locker session, enabling
//! deterministic testing with the same code that runs in production.
//!
//! # Components
//!
//! - [`Session`]: the locker session state machine. Consumes
//!   [`SessionEvent`]s (user intents, gateway outcomes, hardware events,
//!   time ticks) and produces [`SessionAction`]s for the runtime to execute.
//!   The single merge point for the user-request flow and the hardware-event
//!   flow.
//! - [`TimerSlot`]: single-slot fallback timer engine (cancel-before-start).
//! - [`ScreenView`] / [`project`]: presentation projection consumed by the
//!   rendering layer.
//! - [`Driver`]: trait for platform-specific I/O.
//! - [`Runtime`]: orchestration loop merging driver input, stream updates,
//!   gateway completions, and ticks.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod driver;
mod event;
mod runtime;
mod screen;
mod session;
mod timer;
mod validation;

pub use action::SessionAction;
pub use driver::{Driver, KioskInput};
pub use event::SessionEvent;
pub use runtime::Runtime;
pub use screen::{Screen, ScreenView, project};
pub use session::{Mode, PIN_LENGTH, Phase, Session};
pub use timer::{TimerKind, TimerSlot};
