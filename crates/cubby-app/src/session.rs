//! Locker session state machine.
//!
//! [`Session`] holds the single authoritative session state and is the only
//! place it changes. It consumes [`SessionEvent`]s — user intents, gateway
//! outcomes, hardware events, stream notifications, time ticks — and produces
//! [`SessionAction`]s for the runtime to execute.
//!
//! This is a pure state machine: no I/O, no scheduling. Time enters only
//! through the [`Environment`] clock and tick events, so every transition is
//! reproducible under a virtual clock.
//!
//! # Dual sources of truth
//!
//! While the event stream is connected, arriving hardware events are
//! authoritative and drive the open-phase lifecycle. While it is not, the
//! machine fabricates the same user-visible progression with the fallback
//! timer. The race between "local timer fires" and "`closed` event arrives"
//! is resolved by cancel-on-event: the `closed` handler cancels the
//! countdown, the countdown's own completion path clears `mode`, and each
//! completion helper is inert once the cycle it belongs to is finished —
//! exactly one transition occurs, the other is a no-op.

use std::time::Duration;

use cubby_core::{Environment, KioskConfig};
use cubby_proto::LockerEvent;

use crate::{
    SessionAction, SessionEvent,
    timer::{TimerKind, TimerSlot},
    validation::{is_valid_email, is_valid_pin},
};

/// Required retrieval PIN length, in ASCII digits.
pub const PIN_LENGTH: usize = 6;

/// Coarse-grained session state; decides which screen is shown.
///
/// `Idle` and `Occupied` are the stable rest states. The remaining phases
/// are transient: each is bounded by an authoritative hardware event or a
/// fallback timer that forces progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Locker empty, waiting for a deposit request.
    Idle,
    /// Door open for a deposit cycle.
    AwaitingDeposit,
    /// Item stored, waiting for a retrieval PIN.
    Occupied,
    /// Door open for a retrieval cycle.
    AwaitingRetrieval,
    /// Item taken out; auto-resets to `Idle` after a fixed delay.
    RetrievedConfirmation,
}

/// Which user flow is in progress while the locker is physically open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No flow in progress.
    None,
    /// Deposit flow: open, store, close.
    Deposit,
    /// Retrieval flow: unlock, open, take out, close.
    Retrieve,
}

/// The locker session aggregate and its transition rules.
///
/// Created once at kiosk startup; never destroyed, only reset to its `Idle`
/// defaults.
pub struct Session<E: Environment> {
    env: E,
    config: KioskConfig,
    phase: Phase,
    mode: Mode,
    email: String,
    pin: String,
    countdown_seconds: u32,
    object_present: bool,
    context_message: String,
    stream_connected: bool,
    pending_error: Option<String>,
    timer: TimerSlot<E::Instant>,
}

impl<E: Environment> Session<E> {
    /// Create an idle session.
    pub fn new(env: E, config: KioskConfig) -> Self {
        Self {
            env,
            config,
            phase: Phase::Idle,
            mode: Mode::None,
            email: String::new(),
            pin: String::new(),
            countdown_seconds: 0,
            object_present: false,
            context_message: String::new(),
            stream_connected: false,
            pending_error: None,
            timer: TimerSlot::new(),
        }
    }

    /// Process an event and return actions for the runtime.
    pub fn handle(&mut self, event: SessionEvent<E::Instant>) -> Vec<SessionAction> {
        match event {
            SessionEvent::DepositRequested { email } => self.handle_deposit_requested(email),
            SessionEvent::PinSubmitted { pin } => self.handle_pin_submitted(pin),
            SessionEvent::ResetRequested => {
                self.reset();
                vec![SessionAction::Render]
            },
            SessionEvent::DepositAccepted { email } => self.handle_deposit_accepted(email),
            SessionEvent::DepositRejected { message } => self.handle_deposit_rejected(message),
            SessionEvent::UnlockAccepted => self.handle_unlock_accepted(),
            SessionEvent::UnlockRejected { message } => self.handle_unlock_rejected(message),
            SessionEvent::StreamOpened => self.handle_stream_opened(),
            SessionEvent::StreamLost => self.handle_stream_lost(),
            SessionEvent::Hardware(hw) => self.handle_hardware(hw),
            SessionEvent::Tick { now } => self.handle_tick(now),
        }
    }

    // --- user intents ---

    fn handle_deposit_requested(&mut self, email: String) -> Vec<SessionAction> {
        self.pending_error = None;

        if self.phase != Phase::Idle {
            tracing::debug!(phase = ?self.phase, "deposit request outside idle, ignoring");
            return vec![SessionAction::Render];
        }

        if !is_valid_email(&email) {
            self.pending_error = Some("enter a valid email address".to_string());
            return vec![SessionAction::Render];
        }

        vec![SessionAction::BeginDeposit { email }, SessionAction::Render]
    }

    fn handle_pin_submitted(&mut self, pin: String) -> Vec<SessionAction> {
        self.pending_error = None;

        if self.phase != Phase::Occupied {
            tracing::debug!(phase = ?self.phase, "pin submitted outside occupied, ignoring");
            return vec![SessionAction::Render];
        }

        // An accepted unlock is already waiting on the hardware; a second
        // submission would race it.
        if self.mode == Mode::Retrieve {
            tracing::debug!("unlock already authorized, ignoring pin submission");
            return vec![];
        }

        self.pin = pin.clone();

        if !is_valid_pin(&pin) {
            self.pending_error = Some(format!("PIN must be exactly {PIN_LENGTH} digits"));
            return vec![SessionAction::Render];
        }

        vec![SessionAction::SubmitUnlock { pin }, SessionAction::Render]
    }

    // --- gateway outcomes ---

    fn handle_deposit_accepted(&mut self, email: String) -> Vec<SessionAction> {
        if self.phase != Phase::Idle {
            tracing::debug!(phase = ?self.phase, "late deposit confirmation, ignoring");
            return vec![];
        }

        self.mode = Mode::Deposit;
        self.email = email;
        self.pending_error = None;
        self.enter_open_phase(Phase::AwaitingDeposit);

        vec![SessionAction::Render]
    }

    fn handle_deposit_rejected(&mut self, message: String) -> Vec<SessionAction> {
        if self.phase != Phase::Idle {
            tracing::debug!(phase = ?self.phase, "late deposit failure, ignoring");
            return vec![];
        }

        self.pending_error = Some(message);
        vec![SessionAction::Render]
    }

    fn handle_unlock_accepted(&mut self) -> Vec<SessionAction> {
        if self.phase != Phase::Occupied {
            tracing::debug!(phase = ?self.phase, "late unlock confirmation, ignoring");
            return vec![];
        }

        self.mode = Mode::Retrieve;
        self.pin.clear();
        self.pending_error = None;

        // Connected: the physical `opening` event moves us to the open
        // screen. Disconnected: no confirmation will ever arrive, so
        // simulate the whole cycle locally.
        if !self.stream_connected {
            self.enter_open_phase(Phase::AwaitingRetrieval);
        }

        vec![SessionAction::Render]
    }

    fn handle_unlock_rejected(&mut self, message: String) -> Vec<SessionAction> {
        if self.phase != Phase::Occupied {
            tracing::debug!(phase = ?self.phase, "late unlock failure, ignoring");
            return vec![];
        }

        self.mode = Mode::None;
        self.pending_error = Some(message);
        vec![SessionAction::Render]
    }

    // --- stream connectivity ---

    fn handle_stream_opened(&mut self) -> Vec<SessionAction> {
        self.mark_stream_connected();
        vec![SessionAction::Render]
    }

    fn handle_stream_lost(&mut self) -> Vec<SessionAction> {
        self.stream_connected = false;

        // A transient open phase must stay bounded without events: resume the
        // countdown locally from the last value the stream reported.
        if matches!(self.phase, Phase::AwaitingDeposit | Phase::AwaitingRetrieval)
            && self.timer.kind() != Some(TimerKind::OpenCountdown)
        {
            let seconds = u64::from(self.countdown_seconds.max(1));
            self.timer.arm(
                TimerKind::OpenCountdown,
                self.env.now(),
                Duration::from_secs(seconds),
            );
        }

        // An authorized unlock whose `opening` never arrived would otherwise
        // wait forever: the hardware is opening the door, so simulate the
        // cycle it will no longer report.
        if self.phase == Phase::Occupied && self.mode == Mode::Retrieve {
            self.enter_open_phase(Phase::AwaitingRetrieval);
        }

        vec![SessionAction::Render]
    }

    /// Flip `stream_connected` and hand authority for the current open cycle
    /// to the stream: a running countdown simulation is cancelled so the
    /// `closed` event cannot race it. The auto-reset delay is unaffected — it
    /// runs regardless of connectivity.
    fn mark_stream_connected(&mut self) {
        self.stream_connected = true;
        if self.timer.kind() == Some(TimerKind::OpenCountdown) {
            self.timer.cancel();
        }
    }

    // --- hardware events ---

    fn handle_hardware(&mut self, event: LockerEvent) -> Vec<SessionAction> {
        // Receiving anything proves the stream is up, even if the opened
        // notification was lost.
        self.mark_stream_connected();

        match event {
            LockerEvent::Opening => self.handle_opening(),
            LockerEvent::StoreTimer { value, context }
            | LockerEvent::ClosingTimer { value, context } => {
                self.countdown_seconds = value;
                self.context_message = context;
            },
            LockerEvent::ClosingIn { context, .. } => {
                self.context_message = context;
            },
            LockerEvent::ObjectDetected
            | LockerEvent::ObjectPresent { .. }
            | LockerEvent::ObjectStillPresent => {
                self.object_present = true;
            },
            LockerEvent::ObjectAbsent => {
                self.object_present = false;
            },
            LockerEvent::ObjectRetrieved => {
                tracing::debug!("object retrieved, waiting for door close");
            },
            LockerEvent::DistanceChange { .. } => {},
            LockerEvent::Closed => self.handle_closed(),
        }

        vec![SessionAction::Render]
    }

    /// The door opened. Normally the session is already in the open phase via
    /// the gateway path; this is the single source of truth for the visible
    /// open screen, so force it per the active mode.
    fn handle_opening(&mut self) {
        match self.mode {
            Mode::Deposit => {
                if self.phase != Phase::AwaitingDeposit {
                    self.enter_open_phase(Phase::AwaitingDeposit);
                }
            },
            Mode::Retrieve => {
                if self.phase != Phase::AwaitingRetrieval {
                    self.enter_open_phase(Phase::AwaitingRetrieval);
                }
            },
            Mode::None => {
                tracing::warn!(phase = ?self.phase, "opening event with no active flow, ignoring");
            },
        }
    }

    /// The door closed: the authoritative end of an open cycle. Dispatches on
    /// `mode`, not `phase`, so a lost `opening` event cannot strand the
    /// session in `Occupied` after an authorized unlock.
    fn handle_closed(&mut self) {
        match self.mode {
            Mode::Deposit => self.complete_deposit(),
            Mode::Retrieve => self.complete_retrieval(),
            Mode::None => {
                tracing::debug!(phase = ?self.phase, "closed event outside an active cycle, ignoring");
            },
        }
    }

    // --- time ---

    fn handle_tick(&mut self, now: E::Instant) -> Vec<SessionAction> {
        if !self.timer.is_armed() {
            return vec![];
        }

        if !self.timer.expired(now) {
            let remaining = self.timer.remaining_secs(now).unwrap_or(0);
            if remaining != self.countdown_seconds {
                self.countdown_seconds = remaining;
                return vec![SessionAction::Render];
            }
            return vec![];
        }

        let kind = self.timer.kind();
        self.timer.cancel();

        match kind {
            Some(TimerKind::OpenCountdown) => match self.phase {
                Phase::AwaitingDeposit => self.complete_deposit(),
                Phase::AwaitingRetrieval => self.complete_retrieval(),
                phase => {
                    tracing::debug!(?phase, "stale countdown expiry outside open phase, dropping");
                },
            },
            Some(TimerKind::AutoReset) => self.reset(),
            None => {},
        }

        vec![SessionAction::Render]
    }

    // --- transitions ---

    /// Enter an open phase: reset the visible countdown to the configured
    /// open duration and, when the stream is down, arm the local countdown
    /// that forces the close transition on expiry.
    fn enter_open_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.context_message.clear();
        self.countdown_seconds = self.config.open_duration.as_secs() as u32;

        if self.stream_connected {
            // Events drive the cycle; no simulation needed.
            if self.timer.kind() == Some(TimerKind::OpenCountdown) {
                self.timer.cancel();
            }
        } else {
            self.timer.arm(TimerKind::OpenCountdown, self.env.now(), self.config.open_duration);
        }
    }

    /// Deposit cycle finished: the item is stored.
    fn complete_deposit(&mut self) {
        if self.timer.kind() == Some(TimerKind::OpenCountdown) {
            self.timer.cancel();
        }
        self.phase = Phase::Occupied;
        self.mode = Mode::None;
        self.countdown_seconds = 0;
        self.context_message.clear();
        self.object_present = false;
    }

    /// Retrieval cycle finished: show the confirmation screen and arm the
    /// unconditional return-to-idle delay.
    fn complete_retrieval(&mut self) {
        self.phase = Phase::RetrievedConfirmation;
        self.mode = Mode::None;
        self.pin.clear();
        self.context_message.clear();
        self.object_present = false;
        self.countdown_seconds = self.config.reset_delay.as_secs() as u32;
        self.timer.arm(TimerKind::AutoReset, self.env.now(), self.config.reset_delay);
    }

    /// Restore every field to its `Idle` default. Always legal.
    ///
    /// `stream_connected` is connection fact, not session data; it survives
    /// the reset so an established stream keeps authority over the next
    /// cycle.
    pub fn reset(&mut self) {
        self.timer.cancel();
        self.phase = Phase::Idle;
        self.mode = Mode::None;
        self.email.clear();
        self.pin.clear();
        self.countdown_seconds = 0;
        self.object_present = false;
        self.context_message.clear();
        self.pending_error = None;
    }

    // --- accessors ---

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Active user flow.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Email of the depositing user; empty outside an active session.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// User-entered retrieval PIN; cleared on successful submit and on reset.
    pub fn pin(&self) -> &str {
        &self.pin
    }

    /// Last known value of the active countdown, in seconds.
    pub fn countdown_seconds(&self) -> u32 {
        self.countdown_seconds
    }

    /// Last presence-sensor reading. Meaningful only in the open phases.
    pub fn object_present(&self) -> bool {
        self.object_present
    }

    /// Operator-facing hint from the controller, if any.
    pub fn context_message(&self) -> &str {
        &self.context_message
    }

    /// Whether the hardware event stream is believed connected.
    pub fn stream_connected(&self) -> bool {
        self.stream_connected
    }

    /// Error to surface on the current screen, if any.
    pub fn pending_error(&self) -> Option<&str> {
        self.pending_error.as_deref()
    }

    /// Kind of the armed fallback timer, if any. Exposed for invariant
    /// checks.
    pub fn armed_timer(&self) -> Option<TimerKind> {
        self.timer.kind()
    }
}
