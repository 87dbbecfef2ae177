//! Kiosk runtime.
//!
//! The Runtime drives the event loop, coordinating between:
//! - [`Session`]: the locker session state machine
//! - [`Driver`]: frontend I/O (user intents, rendering)
//! - [`cubby_gateway::LockerBackend`]: backend request/response calls
//! - the stream subscription delivering controller events
//!
//! All session mutation happens on this one logical task. The only
//! suspension points are the gateway calls and the tick sleep; stream
//! delivery and user input are raced in a `select!`, so ordering between
//! sources is whatever the environment produces — the machine is defensive
//! about that by design of its transition rules, not by runtime locking.

use cubby_core::{Environment, KioskConfig};
use cubby_gateway::LockerBackend;
use cubby_stream::StreamUpdate;
use tokio::sync::mpsc;

use crate::{
    Driver, KioskInput, Session, SessionAction, SessionEvent,
    screen::project,
};

/// Orchestrates session, driver, backend, and stream subscription.
pub struct Runtime<D, B, E>
where
    D: Driver,
    B: LockerBackend,
    E: Environment,
{
    driver: D,
    backend: B,
    env: E,
    session: Session<E>,
    updates: mpsc::Receiver<StreamUpdate>,
    tick_interval: std::time::Duration,
    stream_done: bool,
}

impl<D, B, E> Runtime<D, B, E>
where
    D: Driver,
    B: LockerBackend,
    E: Environment,
{
    /// Create a runtime over an already-subscribed stream receiver.
    pub fn new(
        driver: D,
        backend: B,
        env: E,
        config: KioskConfig,
        updates: mpsc::Receiver<StreamUpdate>,
    ) -> Self {
        let tick_interval = config.tick_interval;
        let session = Session::new(env.clone(), config);
        Self { driver, backend, env, session, updates, tick_interval, stream_done: false }
    }

    /// Run the event loop until the driver quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to poll or render.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.driver.render(&project(&self.session))?;

        loop {
            if self.process_cycle().await? {
                break;
            }
        }

        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the kiosk should shut down.
    async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        let event = tokio::select! {
            input = self.driver.poll_input() => {
                match input? {
                    None | Some(KioskInput::Quit) => return Ok(true),
                    Some(KioskInput::BeginDeposit { email }) => {
                        SessionEvent::DepositRequested { email }
                    },
                    Some(KioskInput::SubmitPin { pin }) => SessionEvent::PinSubmitted { pin },
                    Some(KioskInput::Reset) => SessionEvent::ResetRequested,
                }
            },
            update = self.updates.recv(), if !self.stream_done => {
                match update {
                    Some(StreamUpdate::Opened) => SessionEvent::StreamOpened,
                    Some(StreamUpdate::Event(event)) => SessionEvent::Hardware(event),
                    Some(StreamUpdate::Lost) => SessionEvent::StreamLost,
                    Some(StreamUpdate::Stopped) | None => {
                        // Reconnects are exhausted (or the client was torn
                        // down): fallback timing for the rest of this run.
                        self.stream_done = true;
                        SessionEvent::StreamLost
                    },
                }
            },
            () = self.env.sleep(self.tick_interval) => {
                SessionEvent::Tick { now: self.env.now() }
            },
        };

        let actions = self.session.handle(event);
        self.process_actions(actions).await?;
        Ok(false)
    }

    /// Execute actions, feeding gateway outcomes back into the session until
    /// the action queue drains.
    async fn process_actions(&mut self, initial: Vec<SessionAction>) -> Result<(), D::Error> {
        let mut pending = initial;

        while !pending.is_empty() {
            for action in std::mem::take(&mut pending) {
                match action {
                    SessionAction::Render => {
                        self.driver.render(&project(&self.session))?;
                    },
                    SessionAction::BeginDeposit { email } => {
                        let event = match self.backend.begin_deposit(&email).await {
                            Ok(snapshot) => {
                                if snapshot.pin.is_some() {
                                    tracing::debug!(locker = snapshot.id, "deposit PIN issued");
                                }
                                SessionEvent::DepositAccepted { email }
                            },
                            Err(error) => {
                                tracing::info!(%error, "deposit request failed");
                                SessionEvent::DepositRejected { message: error.to_string() }
                            },
                        };
                        pending.extend(self.session.handle(event));
                    },
                    SessionAction::SubmitUnlock { pin } => {
                        let event = match self.backend.submit_unlock(&pin).await {
                            Ok(_) => SessionEvent::UnlockAccepted,
                            Err(error) => {
                                tracing::info!(%error, "unlock request failed");
                                SessionEvent::UnlockRejected { message: error.to_string() }
                            },
                        };
                        pending.extend(self.session.handle(event));
                    },
                }
            }
        }

        Ok(())
    }

    /// The session, for inspection.
    pub fn session(&self) -> &Session<E> {
        &self.session
    }
}
