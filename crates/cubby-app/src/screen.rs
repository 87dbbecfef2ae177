//! Presentation projection.
//!
//! Maps the session to one of four renderable screens plus the ancillary
//! fields the rendering layer needs. A pure function of [`Session`]; the
//! rendering layer itself is outside this crate.

use cubby_core::Environment;

use crate::session::{Mode, Phase, Session};

/// Which screen the kiosk shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Locker available; email entry.
    Idle,
    /// Door open (deposit or retrieval); countdown display.
    Open,
    /// Item stored; PIN entry.
    Occupied,
    /// Retrieval confirmation; auto-returns to idle.
    Retrieved,
}

/// Everything the rendering layer consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    /// Screen to show.
    pub screen: Screen,
    /// Email of the active session, empty when none.
    pub email: String,
    /// User-entered PIN, for echo on the occupied screen.
    pub pin: String,
    /// Seconds shown on the active countdown.
    pub countdown_seconds: u32,
    /// Presence-sensor state for the open screens.
    pub object_present: bool,
    /// Controller hint for the status line.
    pub context_message: String,
    /// Whether the open screen belongs to a retrieval (vs deposit) cycle.
    pub is_retrieve_mode: bool,
    /// Error to surface on the current screen.
    pub pending_error: Option<String>,
}

/// Project the session onto its renderable view.
pub fn project<E: Environment>(session: &Session<E>) -> ScreenView {
    let screen = match session.phase() {
        Phase::Idle => Screen::Idle,
        Phase::AwaitingDeposit | Phase::AwaitingRetrieval => Screen::Open,
        Phase::Occupied => Screen::Occupied,
        Phase::RetrievedConfirmation => Screen::Retrieved,
    };

    ScreenView {
        screen,
        email: session.email().to_string(),
        pin: session.pin().to_string(),
        countdown_seconds: session.countdown_seconds(),
        object_present: session.object_present(),
        context_message: session.context_message().to_string(),
        is_retrieve_mode: session.mode() == Mode::Retrieve,
        pending_error: session.pending_error().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use cubby_core::{KioskConfig, env::test_utils::MockEnv};
    use cubby_proto::LockerEvent;

    use super::*;
    use crate::SessionEvent;

    fn session() -> Session<MockEnv> {
        Session::new(MockEnv::new(), KioskConfig::default())
    }

    #[test]
    fn idle_session_projects_idle_screen() {
        let view = project(&session());

        assert_eq!(view.screen, Screen::Idle);
        assert_eq!(view.email, "");
        assert!(!view.is_retrieve_mode);
        assert_eq!(view.pending_error, None);
    }

    #[test]
    fn both_open_phases_project_open_screen() {
        let mut s = session();
        let _ = s.handle(SessionEvent::DepositAccepted { email: "a@b.com".into() });
        let view = project(&s);
        assert_eq!(view.screen, Screen::Open);
        assert!(!view.is_retrieve_mode);
        assert_eq!(view.email, "a@b.com");
        assert_eq!(view.countdown_seconds, 10);

        let _ = s.handle(SessionEvent::Hardware(LockerEvent::Closed));
        let _ = s.handle(SessionEvent::StreamLost);
        let _ = s.handle(SessionEvent::UnlockAccepted);
        let view = project(&s);
        assert_eq!(view.screen, Screen::Open);
        assert!(view.is_retrieve_mode);
    }

    #[test]
    fn occupied_and_retrieved_screens() {
        let mut s = session();
        let _ = s.handle(SessionEvent::DepositAccepted { email: "a@b.com".into() });
        let _ = s.handle(SessionEvent::Hardware(LockerEvent::Closed));
        assert_eq!(project(&s).screen, Screen::Occupied);

        let _ = s.handle(SessionEvent::PinSubmitted { pin: "123456".into() });
        let _ = s.handle(SessionEvent::UnlockAccepted);
        let _ = s.handle(SessionEvent::Hardware(LockerEvent::Closed));
        let view = project(&s);
        assert_eq!(view.screen, Screen::Retrieved);
        assert_eq!(view.countdown_seconds, 5);
    }
}
