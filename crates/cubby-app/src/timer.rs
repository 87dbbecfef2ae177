//! Fallback timer engine.
//!
//! A single-slot countdown: arming always replaces whatever was running, so
//! at most one fallback timer exists at any time, by construction. Expiry is
//! computed from tick-supplied instants against the armed instant — the slot
//! never schedules anything itself, which keeps the session machine fully
//! deterministic under a virtual clock.

use std::{ops::Sub, time::Duration};

/// What an armed timer forces when it expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Simulated open-phase countdown while the stream is down; forces the
    /// close transition the hardware would have reported.
    OpenCountdown,

    /// Mandatory post-retrieval return-to-idle delay. Runs regardless of
    /// stream connectivity.
    AutoReset,
}

#[derive(Debug, Clone, Copy)]
struct ArmedTimer<I> {
    kind: TimerKind,
    armed_at: I,
    duration: Duration,
}

/// The single fallback timer slot.
#[derive(Debug, Clone, Copy)]
pub struct TimerSlot<I> {
    armed: Option<ArmedTimer<I>>,
}

impl<I> Default for TimerSlot<I> {
    fn default() -> Self {
        Self { armed: None }
    }
}

impl<I: Copy + Sub<Output = Duration>> TimerSlot<I> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer, cancelling any previous one.
    pub fn arm(&mut self, kind: TimerKind, now: I, duration: Duration) {
        self.armed = Some(ArmedTimer { kind, armed_at: now, duration });
    }

    /// Cancel the armed timer. Idempotent.
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    /// Kind of the armed timer, if any.
    pub fn kind(&self) -> Option<TimerKind> {
        self.armed.map(|t| t.kind)
    }

    /// Whether a timer is armed.
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Whether the armed timer has run out at `now`. An empty slot never
    /// expires.
    pub fn expired(&self, now: I) -> bool {
        self.armed.is_some_and(|t| now - t.armed_at >= t.duration)
    }

    /// Whole seconds left at `now`, rounded up. `None` when the slot is
    /// empty.
    pub fn remaining_secs(&self, now: I) -> Option<u32> {
        self.armed.map(|t| {
            let left = t.duration.saturating_sub(now - t.armed_at);
            left.as_millis().div_ceil(1000) as u32
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> TestInstant {
        TestInstant(ms)
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    struct TestInstant(u64);

    impl Sub for TestInstant {
        type Output = Duration;

        fn sub(self, rhs: Self) -> Duration {
            Duration::from_millis(self.0.saturating_sub(rhs.0))
        }
    }

    #[test]
    fn arming_replaces_previous_timer() {
        let mut slot = TimerSlot::new();
        slot.arm(TimerKind::OpenCountdown, at(0), Duration::from_secs(10));
        slot.arm(TimerKind::AutoReset, at(1_000), Duration::from_secs(5));

        assert_eq!(slot.kind(), Some(TimerKind::AutoReset));
        // The replaced countdown's deadline (10s from 0) no longer applies
        assert!(!slot.expired(at(5_000)));
        assert!(slot.expired(at(6_000)));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut slot: TimerSlot<TestInstant> = TimerSlot::new();
        slot.cancel();
        slot.arm(TimerKind::OpenCountdown, at(0), Duration::from_secs(1));
        slot.cancel();
        slot.cancel();

        assert!(!slot.is_armed());
        assert!(!slot.expired(at(10_000)));
    }

    #[test]
    fn remaining_rounds_up() {
        let mut slot = TimerSlot::new();
        slot.arm(TimerKind::OpenCountdown, at(0), Duration::from_secs(10));

        assert_eq!(slot.remaining_secs(at(0)), Some(10));
        assert_eq!(slot.remaining_secs(at(250)), Some(10));
        assert_eq!(slot.remaining_secs(at(1_000)), Some(9));
        assert_eq!(slot.remaining_secs(at(9_999)), Some(1));
        assert_eq!(slot.remaining_secs(at(10_000)), Some(0));
        assert_eq!(slot.remaining_secs(at(60_000)), Some(0));
    }

    #[test]
    fn empty_slot_reports_nothing() {
        let slot: TimerSlot<TestInstant> = TimerSlot::new();
        assert_eq!(slot.kind(), None);
        assert_eq!(slot.remaining_secs(at(5)), None);
        assert!(!slot.expired(at(5)));
    }
}
