//! Environment abstraction for deterministic testing.
//!
//! Decouples session logic from system time. Production code uses
//! [`SystemEnv`] (real monotonic clock, tokio sleep); tests use
//! [`test_utils::MockEnv`] (manually advanced virtual clock), which lets
//! timer-driven transitions be exercised without waiting wall-clock seconds.

use std::time::Duration;

/// Abstract environment providing monotonic time and async sleeping.
///
/// # Safety
///
/// Implementations MUST guarantee that `now()` never goes backwards within a
/// single execution context. Subsequent calls return instants >= previous
/// calls.
pub trait Environment: Clone + Send + Sync + 'static {
    /// The specific instant type used by this environment.
    ///
    /// Production environments use `std::time::Instant`; test environments
    /// use virtual time. Only elapsed-time arithmetic is required of it, so
    /// deadlines are stored as (armed instant, duration) pairs and compared
    /// by subtraction.
    type Instant: Copy + Ord + Send + Sync + std::ops::Sub<Output = Duration>;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;

    /// Sleeps for the specified duration.
    ///
    /// This is the ONLY async method in the trait, and it should only be used
    /// by driver/runtime code (not session logic).
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// Production environment using the system monotonic clock.
#[derive(Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = std::time::Instant;

    #[allow(clippy::disallowed_methods)]
    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

pub mod test_utils {
    //! Test environments with controllable time.
    //!
    //! Compiled unconditionally so sibling crates can use [`MockEnv`] in
    //! their own test suites.

    use std::{
        sync::{Arc, atomic::AtomicU64, atomic::Ordering},
        time::Duration,
    };

    use super::Environment;

    /// A virtual instant, milliseconds since the mock clock's origin.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub struct MockInstant(u64);

    impl std::ops::Sub for MockInstant {
        type Output = Duration;

        fn sub(self, rhs: Self) -> Duration {
            Duration::from_millis(self.0.saturating_sub(rhs.0))
        }
    }

    /// Environment with a manually advanced clock.
    ///
    /// `sleep` advances the clock by the requested duration and completes
    /// immediately, so timer-driven loops make progress without real delays.
    /// Clones share the same clock.
    #[derive(Clone, Default)]
    pub struct MockEnv {
        clock_ms: Arc<AtomicU64>,
    }

    impl MockEnv {
        /// Create a mock environment with the clock at its origin.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Advance the virtual clock.
        pub fn advance(&self, duration: Duration) {
            self.clock_ms.fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
        }
    }

    impl Environment for MockEnv {
        type Instant = MockInstant;

        fn now(&self) -> MockInstant {
            MockInstant(self.clock_ms.load(Ordering::SeqCst))
        }

        fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
            self.advance(duration);
            std::future::ready(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn advance_moves_the_clock() {
            let env = MockEnv::new();
            let t0 = env.now();
            env.advance(Duration::from_secs(3));
            assert_eq!(env.now() - t0, Duration::from_secs(3));
        }

        #[test]
        fn clones_share_the_clock() {
            let env = MockEnv::new();
            let other = env.clone();
            env.advance(Duration::from_millis(500));
            assert_eq!(other.now(), env.now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::disallowed_methods)]
    fn system_env_time_advances() {
        let env = SystemEnv::new();

        let t1 = env.now();
        std::thread::sleep(Duration::from_millis(10));
        let t2 = env.now();

        assert!(t2 > t1, "Time should advance");
    }

    #[tokio::test]
    async fn system_env_sleep_waits() {
        let env = SystemEnv::new();

        let start = env.now();
        env.sleep(Duration::from_millis(50)).await;
        let elapsed = env.now() - start;

        assert!(elapsed >= Duration::from_millis(50), "Sleep should wait at least 50ms");
    }
}
