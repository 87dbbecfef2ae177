//! Kiosk timing and identity configuration.

use std::time::Duration;

/// How long the locker stays open for a deposit or retrieval cycle when the
/// kiosk has to simulate the countdown itself.
pub const DEFAULT_OPEN_DURATION: Duration = Duration::from_secs(10);

/// Delay on the retrieved-confirmation screen before the session returns to
/// idle. Runs regardless of stream connectivity.
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_secs(5);

/// Cadence at which the runtime feeds time ticks to the session machine.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Kiosk configuration.
///
/// Defaults carry the documented constants; the binary overrides them from
/// CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KioskConfig {
    /// Identifier of the locker this kiosk fronts.
    pub locker_id: String,

    /// Open-phase duration used by the fallback countdown.
    pub open_duration: Duration,

    /// Mandatory post-retrieval return-to-idle delay.
    pub reset_delay: Duration,

    /// Tick cadence for the runtime loop.
    pub tick_interval: Duration,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            locker_id: "1".to_string(),
            open_duration: DEFAULT_OPEN_DURATION,
            reset_delay: DEFAULT_RESET_DELAY,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}
