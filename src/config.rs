//! # Global harness configuration.
//!
//! Provides [`Config`] centralized settings for the scheduler and the strategy runner.
//!
//! ## Sentinel values
//! - `concurrent_lanes = 0` → runtime-determined width (no lane cap)
//! - `latency_unit = 0s` → canned scenarios run without simulated latency

use std::time::Duration;

/// Default capacity of the admission gate used by the semaphore and group strategies.
pub const DEFAULT_GATE_PERMITS: usize = 2;

/// Global configuration for the harness.
///
/// Defines:
/// - **Simulated latency**: how long one latency unit of a canned scenario lasts
/// - **Admission**: default capacity of the counting gate
/// - **Concurrent lane width**: max simultaneous ordinary tasks
/// - **Event system**: bus capacity for event delivery
/// - **Shutdown behavior**: grace period for draining lanes
///
/// ## Notes
/// All fields are public for flexibility. Prefer the helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Wall-clock length of one latency unit in the canned scenarios.
    ///
    /// The serial scenario, for example, sleeps `10 × latency_unit` in its first task.
    pub latency_unit: Duration,

    /// Capacity of the default admission gate.
    ///
    /// Values below 1 are clamped to 1 (a zero-capacity gate would never admit anyone).
    pub gate_permits: usize,

    /// Maximum number of ordinary tasks executing at once on the concurrent lane.
    ///
    /// - `0` = no cap (as wide as the tokio runtime allows)
    /// - `n > 0` = at most `n` tasks run simultaneously
    pub concurrent_lanes: usize,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` messages will
    /// receive `Lagged` and skip older items. Minimum value is 1 (enforced by Bus).
    pub bus_capacity: usize,

    /// Maximum time to wait for the lanes to drain during shutdown.
    pub grace: Duration,
}

impl Config {
    /// Returns the concurrent lane width as an `Option`.
    ///
    /// - `None` → no cap
    /// - `Some(n)` → at most `n` concurrent tasks
    #[inline]
    pub fn lane_limit(&self) -> Option<usize> {
        if self.concurrent_lanes == 0 {
            None
        } else {
            Some(self.concurrent_lanes)
        }
    }

    /// Returns the default gate capacity clamped to a minimum of 1.
    #[inline]
    pub fn gate_permits_clamped(&self) -> usize {
        self.gate_permits.max(1)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Scales a number of latency units into a wall-clock duration.
    #[inline]
    pub fn latency(&self, units: u32) -> Duration {
        self.latency_unit.saturating_mul(units)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `latency_unit = 1s` (visible swaps in the demo)
    /// - `gate_permits = 2`
    /// - `concurrent_lanes = 0` (no cap)
    /// - `bus_capacity = 1024`
    /// - `grace = 60s`
    fn default() -> Self {
        Self {
            latency_unit: Duration::from_secs(1),
            gate_permits: DEFAULT_GATE_PERMITS,
            concurrent_lanes: 0,
            bus_capacity: 1024,
            grace: Duration::from_secs(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        let mut cfg = Config::default();
        assert_eq!(cfg.lane_limit(), None);
        cfg.concurrent_lanes = 3;
        assert_eq!(cfg.lane_limit(), Some(3));

        cfg.gate_permits = 0;
        assert_eq!(cfg.gate_permits_clamped(), 1);
        cfg.bus_capacity = 0;
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }

    #[test]
    fn test_latency_scales_with_unit() {
        let cfg = Config {
            latency_unit: Duration::from_millis(5),
            ..Config::default()
        };
        assert_eq!(cfg.latency(10), Duration::from_millis(50));
        assert_eq!(cfg.latency(0), Duration::ZERO);
    }
}
