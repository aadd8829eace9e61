//! Delivery rate control for telemetry subscriptions

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Nominal cadence at which the aircraft pushes telemetry records.
pub const TELEMETRY_SOURCE_HZ: f64 = 10.0;

/// Update rate for telemetry subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UpdateRate {
    /// Every snapshot as it arrives
    Native,

    /// At most this many snapshots per second, latest wins.
    /// A rate at or above the source cadence behaves like `Native`.
    Max(u32),
}

impl UpdateRate {
    /// Normalize rate against source frequency
    pub fn normalize(self, source_hz: f64) -> Self {
        match self {
            UpdateRate::Native => UpdateRate::Native,
            UpdateRate::Max(0) => UpdateRate::Native,
            UpdateRate::Max(hz) if hz as f64 >= source_hz => UpdateRate::Native,
            UpdateRate::Max(hz) => UpdateRate::Max(hz),
        }
    }

    /// Get throttle interval if needed
    pub fn throttle_interval(self, source_hz: f64) -> Option<Duration> {
        match self.normalize(source_hz) {
            UpdateRate::Native => None,
            UpdateRate::Max(hz) => Some(Duration::from_secs_f64(1.0 / hz as f64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_above_source_is_native() {
        assert_eq!(UpdateRate::Max(30).normalize(TELEMETRY_SOURCE_HZ), UpdateRate::Native);
        assert_eq!(UpdateRate::Max(10).normalize(TELEMETRY_SOURCE_HZ), UpdateRate::Native);
        assert_eq!(UpdateRate::Max(0).normalize(TELEMETRY_SOURCE_HZ), UpdateRate::Native);
    }

    #[test]
    fn throttled_rate_yields_interval() {
        assert_eq!(
            UpdateRate::Max(4).throttle_interval(TELEMETRY_SOURCE_HZ),
            Some(Duration::from_millis(250))
        );
        assert_eq!(UpdateRate::Native.throttle_interval(TELEMETRY_SOURCE_HZ), None);
    }
}
