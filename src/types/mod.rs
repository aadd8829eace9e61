//! Core types shared across the client.
//!
//! - [`CommandKind`] and [`CommandRequest`] describe what to send on the
//!   command channel
//! - [`TelemetrySnapshot`] is one fully populated telemetry sample
//! - [`VideoAccessUnit`] is one reassembled video frame with zero-copy payload
//! - [`ChannelState`] and [`ChannelHealth`] describe channel lifecycle
//! - [`UpdateRate`] controls telemetry delivery rate to subscribers

mod access_unit;
mod channel_state;
mod command;
mod telemetry;
mod update_rate;

pub use access_unit::VideoAccessUnit;
pub use channel_state::{ChannelHealth, ChannelState};
pub use command::{CommandKind, CommandRequest};
pub use telemetry::TelemetrySnapshot;
pub use update_rate::{TELEMETRY_SOURCE_HZ, UpdateRate};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_default_is_all_zero() {
        let snapshot = TelemetrySnapshot::default();
        assert_eq!(snapshot.attitude(), (0, 0, 0));
        assert_eq!(snapshot.velocity(), (0, 0, 0));
        assert_eq!(snapshot.temperature_range(), (0, 0));
        assert_eq!(snapshot.acceleration(), (0.0, 0.0, 0.0));
        assert_eq!(snapshot.battery(), 0);
        assert_eq!(snapshot.baro, 0.0);
    }

    #[test]
    fn access_unit_clone_shares_payload() {
        let unit = VideoAccessUnit::new(vec![0, 0, 0, 1, 0x67], 7);
        let copy = unit.clone();
        assert!(std::sync::Arc::ptr_eq(&unit.data, &copy.data));
        assert_eq!(&copy[..], &[0, 0, 0, 1, 0x67]);
        assert_eq!(copy.sequence, 7);
    }

    #[test]
    fn health_defaults_to_healthy() {
        assert_eq!(ChannelHealth::default(), ChannelHealth::Healthy);
        assert!(ChannelHealth::Degraded { consecutive_failures: 3 }.is_degraded());
        assert!(ChannelState::Open.is_open());
        assert!(!ChannelState::Closed.is_open());
    }
}
