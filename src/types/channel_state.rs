//! Observable channel lifecycle and health

use serde::{Deserialize, Serialize};

/// Lifecycle of one channel. `Open` means the channel owns a bound socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelState {
    Closed,
    Open,
}

impl ChannelState {
    pub fn is_open(self) -> bool {
        matches!(self, ChannelState::Open)
    }
}

/// Health of a background receive loop.
///
/// A loop becomes `Degraded` after a configurable number of consecutive
/// non-timeout receive failures and returns to `Healthy` on the next
/// successful receive. Channels never reconnect by themselves; acting on a
/// degraded signal is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChannelHealth {
    #[default]
    Healthy,
    Degraded { consecutive_failures: u32 },
}

impl ChannelHealth {
    pub fn is_degraded(self) -> bool {
        matches!(self, ChannelHealth::Degraded { .. })
    }
}
