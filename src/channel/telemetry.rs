//! Telemetry channel: latest-value snapshots pushed by the aircraft

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

use super::{LoopSlot, RunningLoop};
use crate::driver::{Driver, DriverOutputs};
use crate::providers::TelemetryProvider;
use crate::{ChannelHealth, ChannelState, ClientConfig, Result, TelemetrySnapshot};

/// Latest telemetry snapshot, `None` while the channel is closed
pub type SnapshotWatch = watch::Receiver<Option<Arc<TelemetrySnapshot>>>;

/// Owns the telemetry socket and its receive loop.
pub struct TelemetryChannel {
    slot: LoopSlot,
    timeout: Duration,
    recv_buffer: usize,
    degraded_after: u32,
    snapshots: Arc<watch::Sender<Option<Arc<TelemetrySnapshot>>>>,
}

impl TelemetryChannel {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            slot: LoopSlot::new("telemetry", config.telemetry_bind_addr()),
            timeout: config.telemetry_timeout(),
            recv_buffer: config.telemetry_recv_buffer,
            degraded_after: config.degraded_after,
            snapshots: Arc::new(watch::channel(None).0),
        }
    }

    /// Bind the telemetry socket and start the receive loop.
    ///
    /// Returns once the socket is bound. Starting a running channel is a no-op.
    pub async fn start(&mut self) -> Result<()> {
        if self.slot.running.is_some() {
            debug!("Telemetry listener already running");
            return Ok(());
        }

        let (socket, local_addr) = self.slot.bind().await?;
        let provider = TelemetryProvider::new(socket, self.timeout, self.recv_buffer);
        let driver = Driver::spawn(
            provider,
            DriverOutputs {
                items: Arc::clone(&self.snapshots),
                health: Arc::clone(&self.slot.health),
                degraded_after: self.degraded_after,
            },
        );

        info!("Telemetry listener started on {}", local_addr);
        self.slot.running = Some(RunningLoop { driver, local_addr });
        Ok(())
    }

    /// Stop the loop; the socket is closed when this returns.
    pub async fn stop(&mut self) {
        if self.slot.stop().await {
            info!("Telemetry listener stopped");
        }
    }

    pub fn state(&self) -> ChannelState {
        self.slot.state()
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.slot.local_addr()
    }

    pub fn subscribe(&self) -> SnapshotWatch {
        self.snapshots.subscribe()
    }

    pub fn latest(&self) -> Option<Arc<TelemetrySnapshot>> {
        self.snapshots.borrow().clone()
    }

    pub fn health(&self) -> watch::Receiver<ChannelHealth> {
        self.slot.health.subscribe()
    }
}
