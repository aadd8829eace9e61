//! Telemetry provider: one datagram, one snapshot

use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::trace;

use super::recv_within;
use crate::codec::telemetry;
use crate::provider::{Provider, Received};
use crate::{Result, TelemetrySnapshot};

/// Receives telemetry records and decodes them into snapshots
pub struct TelemetryProvider {
    socket: UdpSocket,
    timeout: Duration,
    buffer: Vec<u8>,
}

impl TelemetryProvider {
    pub fn new(socket: UdpSocket, timeout: Duration, buffer_size: usize) -> Self {
        Self { socket, timeout, buffer: vec![0; buffer_size] }
    }
}

#[async_trait::async_trait]
impl Provider for TelemetryProvider {
    type Item = TelemetrySnapshot;

    fn channel(&self) -> &'static str {
        "telemetry"
    }

    async fn next_item(&mut self) -> Result<Received<TelemetrySnapshot>> {
        let len = match recv_within(&self.socket, &mut self.buffer, self.timeout, "telemetry")
            .await?
        {
            Some(len) => len,
            None => return Ok(Received::Idle),
        };

        let record = String::from_utf8_lossy(&self.buffer[..len]);
        trace!(bytes = len, "Telemetry record: {}", record.trim());

        Ok(Received::Item(telemetry::decode(&record)))
    }
}
