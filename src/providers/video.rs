//! Video provider: datagrams in, access units queued, stats published

use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::debug;

use super::recv_within;
use crate::Result;
use crate::provider::{Provider, Received};
use crate::video::{ReassemblyStats, VideoReassembler};

/// Receives video datagrams and reassembles them into access units.
///
/// Completed units go straight into the reassembler's queue; the provider
/// publishes the updated [`ReassemblyStats`] after each one.
pub struct VideoProvider {
    socket: UdpSocket,
    timeout: Duration,
    buffer: Vec<u8>,
    reassembler: VideoReassembler,
}

impl VideoProvider {
    pub fn new(
        socket: UdpSocket,
        timeout: Duration,
        buffer_size: usize,
        reassembler: VideoReassembler,
    ) -> Self {
        Self { socket, timeout, buffer: vec![0; buffer_size], reassembler }
    }
}

#[async_trait::async_trait]
impl Provider for VideoProvider {
    type Item = ReassemblyStats;

    fn channel(&self) -> &'static str {
        "video"
    }

    async fn next_item(&mut self) -> Result<Received<ReassemblyStats>> {
        let len = match recv_within(&self.socket, &mut self.buffer, self.timeout, "video").await? {
            Some(len) => len,
            None => return Ok(Received::Idle),
        };

        match self.reassembler.feed(&self.buffer[..len]) {
            Some(_) => Ok(Received::Item(self.reassembler.stats())),
            None => Ok(Received::Partial),
        }
    }

    fn finish(&mut self) {
        let stats = self.reassembler.stats();
        debug!(
            units = stats.units,
            total_kb = stats.total_bytes / 1024,
            evicted = stats.evicted,
            "Video reassembly stopped"
        );
        self.reassembler.reset();
    }
}
