//! Video channel: datagrams reassembled into a bounded unit queue

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

use super::{LoopSlot, RunningLoop};
use crate::driver::{Driver, DriverOutputs};
use crate::providers::VideoProvider;
use crate::video::{ReassemblyStats, UnitQueue, VideoReassembler, VideoStream};
use crate::{ChannelHealth, ChannelState, ClientConfig, Result};

/// Owns the video socket and its receive loop.
pub struct VideoChannel {
    slot: LoopSlot,
    timeout: Duration,
    recv_buffer: usize,
    max_datagram: usize,
    degraded_after: u32,
    queue: Arc<UnitQueue>,
    stats: Arc<watch::Sender<Option<Arc<ReassemblyStats>>>>,
}

impl VideoChannel {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            slot: LoopSlot::new("video", config.video_bind_addr()),
            timeout: config.video_timeout(),
            recv_buffer: config.video_recv_buffer,
            max_datagram: config.max_video_datagram,
            degraded_after: config.degraded_after,
            queue: Arc::new(UnitQueue::new(config.video_queue_depth)),
            stats: Arc::new(watch::channel(None).0),
        }
    }

    /// Bind the video socket and start reassembling.
    pub async fn start(&mut self) -> Result<()> {
        if self.slot.running.is_some() {
            debug!("Video stream already running");
            return Ok(());
        }

        let (socket, local_addr) = self.slot.bind().await?;
        let reassembler =
            VideoReassembler::with_max_datagram(Arc::clone(&self.queue), self.max_datagram);
        let provider = VideoProvider::new(socket, self.timeout, self.recv_buffer, reassembler);
        let driver = Driver::spawn(
            provider,
            DriverOutputs {
                items: Arc::clone(&self.stats),
                health: Arc::clone(&self.slot.health),
                degraded_after: self.degraded_after,
            },
        );

        info!("Video stream listener started on {}", local_addr);
        self.slot.running = Some(RunningLoop { driver, local_addr });
        Ok(())
    }

    /// Stop the loop and discard partial and queued units.
    pub async fn stop(&mut self) {
        if self.slot.stop().await {
            info!("Video stream stopped");
        }
    }

    pub fn state(&self) -> ChannelState {
        self.slot.state()
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.slot.local_addr()
    }

    /// Consumer side of the unit queue
    pub fn stream(&self) -> VideoStream {
        VideoStream::new(Arc::clone(&self.queue))
    }

    pub fn stats(&self) -> ReassemblyStats {
        self.stats.borrow().as_deref().copied().unwrap_or_default()
    }

    pub fn health(&self) -> watch::Receiver<ChannelHealth> {
        self.slot.health.subscribe()
    }
}
