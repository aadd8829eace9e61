//! Session: the composition root for the three channels.
//!
//! A [`Session`] owns the command, telemetry and video channels and is the
//! only type external collaborators need. It drives the handshake, starts
//! telemetry once connected, turns video on and off in the order the aircraft
//! expects and tears everything down on [`Session::close`].

use futures::{Stream, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

use crate::channel::{CommandChannel, TelemetryChannel, VideoChannel};
use crate::stream::ThrottleExt;
use crate::video::{ReassemblyStats, VideoStream};
use crate::{
    ChannelHealth, ChannelState, ClientConfig, ClientError, CommandKind, CommandRequest, Result,
    TELEMETRY_SOURCE_HZ, TelemetrySnapshot, UpdateRate,
};


/// Client session with one aircraft.
pub struct Session {
    config: ClientConfig,
    command: CommandChannel,
    telemetry: TelemetryChannel,
    video: VideoChannel,
}

impl Session {
    /// Create a closed session. Nothing is bound until [`connect`](Self::connect).
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            command: CommandChannel::new(&config),
            telemetry: TelemetryChannel::new(&config),
            video: VideoChannel::new(&config),
            config,
        })
    }

    /// Perform the handshake and start telemetry.
    ///
    /// Returns `true` on success. The reason for a failure is logged; use
    /// [`try_connect`](Self::try_connect) to receive it as an error.
    pub async fn connect(&mut self) -> bool {
        match self.try_connect().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Connection failed: {}", e);
                false
            }
        }
    }

    /// Perform the handshake and start telemetry, reporting why it failed.
    ///
    /// Reconnecting a connected session first turns video off and stops
    /// telemetry, so a handshake failure always leaves every channel Closed.
    /// If the handshake succeeds but the telemetry socket cannot be bound, the
    /// command channel stays connected and the bind error is returned;
    /// telemetry can be retried with [`start_telemetry`](Self::start_telemetry).
    pub async fn try_connect(&mut self) -> Result<()> {
        if let Err(e) = self.disable_video().await {
            warn!("Stream-off failed before reconnect: {}", e);
        }
        self.telemetry.stop().await;

        info!("Connecting to {}", self.config.peer_addr());
        self.command.connect().await?;
        self.start_telemetry().await
    }

    /// Start the telemetry loop on an already connected session.
    pub async fn start_telemetry(&mut self) -> Result<()> {
        if !self.is_connected() {
            return Err(ClientError::NotConnected);
        }
        self.telemetry.start().await
    }

    /// Send one command, fire-and-forget.
    pub async fn send_command(&self, kind: CommandKind, parameter: Option<&str>) -> Result<()> {
        let request = CommandRequest { kind, parameter: parameter.map(str::to_string) };
        self.send(request).await
    }

    /// Send a prepared request, fire-and-forget.
    pub async fn send(&self, request: impl Into<CommandRequest>) -> Result<()> {
        self.command.send(&request.into()).await
    }

    /// Start the video channel and ask the aircraft to stream.
    ///
    /// The video socket is bound before `streamon` goes out so the first
    /// datagrams are not lost. If `streamon` cannot be sent the video channel
    /// is torn down again.
    pub async fn enable_video(&mut self) -> Result<()> {
        if !self.is_connected() {
            return Err(ClientError::NotConnected);
        }
        if self.video.state().is_open() {
            debug!("Video already enabled");
            return Ok(());
        }

        self.video.start().await?;
        if let Err(e) = self.send(CommandKind::StreamOn).await {
            self.video.stop().await;
            return Err(e);
        }
        Ok(())
    }

    /// Ask the aircraft to stop streaming, then stop the video channel.
    ///
    /// The channel is stopped even if `streamoff` could not be sent; that
    /// send error is returned afterwards.
    pub async fn disable_video(&mut self) -> Result<()> {
        if !self.video.state().is_open() {
            return Ok(());
        }

        let sent = if self.is_connected() { self.send(CommandKind::StreamOff).await } else { Ok(()) };
        self.video.stop().await;
        sent
    }

    /// Stop video, then telemetry, then the command channel.
    ///
    /// Idempotent; every channel is Closed afterwards.
    pub async fn close(&mut self) {
        if let Err(e) = self.disable_video().await {
            warn!("Stream-off failed during close: {}", e);
        }
        self.telemetry.stop().await;
        self.command.close();
        info!("Disconnected");
    }

    /// Telemetry snapshots as they arrive, optionally throttled (latest wins).
    ///
    /// Subscriptions survive reconnects: snapshots from later connections are
    /// delivered to the same stream.
    pub fn telemetry(&self, rate: UpdateRate) -> impl Stream<Item = Arc<TelemetrySnapshot>> + 'static {
        let snapshots =
            WatchStream::new(self.telemetry.subscribe()).filter_map(|opt| async move { opt });

        match rate.throttle_interval(TELEMETRY_SOURCE_HZ) {
            None => snapshots.boxed(),
            Some(interval) => snapshots.throttle(interval).boxed(),
        }
    }

    /// Most recent snapshot, if telemetry is running and has produced one
    pub fn latest_telemetry(&self) -> Option<Arc<TelemetrySnapshot>> {
        self.telemetry.latest()
    }

    /// Reassembled access units for the external decoder, oldest first.
    pub fn video_stream(&self) -> VideoStream {
        self.video.stream()
    }

    pub fn video_stats(&self) -> ReassemblyStats {
        self.video.stats()
    }

    pub fn telemetry_health(&self) -> watch::Receiver<ChannelHealth> {
        self.telemetry.health()
    }

    pub fn video_health(&self) -> watch::Receiver<ChannelHealth> {
        self.video.health()
    }

    pub fn is_connected(&self) -> bool {
        self.command.state().is_open()
    }

    pub fn is_video_enabled(&self) -> bool {
        self.video.state().is_open()
    }

    pub fn command_state(&self) -> ChannelState {
        self.command.state()
    }

    pub fn telemetry_state(&self) -> ChannelState {
        self.telemetry.state()
    }

    pub fn video_state(&self) -> ChannelState {
        self.video.state()
    }

    /// Local address the telemetry socket is bound to, while open
    pub fn telemetry_addr(&self) -> Option<SocketAddr> {
        self.telemetry.local_addr()
    }

    /// Local address the video socket is bound to, while open
    pub fn video_addr(&self) -> Option<SocketAddr> {
        self.video.local_addr()
    }

    /// Local address of the command socket, while connected
    pub fn command_addr(&self) -> Option<SocketAddr> {
        self.command.local_addr()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
