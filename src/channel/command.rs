//! Command channel: handshake and fire-and-forget sends
//!
//! Replies to commands sent after the handshake are never read. They stay
//! queued on the socket until it is closed; the protocol gives no way to
//! correlate a reply with the command that caused it.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

use crate::codec::command::is_acknowledgment;
use crate::{ChannelState, ClientConfig, ClientError, CommandKind, CommandRequest, Result};

/// Receive buffer for a handshake reply
const REPLY_BUFFER: usize = 1518;

enum Link {
    Closed,
    Open { socket: UdpSocket },
}

/// Owns the command socket.
pub struct CommandChannel {
    bind_addr: SocketAddr,
    peer: SocketAddr,
    handshake_timeout: Duration,
    link: Link,
}

impl CommandChannel {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            bind_addr: config.command_bind_addr(),
            peer: config.peer_addr(),
            handshake_timeout: config.handshake_timeout(),
            link: Link::Closed,
        }
    }

    pub fn state(&self) -> ChannelState {
        match self.link {
            Link::Closed => ChannelState::Closed,
            Link::Open { .. } => ChannelState::Open,
        }
    }

    /// Local address of the open socket
    pub fn local_addr(&self) -> Option<SocketAddr> {
        match &self.link {
            Link::Open { socket } => socket.local_addr().ok(),
            Link::Closed => None,
        }
    }

    /// Bind, send `command` and wait once for an acknowledgment.
    ///
    /// On any failure the socket is dropped and the channel stays Closed.
    /// Connecting an open channel replaces its socket.
    pub async fn connect(&mut self) -> Result<()> {
        self.close();

        let socket = UdpSocket::bind(self.bind_addr)
            .await
            .map_err(|e| ClientError::bind_failed("command", self.bind_addr, e))?;
        debug!("Command socket bound to {}", self.bind_addr);

        let wire = CommandRequest::new(CommandKind::Connect).wire();
        socket
            .send_to(wire.as_bytes(), self.peer)
            .await
            .map_err(|e| ClientError::transmit_failed(wire.clone(), e))?;

        let mut buf = [0u8; REPLY_BUFFER];
        let reply = match tokio::time::timeout(self.handshake_timeout, socket.recv_from(&mut buf))
            .await
        {
            Err(_) => {
                warn!("Handshake with {} timed out after {:?}", self.peer, self.handshake_timeout);
                return Err(ClientError::Timeout { duration: self.handshake_timeout });
            }
            Ok(Err(e)) => {
                warn!("Handshake receive failed: {}", e);
                None
            }
            Ok(Ok((len, from))) => {
                let reply = String::from_utf8_lossy(&buf[..len]).trim().to_string();
                debug!(%from, "Handshake reply: {:?}", reply);
                Some(reply)
            }
        };

        if !is_acknowledgment(reply.as_deref()) {
            warn!("Handshake rejected: {:?}", reply);
            return Err(ClientError::handshake_rejected(reply.unwrap_or_default()));
        }

        info!("Connected to {}", self.peer);
        self.link = Link::Open { socket };
        Ok(())
    }

    /// Encode and transmit one command without waiting for a reply.
    pub async fn send(&self, request: &CommandRequest) -> Result<()> {
        let Link::Open { socket } = &self.link else {
            warn!("Dropping {:?}: not connected", request.kind);
            return Err(ClientError::NotConnected);
        };

        if request.kind.takes_parameter() && request.parameter.is_none() {
            warn!("{:?} sent without a parameter; the aircraft will reject it", request.kind);
        }

        let wire = request.wire();
        socket.send_to(wire.as_bytes(), self.peer).await.map_err(|e| {
            warn!("Send of {:?} failed: {}", wire, e);
            ClientError::transmit_failed(wire.clone(), e)
        })?;

        debug!("→ {}", wire);
        Ok(())
    }

    /// Drop the socket. Safe to call when already closed.
    pub fn close(&mut self) {
        if let Link::Open { .. } = std::mem::replace(&mut self.link, Link::Closed) {
            debug!("Command socket closed");
        }
    }
}
