//! Test utilities: fixtures and a simulated aircraft
//!
//! The simulated peer listens on a loopback UDP port, records every command
//! it receives and answers the handshake according to its [`PeerBehavior`].
//! It can also push telemetry and video datagrams at a client socket.

#![cfg(any(test, feature = "benchmark"))]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::ClientConfig;

/// A complete telemetry record as sent by the aircraft.
pub const SAMPLE_TELEMETRY: &str = "pitch:5;roll:-3;yaw:0;vgx:0;vgy:0;vgz:0;templ:40;temph:45;tof:10;h:100;bat:80;baro:120.5;time:30;agx:0.1;agy:-0.2;agz:998.0;\r\n";

/// Split access units into link-sized datagrams.
///
/// A unit whose length is an exact multiple of `max_datagram` ends with a
/// full-size fragment and will merge with the next unit on reassembly.
pub fn video_datagrams(unit_sizes: &[usize], max_datagram: usize) -> Vec<Vec<u8>> {
    let mut datagrams = Vec::new();
    for (index, &size) in unit_sizes.iter().enumerate() {
        let unit = vec![index as u8; size];
        datagrams.extend(unit.chunks(max_datagram).map(<[u8]>::to_vec));
    }
    datagrams
}

/// How the simulated aircraft answers the `command` handshake
#[derive(Debug, Clone)]
pub enum PeerBehavior {
    /// Reply with `ok` after the given delay
    Acknowledge(Duration),
    /// Reply with the given text
    Reject(&'static str),
    /// Never reply
    Silent,
}

/// Simulated aircraft on a loopback port
pub struct SimulatedPeer {
    socket: Arc<UdpSocket>,
    addr: SocketAddr,
    commands: mpsc::UnboundedReceiver<String>,
    task: JoinHandle<()>,
}

impl SimulatedPeer {
    /// Bind to an ephemeral loopback port and start answering commands.
    pub async fn spawn(behavior: PeerBehavior) -> std::io::Result<Self> {
        let socket = Arc::new(UdpSocket::bind("127.0.0.1:0").await?);
        let addr = socket.local_addr()?;
        let (tx, commands) = mpsc::unbounded_channel();

        let task_socket = Arc::clone(&socket);
        let task = tokio::spawn(async move {
            let mut buf = [0u8; 1518];
            while let Ok((len, from)) = task_socket.recv_from(&mut buf).await {
                let wire = String::from_utf8_lossy(&buf[..len]).to_string();
                trace!("Simulated peer received {:?} from {}", wire, from);

                let reply = match (&behavior, wire.as_str()) {
                    (PeerBehavior::Acknowledge(delay), "command") => {
                        tokio::time::sleep(*delay).await;
                        Some("ok")
                    }
                    (PeerBehavior::Reject(text), "command") => Some(*text),
                    (PeerBehavior::Silent, _) => None,
                    _ => Some("ok"),
                };
                if let Some(reply) = reply {
                    let _ = task_socket.send_to(reply.as_bytes(), from).await;
                }
                if tx.send(wire).is_err() {
                    break;
                }
            }
        });

        Ok(Self { socket, addr, commands, task })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Client configuration pointing at this peer, with short timeouts.
    pub fn config(&self) -> ClientConfig {
        ClientConfig::local_peer(self.addr)
            .with_handshake_timeout(Duration::from_millis(500))
            .with_telemetry_timeout(Duration::from_millis(100))
            .with_video_timeout(Duration::from_millis(100))
    }

    /// Next command string received, or `None` after `timeout`.
    pub async fn next_command(&mut self, timeout: Duration) -> Option<String> {
        tokio::time::timeout(timeout, self.commands.recv()).await.ok().flatten()
    }

    /// Send raw bytes to a client socket.
    pub async fn send_to(&self, target: SocketAddr, bytes: &[u8]) -> std::io::Result<()> {
        self.socket.send_to(bytes, target).await.map(|_| ())
    }
}

impl Drop for SimulatedPeer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datagrams_split_on_max_size() {
        let datagrams = video_datagrams(&[3000, 200], 1460);
        let sizes: Vec<usize> = datagrams.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![1460, 1460, 80, 200]);
        assert!(datagrams[3].iter().all(|&b| b == 1));
    }
}
