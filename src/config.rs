//! Client configuration.
//!
//! [`ClientConfig`] holds the peer address, the three channel ports, the
//! timeouts used by each channel and the video queue depth. All fields have
//! defaults matching the Tello SDK, so an empty YAML document is a valid
//! configuration:
//!
//! ```rust
//! use tellolink::ClientConfig;
//!
//! let config = ClientConfig::from_yaml_str("handshake_timeout_ms: 5000\n").unwrap();
//! assert_eq!(config.handshake_timeout().as_millis(), 5000);
//! assert_eq!(config.video_queue_depth, 5);
//! ```

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::{ClientError, Result};

/// Default peer address of the aircraft on its own access point.
pub const DEFAULT_PEER_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 10, 1));
/// Peer port accepting command strings.
pub const DEFAULT_COMMAND_PORT: u16 = 8889;
/// Local port the command socket binds to.
pub const DEFAULT_LOCAL_COMMAND_PORT: u16 = 9000;
/// Local port telemetry records arrive on.
pub const DEFAULT_TELEMETRY_PORT: u16 = 8890;
/// Local port video datagrams arrive on.
pub const DEFAULT_VIDEO_PORT: u16 = 11111;
/// Largest video payload the link carries in one datagram.
pub const MAX_VIDEO_DATAGRAM: usize = 1460;
/// Largest receive buffer a single UDP datagram can need.
pub const MAX_UDP_DATAGRAM: usize = 65_536;

/// Configuration for a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Address of the aircraft
    pub peer_ip: IpAddr,

    /// Peer port for commands
    pub command_port: u16,

    /// Local address all sockets bind to
    pub bind_ip: IpAddr,

    /// Local port for the command socket (0 picks an ephemeral port)
    pub local_command_port: u16,

    /// Local port for telemetry (0 picks an ephemeral port)
    pub telemetry_port: u16,

    /// Local port for video (0 picks an ephemeral port)
    pub video_port: u16,

    /// Bound on the single handshake receive
    pub handshake_timeout_ms: u64,

    /// Receive timeout of the telemetry loop
    pub telemetry_timeout_ms: u64,

    /// Receive timeout of the video loop
    pub video_timeout_ms: u64,

    /// Capacity of the completed access unit queue
    pub video_queue_depth: usize,

    /// Datagram size that marks a continuation fragment
    pub max_video_datagram: usize,

    /// Receive buffer for one telemetry datagram
    pub telemetry_recv_buffer: usize,

    /// Receive buffer for one video datagram
    pub video_recv_buffer: usize,

    /// Consecutive receive failures before a loop reports itself degraded
    pub degraded_after: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            peer_ip: DEFAULT_PEER_IP,
            command_port: DEFAULT_COMMAND_PORT,
            bind_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            local_command_port: DEFAULT_LOCAL_COMMAND_PORT,
            telemetry_port: DEFAULT_TELEMETRY_PORT,
            video_port: DEFAULT_VIDEO_PORT,
            handshake_timeout_ms: 3000,
            telemetry_timeout_ms: 1000,
            video_timeout_ms: 2000,
            video_queue_depth: 5,
            max_video_datagram: MAX_VIDEO_DATAGRAM,
            telemetry_recv_buffer: 1518,
            video_recv_buffer: 2048,
            degraded_after: 3,
        }
    }
}

impl ClientConfig {
    /// Parse a configuration from YAML. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| ClientError::Config {
            reason: e.to_string(),
            path: None,
            source: Some(Box::new(e)),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading client configuration from {}", path.display());

        let text = std::fs::read_to_string(path).map_err(|e| {
            ClientError::config_file_error(path.to_path_buf(), "cannot read file", Box::new(e))
        })?;

        Self::from_yaml_str(&text).map_err(|e| match e {
            ClientError::Config { reason, source, .. } => {
                ClientError::Config { reason, path: Some(path.to_path_buf()), source }
            }
            other => other,
        })
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.video_queue_depth == 0 {
            return Err(ClientError::invalid_config("video_queue_depth must be at least 1"));
        }
        if self.max_video_datagram == 0 {
            return Err(ClientError::invalid_config("max_video_datagram must be at least 1"));
        }
        for (name, size) in [
            ("max_video_datagram", self.max_video_datagram),
            ("video_recv_buffer", self.video_recv_buffer),
            ("telemetry_recv_buffer", self.telemetry_recv_buffer),
        ] {
            if size > MAX_UDP_DATAGRAM {
                return Err(ClientError::invalid_config(format!(
                    "{name} ({size}) exceeds the UDP datagram limit of {MAX_UDP_DATAGRAM}"
                )));
            }
        }
        if self.video_recv_buffer <= self.max_video_datagram {
            return Err(ClientError::invalid_config(format!(
                "video_recv_buffer ({}) must exceed max_video_datagram ({})",
                self.video_recv_buffer, self.max_video_datagram
            )));
        }
        if self.telemetry_recv_buffer == 0 {
            return Err(ClientError::invalid_config("telemetry_recv_buffer must be at least 1"));
        }
        for (name, ms) in [
            ("handshake_timeout_ms", self.handshake_timeout_ms),
            ("telemetry_timeout_ms", self.telemetry_timeout_ms),
            ("video_timeout_ms", self.video_timeout_ms),
        ] {
            if ms == 0 {
                return Err(ClientError::invalid_config(format!("{name} must be non-zero")));
            }
        }
        if self.degraded_after == 0 {
            return Err(ClientError::invalid_config("degraded_after must be at least 1"));
        }
        Ok(())
    }

    /// Point every socket at the given peer, binding locally on ephemeral ports.
    ///
    /// Used when talking to a simulator on the same host.
    pub fn local_peer(peer: SocketAddr) -> Self {
        let bind_ip =
            if peer.ip().is_loopback() { peer.ip() } else { IpAddr::V4(Ipv4Addr::UNSPECIFIED) };
        Self {
            peer_ip: peer.ip(),
            command_port: peer.port(),
            bind_ip,
            local_command_port: 0,
            telemetry_port: 0,
            video_port: 0,
            ..Self::default()
        }
    }

    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout_ms = saturating_millis(timeout);
        self
    }

    pub fn with_telemetry_timeout(mut self, timeout: Duration) -> Self {
        self.telemetry_timeout_ms = saturating_millis(timeout);
        self
    }

    pub fn with_video_timeout(mut self, timeout: Duration) -> Self {
        self.video_timeout_ms = saturating_millis(timeout);
        self
    }

    pub fn with_video_queue_depth(mut self, depth: usize) -> Self {
        self.video_queue_depth = depth;
        self
    }

    /// Address commands are sent to
    pub fn peer_addr(&self) -> SocketAddr {
        SocketAddr::new(self.peer_ip, self.command_port)
    }

    pub fn command_bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.local_command_port)
    }

    pub fn telemetry_bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.telemetry_port)
    }

    pub fn video_bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.video_port)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }

    pub fn telemetry_timeout(&self) -> Duration {
        Duration::from_millis(self.telemetry_timeout_ms)
    }

    pub fn video_timeout(&self) -> Duration {
        Duration::from_millis(self.video_timeout_ms)
    }
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_sdk() {
        let config = ClientConfig::default();
        assert_eq!(config.peer_addr(), "192.168.10.1:8889".parse().unwrap());
        assert_eq!(config.command_bind_addr().port(), 9000);
        assert_eq!(config.telemetry_bind_addr().port(), 8890);
        assert_eq!(config.video_bind_addr().port(), 11111);
        assert_eq!(config.handshake_timeout(), Duration::from_millis(3000));
        assert_eq!(config.telemetry_timeout(), Duration::from_millis(1000));
        assert_eq!(config.video_timeout(), Duration::from_millis(2000));
        assert_eq!(config.video_queue_depth, 5);
        assert_eq!(config.max_video_datagram, 1460);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_yaml_is_default() {
        let config = ClientConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn yaml_overrides_selected_fields() {
        let yaml = "peer_ip: 10.0.0.7\nvideo_port: 12000\nvideo_queue_depth: 8\n";
        let config = ClientConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.peer_ip, "10.0.0.7".parse::<IpAddr>().unwrap());
        assert_eq!(config.video_port, 12000);
        assert_eq!(config.video_queue_depth, 8);
        assert_eq!(config.telemetry_port, DEFAULT_TELEMETRY_PORT);
    }

    #[test]
    fn oversized_buffers_are_rejected() {
        let err = ClientConfig::from_yaml_str("max_video_datagram: 70000\nvideo_recv_buffer: 80000\n")
            .unwrap_err();
        assert!(err.to_string().contains("max_video_datagram"), "{err}");

        let err = ClientConfig::from_yaml_str("telemetry_recv_buffer: 100000\n").unwrap_err();
        assert!(matches!(err, ClientError::Config { .. }));
    }

    #[test]
    fn huge_timeouts_saturate() {
        let config = ClientConfig::default().with_handshake_timeout(Duration::MAX);
        assert_eq!(config.handshake_timeout_ms, u64::MAX);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_queue_depth_is_rejected() {
        let err = ClientConfig::from_yaml_str("video_queue_depth: 0\n").unwrap_err();
        assert!(matches!(err, ClientError::Config { .. }));
    }

    #[test]
    fn malformed_yaml_is_config_error() {
        let err = ClientConfig::from_yaml_str("handshake_timeout_ms: [not, a, number]\n")
            .unwrap_err();
        assert!(matches!(err, ClientError::Config { source: Some(_), .. }));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ClientConfig::from_file("/nonexistent/tellolink.yaml").unwrap_err();
        match err {
            ClientError::Config { path: Some(path), .. } => {
                assert!(path.ends_with("tellolink.yaml"))
            }
            other => panic!("Expected Config error with path, got {other:?}"),
        }
    }

    #[test]
    fn local_peer_uses_ephemeral_ports() {
        let config = ClientConfig::local_peer("127.0.0.1:40000".parse().unwrap());
        assert_eq!(config.peer_addr().port(), 40000);
        assert_eq!(config.command_bind_addr(), "127.0.0.1:0".parse().unwrap());
        assert_eq!(config.telemetry_bind_addr().port(), 0);
        assert_eq!(config.video_bind_addr().port(), 0);
    }
}
