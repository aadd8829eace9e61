//! Error types for the Tello protocol client.
//!
//! Every fallible operation in this crate returns [`ClientError`]. Errors carry
//! enough structured context to decide whether the caller should retry, and
//! each variant provides recovery guidance.
//!
//! ## Error Categories
//!
//! - **Bind Errors**: A local UDP endpoint could not be opened
//! - **Handshake Errors**: The peer answered the `command` handshake negatively
//! - **Timeouts**: The peer did not answer within the configured bound
//! - **Not Connected**: A command was issued before a successful handshake
//! - **Transmit / Receive Errors**: Socket I/O failed on an open channel
//! - **Config Errors**: Configuration could not be loaded or is invalid
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use tellolink::ClientError;
//!
//! let error = ClientError::handshake_rejected("error");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Main error type for client operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ClientError {
    #[error("Failed to bind {channel} socket on {addr}")]
    Bind {
        channel: &'static str,
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Handshake rejected by peer: {reply:?}")]
    Handshake { reply: String },

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    #[error("Command channel is not connected")]
    NotConnected,

    #[error("Failed to transmit {command:?}")]
    Transmit {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Receive failed on {channel} channel")]
    Receive {
        channel: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {reason}")]
    Config {
        reason: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("I/O error")]
    Io {
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Handshake { .. } => true,
            ClientError::Timeout { .. } => true,
            ClientError::Transmit { .. } => true,
            ClientError::Receive { .. } => true,
            ClientError::NotConnected => true,
            ClientError::Bind { .. } => false,
            ClientError::Config { .. } => false,
            ClientError::Io { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            ClientError::Bind { .. } => vec![
                "Check that no other program is using the local port",
                "Close any previous session before opening a new one",
                "Configure a different local port",
            ],
            ClientError::Handshake { .. } => vec![
                "Retry the handshake",
                "Power-cycle the aircraft",
                "Check the aircraft firmware supports SDK mode",
            ],
            ClientError::Timeout { .. } => vec![
                "Verify the host is joined to the aircraft's Wi-Fi network",
                "Increase the handshake timeout",
                "Check the configured peer address",
            ],
            ClientError::NotConnected => vec![
                "Call connect() and wait for it to succeed",
                "Reconnect after the session was closed",
            ],
            ClientError::Transmit { .. } => vec![
                "Retry the command",
                "Check the network interface is still up",
            ],
            ClientError::Receive { .. } => vec![
                "Check the network interface is still up",
                "Reconnect if the channel stays degraded",
            ],
            ClientError::Config { .. } => vec![
                "Check the configuration file syntax",
                "Verify timeouts and queue depth are non-zero",
            ],
            ClientError::Io { .. } => vec![
                "Check system resources",
                "Restart the session",
            ],
        }
    }

    /// Helper constructor for bind failures.
    pub fn bind_failed(channel: &'static str, addr: SocketAddr, source: std::io::Error) -> Self {
        ClientError::Bind { channel, addr, source }
    }

    /// Helper constructor for negative or garbled handshake replies.
    pub fn handshake_rejected(reply: impl Into<String>) -> Self {
        ClientError::Handshake { reply: reply.into() }
    }

    /// Helper constructor for transmit failures.
    pub fn transmit_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        ClientError::Transmit { command: command.into(), source }
    }

    /// Helper constructor for receive failures on a background loop.
    pub fn receive_failed(channel: &'static str, source: std::io::Error) -> Self {
        ClientError::Receive { channel, source }
    }

    /// Helper constructor for configuration errors.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        ClientError::Config { reason: reason.into(), path: None, source: None }
    }

    /// Helper constructor for configuration errors tied to a file.
    pub fn config_file_error(
        path: PathBuf,
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        ClientError::Config { reason: reason.into(), path: Some(path), source: Some(source) }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Io { source: err }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, SocketAddrV4};

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn error_messages_carry_their_context(
                reply in "[a-z ]{0,32}",
                command in "[a-z]+ [0-9]{1,3}",
                duration_ms in 1u64..60_000u64,
            ) {
                let handshake = ClientError::handshake_rejected(reply.clone());
                let quoted = format!("{reply:?}");
                prop_assert!(handshake.to_string().contains(&quoted));

                let transmit = ClientError::transmit_failed(
                    command.clone(),
                    std::io::Error::other("down"),
                );
                prop_assert!(transmit.to_string().contains(&command));

                let timeout = ClientError::Timeout { duration: Duration::from_millis(duration_ms) };
                prop_assert!(!timeout.to_string().is_empty());
            }
        }
    }

    #[test]
    fn error_traits_validation() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<ClientError>();

        let error = ClientError::NotConnected;
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn retry_classification() {
        let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 9000));
        let bind = ClientError::bind_failed("command", addr, std::io::Error::other("in use"));

        assert!(ClientError::handshake_rejected("error").is_retryable());
        assert!(ClientError::Timeout { duration: Duration::from_secs(3) }.is_retryable());
        assert!(ClientError::NotConnected.is_retryable());
        assert!(!bind.is_retryable());
        assert!(!ClientError::invalid_config("zero queue depth").is_retryable());

        for suggestion in bind.recovery_suggestions() {
            assert!(suggestion.len() > 5);
        }
    }

    #[test]
    fn source_chain_is_preserved() {
        let err = ClientError::receive_failed(
            "telemetry",
            std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer"),
        );
        let source = std::error::Error::source(&err).expect("receive error has a source");
        assert_eq!(source.to_string(), "reset by peer");
    }

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "busy");
        match ClientError::from(io_err) {
            ClientError::Io { source } => assert_eq!(source.kind(), std::io::ErrorKind::AddrInUse),
            other => panic!("Expected Io variant, got {other:?}"),
        }
    }
}
