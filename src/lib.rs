//! Async, type-safe client for the Tello UDP protocol.
//!
//! Tellolink talks to the aircraft over three UDP conversations with one peer:
//! a command channel (handshake plus fire-and-forget commands), a telemetry
//! channel pushing `key:value;` records, and a video channel carrying an H.264
//! elementary stream split across datagrams.
//!
//! # Features
//!
//! - **Commands**: Typed [`CommandKind`]s encoded to exact wire strings
//! - **Telemetry**: Always-total [`TelemetrySnapshot`]s with latest-value
//!   semantics and optional throttling
//! - **Video**: Datagrams reassembled into [`VideoAccessUnit`]s behind a
//!   bounded, drop-oldest queue so slow decoders never stall control
//! - **Isolation**: Each channel owns its socket and fails independently
//!
//! ## Example
//!
//! ```rust,no_run
//! use tellolink::{CommandKind, Tello, UpdateRate};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> tellolink::Result<()> {
//!     let mut session = Tello::connect().await?;
//!     let mut telemetry = Box::pin(session.telemetry(UpdateRate::Max(2)));
//!
//!     session.send_command(CommandKind::Takeoff, None).await?;
//!     session.send_command(CommandKind::RotateClockwise, Some("90")).await?;
//!
//!     if let Some(snapshot) = telemetry.next().await {
//!         println!("Battery: {}%", snapshot.battery());
//!     }
//!
//!     session.send_command(CommandKind::Land, None).await?;
//!     session.close().await;
//!     Ok(())
//! }
//! ```

// Core types and error handling
pub mod codec;
mod config;
mod error;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Channel architecture
pub mod channel;
pub mod driver;
pub mod provider;
pub mod providers;
pub mod session;
pub mod stream;
pub mod video;

// Core exports
pub use config::*;
pub use error::*;
pub use types::*;

// Main API exports
pub use session::Session;
pub use video::{ReassemblyStats, VideoStream};

/// Entry point for connecting to an aircraft.
///
/// ```rust,no_run
/// use tellolink::{ClientConfig, Tello};
///
/// # #[tokio::main]
/// # async fn main() -> tellolink::Result<()> {
/// let config = ClientConfig::from_file("tellolink.yaml")?;
/// let session = Tello::connect_with(config).await?;
/// # Ok(())
/// # }
/// ```
pub struct Tello;

impl Tello {
    /// Connect with the default configuration (aircraft at `192.168.10.1`).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A local port is already in use
    /// - The aircraft does not answer the handshake within 3 seconds
    /// - The aircraft rejects the handshake
    pub async fn connect() -> Result<Session> {
        Self::connect_with(ClientConfig::default()).await
    }

    /// Connect with a custom configuration.
    pub async fn connect_with(config: ClientConfig) -> Result<Session> {
        let mut session = Session::new(config)?;
        if let Err(e) = session.try_connect().await {
            session.close().await;
            return Err(e);
        }
        Ok(session)
    }
}
