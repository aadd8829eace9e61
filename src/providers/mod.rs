//! UDP providers for the telemetry and video channels

pub mod telemetry;
pub mod video;

pub use telemetry::TelemetryProvider;
pub use video::VideoProvider;

use std::time::Duration;
use tokio::net::UdpSocket;

use crate::{ClientError, Result};

/// One receive bounded by `timeout`. `Ok(None)` means the timeout elapsed.
pub(crate) async fn recv_within(
    socket: &UdpSocket,
    buf: &mut [u8],
    timeout: Duration,
    channel: &'static str,
) -> Result<Option<usize>> {
    match tokio::time::timeout(timeout, socket.recv_from(buf)).await {
        Err(_) => Ok(None),
        Ok(Ok((len, _from))) => Ok(Some(len)),
        Ok(Err(e)) => Err(ClientError::receive_failed(channel, e)),
    }
}
