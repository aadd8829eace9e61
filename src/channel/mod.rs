//! The three UDP channels to the aircraft.
//!
//! Each channel owns its socket exclusively and exposes an explicit
//! [`ChannelState`](crate::ChannelState). The command channel is driven
//! directly by the caller; telemetry and video run background receive loops
//! through the [`Driver`](crate::driver::Driver).

pub mod command;
pub mod telemetry;
pub mod video;

pub use command::CommandChannel;
pub use telemetry::TelemetryChannel;
pub use video::VideoChannel;

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::watch;

use crate::driver::DriverHandle;
use crate::{ChannelHealth, ChannelState, ClientError, Result};

/// A started receive loop and the address its socket is bound to
struct RunningLoop {
    driver: DriverHandle,
    local_addr: SocketAddr,
}

/// Start/stop bookkeeping shared by the receive channels
struct LoopSlot {
    name: &'static str,
    bind_addr: SocketAddr,
    health: Arc<watch::Sender<ChannelHealth>>,
    running: Option<RunningLoop>,
}

impl LoopSlot {
    fn new(name: &'static str, bind_addr: SocketAddr) -> Self {
        Self {
            name,
            bind_addr,
            health: Arc::new(watch::channel(ChannelHealth::Healthy).0),
            running: None,
        }
    }

    fn state(&self) -> ChannelState {
        match self.running {
            Some(_) => ChannelState::Open,
            None => ChannelState::Closed,
        }
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.local_addr)
    }

    async fn bind(&self) -> Result<(UdpSocket, SocketAddr)> {
        let socket = UdpSocket::bind(self.bind_addr)
            .await
            .map_err(|e| ClientError::bind_failed(self.name, self.bind_addr, e))?;
        let local_addr = socket.local_addr()?;
        Ok((socket, local_addr))
    }

    async fn stop(&mut self) -> bool {
        match self.running.take() {
            Some(running) => {
                running.driver.stop().await;
                true
            }
            None => false,
        }
    }
}
