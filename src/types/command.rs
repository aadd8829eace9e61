//! Command identifiers and per-send requests

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codec;

/// Every command the client knows how to encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    /// Enter SDK mode; the handshake
    Connect,
    Takeoff,
    Land,
    /// Stop all motors immediately
    Emergency,
    /// Hover in place
    Stop,
    Up,
    Down,
    Left,
    Right,
    Forward,
    Backward,
    RotateClockwise,
    RotateCounterClockwise,
    FlipForward,
    FlipBackward,
    FlipLeft,
    FlipRight,
    GetBattery,
    GetSpeed,
    SetSpeed,
    GetTime,
    GetHeight,
    GetTemperature,
    GetAcceleration,
    GetTof,
    GetBarometer,
    StreamOn,
    StreamOff,
}

impl CommandKind {
    /// All command kinds, in protocol table order.
    pub const ALL: [CommandKind; 28] = [
        CommandKind::Connect,
        CommandKind::Takeoff,
        CommandKind::Land,
        CommandKind::Emergency,
        CommandKind::Stop,
        CommandKind::Up,
        CommandKind::Down,
        CommandKind::Left,
        CommandKind::Right,
        CommandKind::Forward,
        CommandKind::Backward,
        CommandKind::RotateClockwise,
        CommandKind::RotateCounterClockwise,
        CommandKind::FlipForward,
        CommandKind::FlipBackward,
        CommandKind::FlipLeft,
        CommandKind::FlipRight,
        CommandKind::GetBattery,
        CommandKind::GetSpeed,
        CommandKind::SetSpeed,
        CommandKind::GetTime,
        CommandKind::GetHeight,
        CommandKind::GetTemperature,
        CommandKind::GetAcceleration,
        CommandKind::GetTof,
        CommandKind::GetBarometer,
        CommandKind::StreamOn,
        CommandKind::StreamOff,
    ];

    /// Whether the wire template substitutes a parameter.
    pub fn takes_parameter(self) -> bool {
        matches!(
            self,
            CommandKind::Up
                | CommandKind::Down
                | CommandKind::Left
                | CommandKind::Right
                | CommandKind::Forward
                | CommandKind::Backward
                | CommandKind::RotateClockwise
                | CommandKind::RotateCounterClockwise
                | CommandKind::SetSpeed
        )
    }
}

/// A single command to send, constructed per send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub kind: CommandKind,
    pub parameter: Option<String>,
}

impl CommandRequest {
    /// A request without a parameter
    pub fn new(kind: CommandKind) -> Self {
        Self { kind, parameter: None }
    }

    /// A request whose parameter is rendered with `Display` (numbers or text).
    pub fn with_param(kind: CommandKind, parameter: impl fmt::Display) -> Self {
        Self { kind, parameter: Some(parameter.to_string()) }
    }

    /// The exact wire string for this request
    pub fn wire(&self) -> String {
        codec::command::encode(self.kind, self.parameter.as_deref())
    }
}

impl From<CommandKind> for CommandRequest {
    fn from(kind: CommandKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for CommandRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.wire())
    }
}
