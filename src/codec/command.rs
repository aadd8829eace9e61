//! Command wire strings and acknowledgment detection

use crate::CommandKind;

/// Encode a command to its wire string.
///
/// The parameter is substituted verbatim and never validated here; an invalid
/// value simply produces a command the aircraft rejects. Parameterized kinds
/// without a parameter substitute the empty string, and parameterless kinds
/// ignore any parameter given.
pub fn encode(kind: CommandKind, parameter: Option<&str>) -> String {
    let p = parameter.unwrap_or("");
    match kind {
        CommandKind::Connect => "command".to_string(),
        CommandKind::Takeoff => "takeoff".to_string(),
        CommandKind::Land => "land".to_string(),
        CommandKind::Emergency => "emergency".to_string(),
        CommandKind::Stop => "stop".to_string(),
        CommandKind::Up => format!("up {p}"),
        CommandKind::Down => format!("down {p}"),
        CommandKind::Left => format!("left {p}"),
        CommandKind::Right => format!("right {p}"),
        CommandKind::Forward => format!("forward {p}"),
        CommandKind::Backward => format!("back {p}"),
        CommandKind::RotateClockwise => format!("cw {p}"),
        CommandKind::RotateCounterClockwise => format!("ccw {p}"),
        CommandKind::FlipForward => "flip f".to_string(),
        CommandKind::FlipBackward => "flip b".to_string(),
        CommandKind::FlipLeft => "flip l".to_string(),
        CommandKind::FlipRight => "flip r".to_string(),
        CommandKind::GetBattery => "battery?".to_string(),
        CommandKind::GetSpeed => "speed?".to_string(),
        CommandKind::SetSpeed => format!("speed {p}"),
        CommandKind::GetTime => "time?".to_string(),
        CommandKind::GetHeight => "height?".to_string(),
        CommandKind::GetTemperature => "temp?".to_string(),
        CommandKind::GetAcceleration => "acceleration?".to_string(),
        CommandKind::GetTof => "tof?".to_string(),
        CommandKind::GetBarometer => "baro?".to_string(),
        CommandKind::StreamOn => "streamon".to_string(),
        CommandKind::StreamOff => "streamoff".to_string(),
    }
}

/// Whether a command reply acknowledges success.
///
/// True iff a reply was received and, trimmed and lower-cased, contains `ok`.
/// `None` stands for "no reply before the timeout".
pub fn is_acknowledgment(reply: Option<&str>) -> bool {
    reply.is_some_and(|r| r.trim().to_ascii_lowercase().contains("ok"))
}
