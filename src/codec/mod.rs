//! Pure wire codecs.
//!
//! - [`command`] maps a [`CommandKind`](crate::CommandKind) and parameter to
//!   the ASCII string the aircraft expects and recognizes acknowledgments
//! - [`telemetry`] turns a `key:value;` record into a
//!   [`TelemetrySnapshot`](crate::TelemetrySnapshot)
//!
//! Neither codec performs I/O or keeps state.

pub mod command;
pub mod telemetry;

pub use command::{encode, is_acknowledgment};
pub use telemetry::decode;
