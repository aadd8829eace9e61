//! Telemetry record parsing
//!
//! The aircraft pushes records like
//! `pitch:0;roll:0;yaw:0;vgx:0;vgy:0;vgz:0;templ:40;temph:45;tof:10;h:0;bat:80;baro:120.5;time:0;agx:0.0;agy:0.0;agz:-998.0;\r\n`.
//! Decoding is best-effort: fields that are missing or unparsable take their
//! zero default and the rest of the record is still used.

use std::collections::HashMap;
use std::str::FromStr;

use crate::TelemetrySnapshot;

/// Decode one telemetry record into a snapshot.
///
/// Never fails. Segments without a `:` are skipped, the last occurrence of a
/// duplicated key wins and unknown keys are ignored.
pub fn decode(record: &str) -> TelemetrySnapshot {
    let fields = split_fields(record);

    TelemetrySnapshot {
        pitch: field(&fields, "pitch"),
        roll: field(&fields, "roll"),
        yaw: field(&fields, "yaw"),
        vgx: field(&fields, "vgx"),
        vgy: field(&fields, "vgy"),
        vgz: field(&fields, "vgz"),
        templ: field(&fields, "templ"),
        temph: field(&fields, "temph"),
        tof: field(&fields, "tof"),
        h: field(&fields, "h"),
        bat: field(&fields, "bat"),
        baro: field(&fields, "baro"),
        time: field(&fields, "time"),
        agx: field(&fields, "agx"),
        agy: field(&fields, "agy"),
        agz: field(&fields, "agz"),
    }
}

fn split_fields(record: &str) -> HashMap<&str, &str> {
    record
        .trim()
        .split(';')
        .filter_map(|segment| segment.split_once(':'))
        .map(|(key, value)| (key.trim(), value.trim()))
        .collect()
}

fn field<T: FromStr + Default>(fields: &HashMap<&str, &str>, key: &str) -> T {
    fields.get(key).and_then(|value| value.parse().ok()).unwrap_or_default()
}
