//! Typed telemetry records

use serde::{Deserialize, Serialize};

/// One complete telemetry sample from the aircraft.
///
/// Every field defaults to zero, so a snapshot is always total even when the
/// record it came from was partial. Snapshots supersede each other; nothing
/// is carried over from the previous sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Pitch in degrees
    pub pitch: i32,
    /// Roll in degrees
    pub roll: i32,
    /// Yaw in degrees
    pub yaw: i32,
    /// X velocity in cm/s
    pub vgx: i32,
    /// Y velocity in cm/s
    pub vgy: i32,
    /// Z velocity in cm/s
    pub vgz: i32,
    /// Lowest temperature in °C
    pub templ: i32,
    /// Highest temperature in °C
    pub temph: i32,
    /// Time-of-flight distance in cm
    pub tof: i32,
    /// Height in cm
    pub h: i32,
    /// Battery percentage
    pub bat: i32,
    /// Barometer height in m
    pub baro: f32,
    /// Motor-on time in seconds
    pub time: i32,
    /// X acceleration in 0.001 g
    pub agx: f32,
    /// Y acceleration in 0.001 g
    pub agy: f32,
    /// Z acceleration in 0.001 g
    pub agz: f32,
}

impl TelemetrySnapshot {
    pub fn battery(&self) -> i32 {
        self.bat
    }

    pub fn height(&self) -> i32 {
        self.h
    }

    pub fn flight_time(&self) -> i32 {
        self.time
    }

    /// `(low, high)` temperature in °C
    pub fn temperature_range(&self) -> (i32, i32) {
        (self.templ, self.temph)
    }

    /// `(pitch, roll, yaw)` in degrees
    pub fn attitude(&self) -> (i32, i32, i32) {
        (self.pitch, self.roll, self.yaw)
    }

    /// `(vgx, vgy, vgz)` in cm/s
    pub fn velocity(&self) -> (i32, i32, i32) {
        (self.vgx, self.vgy, self.vgz)
    }

    /// `(agx, agy, agz)` in 0.001 g
    pub fn acceleration(&self) -> (f32, f32, f32) {
        (self.agx, self.agy, self.agz)
    }
}
