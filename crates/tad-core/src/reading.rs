//! A single positioning sample and its plausibility check.

use thiserror::Error;

use crate::{GeoPoint, Timestamp};

/// One timestamped positioning sample.
///
/// Only `position`, `speed_mps` and `accuracy_m` influence alerting;
/// altitude, bearing, satellite count and provider are carried for logging
/// and trace output.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reading {
    pub timestamp:   Timestamp,
    pub position:    GeoPoint,
    /// Metres above the WGS-84 ellipsoid.
    pub altitude_m:  f64,
    /// Ground speed in metres per second.  Zero when the device did not
    /// report a speed.
    pub speed_mps:   f64,
    /// Degrees clockwise from true north.
    pub bearing_deg: f64,
    /// Radius of the 68 % confidence circle, metres.
    pub accuracy_m:  f64,
    pub satellites:  u32,
    /// Source of the fix (`gps`, `network`, `fused`, …).
    pub provider:    String,
}

/// Why a reading was rejected as physically impossible.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ReadingError {
    #[error("coordinates {0} outside WGS-84 range")]
    InvalidPosition(GeoPoint),

    #[error("speed {0} m/s is negative or not finite")]
    InvalidSpeed(f64),

    #[error("accuracy {0} m is negative or not finite")]
    InvalidAccuracy(f64),
}

impl Reading {
    /// A GPS reading at `position` with the given speed and accuracy; the
    /// informational fields are zeroed.
    pub fn new(timestamp: Timestamp, position: GeoPoint, speed_mps: f64, accuracy_m: f64) -> Self {
        Self {
            timestamp,
            position,
            altitude_m: 0.0,
            speed_mps,
            bearing_deg: 0.0,
            accuracy_m,
            satellites: 0,
            provider: "gps".to_owned(),
        }
    }

    /// Reject readings that cannot describe a real fix.
    ///
    /// Altitude and bearing are informational and are not checked.
    pub fn validate(&self) -> Result<(), ReadingError> {
        if !self.position.is_valid() {
            return Err(ReadingError::InvalidPosition(self.position));
        }
        if !self.speed_mps.is_finite() || self.speed_mps < 0.0 {
            return Err(ReadingError::InvalidSpeed(self.speed_mps));
        }
        if !self.accuracy_m.is_finite() || self.accuracy_m < 0.0 {
            return Err(ReadingError::InvalidAccuracy(self.accuracy_m));
        }
        Ok(())
    }
}
