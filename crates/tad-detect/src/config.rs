//! Detector tuning and the adaptive-radius policy.
//!
//! A fixed geofence fires too late for a fast vehicle and needlessly early
//! for a slow one.  The triggering radius therefore grows with speed:
//!
//! ```text
//! radius_m = base_radius_m + speed_mps * lead_time_secs
//! ```
//!
//! `base_radius_m` covers positioning error at rest; the speed term is the
//! distance covered during the rider's reaction window, so the remaining
//! *time* to the stop is roughly constant across speeds.
//!
//! The defaults were chosen against recorded bus and car trips; treat them as
//! starting points for calibration, not as constants of nature.

use crate::{DetectError, DetectResult};

/// Tuning parameters for [`ArrivalDetector`][crate::ArrivalDetector].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DetectorConfig {
    /// Triggering radius at standstill, metres.
    pub base_radius_m: f64,

    /// Seconds of travel added to the radius per unit of speed.
    pub lead_time_secs: f64,

    /// Readings with a larger uncertainty radius update bookkeeping but never
    /// fire an alert.
    pub max_accuracy_m: f64,

    /// When a reading reports zero speed, estimate speed from the previous
    /// reading instead.  Off by default: zero normally means stopped.  Turn
    /// it on for devices that report 0 when speed is unknown.
    pub infer_missing_speed: bool,

    /// Upper bound on an inferred speed, m/s.
    pub max_inferred_speed_mps: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            base_radius_m:          50.0,
            lead_time_secs:         10.0,
            max_accuracy_m:         100.0,
            infer_missing_speed:    false,
            max_inferred_speed_mps: 45.0,
        }
    }
}

impl DetectorConfig {
    /// Triggering distance for a vehicle travelling at `speed_mps`.
    ///
    /// Negative or non-finite speeds are treated as standstill.
    #[inline]
    pub fn adaptive_radius_m(&self, speed_mps: f64) -> f64 {
        let speed = if speed_mps.is_finite() { speed_mps.max(0.0) } else { 0.0 };
        self.base_radius_m + speed * self.lead_time_secs
    }

    /// `true` if a reading with this accuracy may cause a state transition.
    #[inline]
    pub fn is_trustworthy(&self, accuracy_m: f64) -> bool {
        accuracy_m <= self.max_accuracy_m
    }

    pub fn validate(&self) -> DetectResult<()> {
        let fields = [
            ("base_radius_m", self.base_radius_m),
            ("lead_time_secs", self.lead_time_secs),
            ("max_accuracy_m", self.max_accuracy_m),
            ("max_inferred_speed_mps", self.max_inferred_speed_mps),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(DetectError::Config(format!(
                    "{name} must be a non-negative finite number, got {value}"
                )));
            }
        }
        Ok(())
    }
}
