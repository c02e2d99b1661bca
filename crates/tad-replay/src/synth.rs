//! Deterministic synthetic trips.
//!
//! A vehicle drives due north at a constant cruise speed, passing the before
//! stop and then the destination.  Positions get uniform jitter, reported
//! speeds get uniform noise, and every `outlier_every`-th fix can be replaced
//! by a degraded one snapped onto the before stop, the way a phone's network
//! provider sometimes reports the nearest cell site.
//!
//! The same seed always yields the same trip.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use tad_core::{GeoPoint, Reading, ReferenceStop, Timestamp, TripId};

use crate::record::{RecordedTrip, TripHeader};

const START_EPOCH_MILLIS: i64 = 1_426_096_800_000;
const START_ELAPSED_NANOS: u64 = 3_500_000_000_000;

/// Parameters for a synthetic trip.  Build with [`SyntheticTrip::build`].
#[derive(Clone, Debug)]
pub struct SyntheticTrip {
    pub trip_id:            String,
    pub before:             GeoPoint,
    /// Distance driven before reaching the before stop, metres.
    pub approach_m:         f64,
    /// Before stop to destination, metres.
    pub leg_m:              f64,
    /// Distance driven past the destination, metres.
    pub overshoot_m:        f64,
    pub cruise_mps:         f64,
    pub interval_secs:      f64,
    /// Maximum position error along each axis, metres.
    pub jitter_m:           f64,
    /// Maximum error of the reported speed, m/s.
    pub speed_noise_mps:    f64,
    pub accuracy_m:         f64,
    /// Replace every n-th fix with a degraded one at the before stop.
    pub outlier_every:      Option<usize>,
    pub outlier_accuracy_m: f64,
    /// Stamp readings with a monotonic clock as well as epoch millis.
    pub monotonic_clock:    bool,
    pub seed:               u64,
}

impl Default for SyntheticTrip {
    fn default() -> Self {
        Self {
            trip_id:            "synthetic".into(),
            before:             GeoPoint::new(28.0587, -82.4139),
            approach_m:         2_000.0,
            leg_m:              800.0,
            overshoot_m:        200.0,
            cruise_mps:         10.0,
            interval_secs:      1.0,
            jitter_m:           3.0,
            speed_noise_mps:    0.5,
            accuracy_m:         8.0,
            outlier_every:      None,
            outlier_accuracy_m: 400.0,
            monotonic_clock:    true,
            seed:               7,
        }
    }
}

impl SyntheticTrip {
    /// Metres north of the before stop at reading `index`, before jitter.
    pub fn northing_at(&self, index: usize) -> f64 {
        -self.approach_m + index as f64 * self.step_m()
    }

    fn step_m(&self) -> f64 {
        self.cruise_mps * self.interval_secs
    }

    fn is_outlier(&self, index: usize) -> bool {
        self.outlier_every.is_some_and(|n| n > 0 && (index + 1) % n == 0)
    }

    pub fn build(&self) -> RecordedTrip {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let step = self.step_m();
        let total = self.approach_m + self.leg_m + self.overshoot_m;
        let count = if step > 0.0 { (total / step).floor() as usize + 1 } else { 1 };
        let interval_ms = (self.interval_secs * 1_000.0).round() as i64;
        let interval_ns = (self.interval_secs * 1e9).round() as u64;

        let destination = self.before.offset_m(self.leg_m, 0.0);
        let mut readings = Vec::with_capacity(count);

        for i in 0..count {
            let outlier = self.is_outlier(i);
            let (north, accuracy) = if outlier {
                (0.0, self.outlier_accuracy_m)
            } else {
                (self.northing_at(i), self.accuracy_m)
            };
            let jitter_n = symmetric(&mut rng, self.jitter_m);
            let jitter_e = symmetric(&mut rng, self.jitter_m);
            let speed_noise = symmetric(&mut rng, self.speed_noise_mps);

            let timestamp = Timestamp::new(
                self.monotonic_clock.then(|| START_ELAPSED_NANOS + i as u64 * interval_ns),
                START_EPOCH_MILLIS + i as i64 * interval_ms,
            );
            let mut reading = Reading::new(
                timestamp,
                self.before.offset_m(north + jitter_n, jitter_e),
                (self.cruise_mps + speed_noise).max(0.0),
                accuracy,
            );
            if outlier {
                reading.provider = "network".into();
            } else {
                reading.satellites = 9;
            }
            readings.push(reading);
        }

        RecordedTrip {
            header: TripHeader {
                trip_id:     TripId::new(self.trip_id.clone()),
                destination: ReferenceStop::new("destination", destination),
                before:      ReferenceStop::new("before", self.before),
            },
            sequence:        (0..count as u32).collect(),
            readings,
            expected_ready:  None,
            expected_finish: None,
        }
    }
}

/// Uniform sample in `[-width, width]`.  The sign of `width` is ignored and a
/// non-finite width means no noise.
fn symmetric(rng: &mut SmallRng, width: f64) -> f64 {
    let width = if width.is_finite() { width.abs() } else { 0.0 };
    rng.gen_range(-width..=width)
}
