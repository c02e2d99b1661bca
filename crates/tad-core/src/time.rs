//! Reading timestamps.
//!
//! Devices that expose a monotonic boot clock stamp each fix with
//! nanoseconds since boot; older devices only provide wall-clock epoch
//! milliseconds.  Intervals prefer the monotonic clock when both readings
//! carry it and fall back to epoch milliseconds otherwise.
//!
//! Intervals are never negative: readings that arrive out of order yield a
//! zero interval instead of a negative one.

use std::fmt;
use std::time::Duration;

/// When a positioning reading was taken.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp {
    /// Monotonic clock value (nanoseconds since device boot), if available.
    pub elapsed_nanos: Option<u64>,
    /// Wall-clock time in milliseconds since the Unix epoch.
    pub epoch_millis: i64,
}

impl Timestamp {
    #[inline]
    pub fn new(elapsed_nanos: Option<u64>, epoch_millis: i64) -> Self {
        Self { elapsed_nanos, epoch_millis }
    }

    /// Wall-clock-only timestamp.
    #[inline]
    pub fn from_epoch_millis(epoch_millis: i64) -> Self {
        Self { elapsed_nanos: None, epoch_millis }
    }

    /// Interval from `earlier` to `self`, clamped to zero.
    ///
    /// Uses the monotonic clock when both timestamps carry one, otherwise the
    /// epoch-millisecond difference.
    pub fn since(self, earlier: Timestamp) -> Duration {
        match (self.elapsed_nanos, earlier.elapsed_nanos) {
            (Some(now), Some(then)) => Duration::from_nanos(now.saturating_sub(then)),
            _ => {
                let millis = self.epoch_millis.saturating_sub(earlier.epoch_millis).max(0);
                Duration::from_millis(millis as u64)
            }
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.elapsed_nanos {
            Some(nanos) => write!(f, "{}ms (+{}ns)", self.epoch_millis, nanos),
            None => write!(f, "{}ms", self.epoch_millis),
        }
    }
}
