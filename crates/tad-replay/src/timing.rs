//! Inter-reading delays and playback pacing.
//!
//! Recorded trips are replayed with the same relative spacing they were
//! captured with, divided by a speed-up factor.  The detector never sees the
//! delays; pacing only changes how long a replay takes on the wall clock.

use std::thread;
use std::time::Duration;

use tad_core::{Reading, Timestamp};

/// Delay before each reading, relative to the one before it.
///
/// The first delay is zero.  When every reading carries a monotonic clock
/// value the delays come from it; otherwise the whole trip falls back to
/// epoch milliseconds, since not all recording devices expose the
/// monotonic clock.  Out-of-order timestamps give a zero delay.
pub fn reading_delays(readings: &[Reading]) -> Vec<Duration> {
    let monotonic = readings.iter().all(|r| r.timestamp.elapsed_nanos.is_some());
    let clock = |r: &Reading| {
        if monotonic {
            r.timestamp
        } else {
            Timestamp::from_epoch_millis(r.timestamp.epoch_millis)
        }
    };

    let mut delays = Vec::with_capacity(readings.len());
    if !readings.is_empty() {
        delays.push(Duration::ZERO);
    }
    delays.extend(
        readings
            .windows(2)
            .map(|pair| clock(&pair[1]).since(clock(&pair[0]))),
    );
    delays
}

/// Waits out the delay before each replayed reading.
pub trait Pacer {
    fn wait(&mut self, delay: Duration);
}

/// Feeds readings back to back.
pub struct InstantPacer;

impl Pacer for InstantPacer {
    fn wait(&mut self, _delay: Duration) {}
}

/// Sleeps for each recorded delay divided by `speed_up`.
pub struct SleepPacer {
    speed_up: u32,
}

impl SleepPacer {
    /// `speed_up` of 0 is treated as 1 (real time).
    pub fn new(speed_up: u32) -> Self {
        Self { speed_up: speed_up.max(1) }
    }

    /// The wall-clock time actually slept for a recorded `delay`.
    #[inline]
    pub fn scaled(&self, delay: Duration) -> Duration {
        delay / self.speed_up
    }
}

impl Pacer for SleepPacer {
    fn wait(&mut self, delay: Duration) {
        let scaled = self.scaled(delay);
        if !scaled.is_zero() {
            thread::sleep(scaled);
        }
    }
}
