//! Feeds a recorded trip through an [`ArrivalDetector`] and checks when the
//! alerts fire.

use std::time::Duration;

use log::{debug, info};
use tad_core::{Reading, TripId};
use tad_detect::{ArrivalDetector, DetectorConfig, Phase, UpdateOutcome};

use crate::record::{Expectation, RecordedTrip};
use crate::timing::{reading_delays, Pacer};
use crate::{ReplayError, ReplayResult};

/// Replay settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReplayConfig {
    pub detector: DetectorConfig,
    /// Recorded delays are divided by this factor.  Default: 1,000,000,
    /// which replays hour-long trips in milliseconds.
    pub speed_up: u32,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            speed_up: 1_000_000,
        }
    }
}

impl ReplayConfig {
    pub fn validate(&self) -> ReplayResult<()> {
        if self.speed_up == 0 {
            return Err(ReplayError::Config("speed_up must be at least 1".into()));
        }
        self.detector.validate()?;
        Ok(())
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Callbacks invoked once per fed reading.
///
/// All methods have default no-op implementations.
pub trait ReplayObserver {
    /// `index` is the reading's position in the trip.  A reading fed twice
    /// (the get-ready reading during verification) is reported twice.
    fn on_step(&mut self, _index: usize, _reading: &Reading, _outcome: &UpdateOutcome, _phase: Phase) {}

    /// Called once after the last reading of a replay, success or not.
    fn on_replay_end(&mut self, _trip: &TripId) {}
}

/// A [`ReplayObserver`] that does nothing.
pub struct NoopReplayObserver;

impl ReplayObserver for NoopReplayObserver {}

// ── Report ────────────────────────────────────────────────────────────────────

/// What happened during one replay.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplayReport {
    pub trip_id:      TripId,
    /// Readings fed, counting repeats.
    pub readings_fed: usize,
    /// Index of the reading that fired get-ready.
    pub ready_at:     Option<usize>,
    /// Index of the reading that fired pull-the-cord.
    pub finished_at:  Option<usize>,
    pub rejected:     u64,
    pub low_accuracy: u64,
    /// Recorded time spanned by the fed readings.
    pub recorded:     Duration,
    /// Set when the replay was checked against expected indices.
    pub verified:     Option<Expectation>,
}

// ── Replay session ────────────────────────────────────────────────────────────

struct Session<'a, P: Pacer, O: ReplayObserver> {
    trip:     &'a RecordedTrip,
    detector: ArrivalDetector,
    delays:   Vec<Duration>,
    pacer:    &'a mut P,
    observer: &'a mut O,
    report:   ReplayReport,
}

impl<'a, P: Pacer, O: ReplayObserver> Session<'a, P, O> {
    fn new(
        trip: &'a RecordedTrip,
        config: &ReplayConfig,
        pacer: &'a mut P,
        observer: &'a mut O,
    ) -> ReplayResult<Self> {
        config.validate()?;
        let detector = trip.detector(config.detector.clone())?;
        Ok(Self {
            trip,
            detector,
            delays: reading_delays(&trip.readings),
            pacer,
            observer,
            report: ReplayReport {
                trip_id:      trip.trip_id().clone(),
                readings_fed: 0,
                ready_at:     None,
                finished_at:  None,
                rejected:     0,
                low_accuracy: 0,
                recorded:     Duration::ZERO,
                verified:     None,
            },
        })
    }

    fn feed(&mut self, index: usize) {
        let trip = self.trip;
        let reading = &trip.readings[index];
        let delay = self.delays[index];
        self.pacer.wait(delay);
        self.report.recorded += delay;

        let outcome = self.detector.update(reading);
        match outcome.transition() {
            Some(Phase::Ready) => self.report.ready_at = Some(index),
            Some(Phase::Finished) => self.report.finished_at = Some(index),
            _ => {}
        }
        self.report.readings_fed += 1;

        debug!(
            "{index}: ({:.6}, {:.6}, {:.1})\tR:{}  F:{}",
            reading.position.lat,
            reading.position.lon,
            reading.speed_mps,
            self.detector.is_ready(),
            self.detector.is_finished()
        );
        self.observer.on_step(index, reading, &outcome, self.detector.phase());
    }

    fn trip_id(&self) -> TripId {
        self.trip.trip_id().clone()
    }

    fn finish(mut self) -> ReplayReport {
        let stats = self.detector.stats();
        self.report.rejected = stats.rejected;
        self.report.low_accuracy = stats.low_accuracy;
        self.observer.on_replay_end(self.trip.trip_id());
        self.report
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Feed every reading of `trip` once and report where the alerts fired.
pub fn replay<P: Pacer, O: ReplayObserver>(
    trip: &RecordedTrip,
    config: &ReplayConfig,
    pacer: &mut P,
    observer: &mut O,
) -> ReplayResult<ReplayReport> {
    let mut session = Session::new(trip, config, pacer, observer)?;
    for index in 0..trip.len() {
        session.feed(index);
    }
    let report = session.finish();
    info!(
        "trip {}: replayed {} readings, ready at {:?}, finished at {:?}",
        report.trip_id, report.readings_fed, report.ready_at, report.finished_at
    );
    Ok(report)
}

/// Replay `trip` up to `expected.finish_index`, failing if either alert fires
/// before its expected reading or has not fired by it.
///
/// Readings `0..=ready_index` are fed first, then `ready_index..=finish_index`,
/// so the get-ready reading is delivered twice; a latched detector must not
/// change state on the repeat.
pub fn verify<P: Pacer, O: ReplayObserver>(
    trip: &RecordedTrip,
    expected: Expectation,
    config: &ReplayConfig,
    pacer: &mut P,
    observer: &mut O,
) -> ReplayResult<ReplayReport> {
    trip.check_expectation(expected)?;
    let mut session = Session::new(trip, config, pacer, observer)?;
    let result = check_alerts(&mut session, expected);
    let mut report = session.finish();
    result?;

    report.verified = Some(expected);
    info!(
        "trip {}: get ready at {} and pull the cord at {} as expected",
        report.trip_id, expected.ready_index, expected.finish_index
    );
    Ok(report)
}

/// [`verify`] against the indices flagged in the recording itself.
pub fn verify_recorded<P: Pacer, O: ReplayObserver>(
    trip: &RecordedTrip,
    config: &ReplayConfig,
    pacer: &mut P,
    observer: &mut O,
) -> ReplayResult<ReplayReport> {
    let expected = trip
        .expectation()
        .ok_or_else(|| ReplayError::NoExpectation { trip: trip.trip_id().clone() })?;
    verify(trip, expected, config, pacer, observer)
}

fn check_alerts<P: Pacer, O: ReplayObserver>(
    session: &mut Session<'_, P, O>,
    expected: Expectation,
) -> ReplayResult<()> {
    let Expectation { ready_index, finish_index } = expected;

    for index in 0..=ready_index {
        session.feed(index);
        if session.detector.is_ready() && index < ready_index {
            return Err(ReplayError::PrematureReady {
                trip: session.trip_id(),
                index,
                expected: ready_index,
            });
        }
    }
    if !session.detector.is_ready() {
        return Err(ReplayError::MissedReady { trip: session.trip_id(), expected: ready_index });
    }
    if session.detector.is_finished() {
        return Err(ReplayError::PrematureFinish {
            trip: session.trip_id(),
            index: ready_index,
            expected: finish_index,
        });
    }

    for index in ready_index..=finish_index {
        session.feed(index);
        if session.detector.is_finished() && index < finish_index {
            return Err(ReplayError::PrematureFinish {
                trip: session.trip_id(),
                index,
                expected: finish_index,
            });
        }
    }
    if !session.detector.is_finished() {
        return Err(ReplayError::MissedFinish { trip: session.trip_id(), expected: finish_index });
    }
    Ok(())
}
