//! Replaying a batch of recorded trips.
//!
//! Trips are independent (one detector each), so with the `parallel` Cargo
//! feature they run on Rayon's thread pool.  Results come back in input order
//! either way.

use crate::driver::{replay, verify, NoopReplayObserver, ReplayConfig, ReplayObserver, ReplayReport};
use crate::record::{Expectation, RecordedTrip};
use crate::timing::SleepPacer;
use crate::ReplayResult;

/// One trip to replay, optionally with the indices it must fire at.
#[derive(Clone, Debug)]
pub struct CorpusEntry {
    pub trip:     RecordedTrip,
    /// Overrides the indices flagged in the recording.
    pub expected: Option<Expectation>,
}

impl CorpusEntry {
    pub fn new(trip: RecordedTrip) -> Self {
        Self { trip, expected: None }
    }

    /// Explicit expectation, else the recording's own flags.
    pub fn expectation(&self) -> Option<Expectation> {
        self.expected.or_else(|| self.trip.expectation())
    }

    /// Verify when an expectation is known, otherwise plain replay.
    pub fn run(&self, config: &ReplayConfig) -> ReplayResult<ReplayReport> {
        self.run_observed(config, &mut NoopReplayObserver)
    }

    /// [`run`][Self::run] with a caller-supplied observer.
    pub fn run_observed<O: ReplayObserver>(
        &self,
        config: &ReplayConfig,
        observer: &mut O,
    ) -> ReplayResult<ReplayReport> {
        let mut pacer = SleepPacer::new(config.speed_up);
        match self.expectation() {
            Some(expected) => verify(&self.trip, expected, config, &mut pacer, observer),
            None => replay(&self.trip, config, &mut pacer, observer),
        }
    }
}

/// Run every entry, returning one result per entry in input order.
pub fn replay_corpus(entries: &[CorpusEntry], config: &ReplayConfig) -> Vec<ReplayResult<ReplayReport>> {
    #[cfg(not(feature = "parallel"))]
    {
        entries.iter().map(|entry| entry.run(config)).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        entries.par_iter().map(|entry| entry.run(config)).collect()
    }
}
