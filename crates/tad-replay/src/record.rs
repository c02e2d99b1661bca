//! In-memory form of a recorded trip.

use tad_core::{GeoPoint, Reading, ReferenceStop, TripId};
use tad_detect::{ArrivalDetector, DetectResult, DetectorConfig};

use crate::{ReplayError, ReplayResult};

/// Trip metadata from the first row of a recording.
#[derive(Clone, Debug, PartialEq)]
pub struct TripHeader {
    pub trip_id:     TripId,
    /// Final stop; its id doubles as the trip's destination id.
    pub destination: ReferenceStop,
    /// Second-to-last stop.
    pub before:      ReferenceStop,
}

/// The readings at which each alert is expected to fire.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expectation {
    pub ready_index:  usize,
    pub finish_index: usize,
}

/// A recorded trip: header, readings in recorded order, and any expected
/// alert indices marked in the recording.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedTrip {
    pub header:          TripHeader,
    pub readings:        Vec<Reading>,
    /// `sequenceIndex` column, parallel to `readings`.
    pub sequence:        Vec<u32>,
    /// First reading flagged as the get-ready point, if any.
    pub expected_ready:  Option<usize>,
    /// First reading flagged as the pull-the-cord point, if any.
    pub expected_finish: Option<usize>,
}

impl RecordedTrip {
    pub fn trip_id(&self) -> &TripId {
        &self.header.trip_id
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Expected indices marked in the recording, when both are present.
    pub fn expectation(&self) -> Option<Expectation> {
        Some(Expectation {
            ready_index:  self.expected_ready?,
            finish_index: self.expected_finish?,
        })
    }

    /// A fresh detector for this trip's final leg.
    pub fn detector(&self, config: DetectorConfig) -> DetectResult<ArrivalDetector> {
        ArrivalDetector::new(
            self.header.trip_id.clone(),
            self.header.destination.id.clone(),
            self.header.before.clone(),
            self.header.destination.clone(),
            config,
        )
    }

    /// Index of the reading closest to `point`, or `None` for an empty trip.
    ///
    /// Handy for sanity-checking expected indices: the get-ready index of a
    /// well-behaved trip sits shortly before the closest approach to the
    /// before stop.
    pub fn nearest_reading(&self, point: GeoPoint) -> Option<usize> {
        self.readings
            .iter()
            .map(|r| r.position.distance_m(point))
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Check that `expectation` can be replayed against this trip.
    pub fn check_expectation(&self, expectation: Expectation) -> ReplayResult<()> {
        let len = self.len();
        for (what, index) in [
            ("get-ready", expectation.ready_index),
            ("pull-the-cord", expectation.finish_index),
        ] {
            if index >= len {
                return Err(ReplayError::IndexOutOfRange {
                    trip: self.trip_id().clone(),
                    what,
                    index,
                    len,
                });
            }
        }
        if expectation.finish_index <= expectation.ready_index {
            return Err(ReplayError::Config(format!(
                "trip {}: pull-the-cord index {} must come after get-ready index {}",
                self.trip_id(),
                expectation.finish_index,
                expectation.ready_index
            )));
        }
        Ok(())
    }
}
