//! The arrival-detection state machine.

use log::{debug, info, warn};
use tad_core::{Reading, ReadingError, ReferenceStop, StopId, TripId};

use crate::{AlertSignals, ArrivalObserver, DetectResult, DetectorConfig, NoopObserver, Phase};

/// Distances computed for one accepted reading.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Proximity {
    /// Distance to the before stop, metres.
    pub before_m:      f64,
    /// Distance to the destination stop, metres.
    pub destination_m: f64,
    /// Speed the radius was computed from (reported or inferred), m/s.
    pub speed_mps:     f64,
    /// Adaptive triggering radius for this reading, metres.
    pub radius_m:      f64,
}

/// Result of feeding one reading to the detector.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UpdateOutcome {
    /// Discarded as physically impossible; detector state untouched.
    Rejected(ReadingError),
    Accepted {
        proximity:    Proximity,
        /// Uncertainty above the configured ceiling: recorded, not acted on.
        low_accuracy: bool,
        /// The phase entered on this reading, if any.
        transition:   Option<Phase>,
    },
}

impl UpdateOutcome {
    pub fn transition(&self) -> Option<Phase> {
        match self {
            UpdateOutcome::Accepted { transition, .. } => *transition,
            UpdateOutcome::Rejected(_) => None,
        }
    }
}

/// Per-detector reading counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DetectorStats {
    pub accepted:     u64,
    pub rejected:     u64,
    /// Accepted readings above the accuracy ceiling.
    pub low_accuracy: u64,
}

/// Decides when to fire the get-ready and pull-the-cord alerts for one trip.
///
/// Feed readings in arrival order with [`update`][Self::update]; read the
/// latched results with [`is_ready`][Self::is_ready] /
/// [`is_finished`][Self::is_finished], or hand [`signals`][Self::signals] to
/// another thread.
///
/// Each reading advances the phase at most one step:
///
/// - `AwaitingReady → Ready` when within the adaptive radius of the before
///   stop;
/// - `Ready → Finished` when within the adaptive radius of the destination.
///
/// The before stop gates the destination check, so a route that passes near
/// the destination early on cannot fire pull-the-cord.
#[derive(Debug)]
pub struct ArrivalDetector {
    trip_id:          TripId,
    destination_id:   StopId,
    before_stop:      ReferenceStop,
    destination_stop: ReferenceStop,
    config:           DetectorConfig,
    signals:          AlertSignals,
    last_reading:     Option<Reading>,
    last_proximity:   Option<Proximity>,
    stats:            DetectorStats,
}

impl ArrivalDetector {
    /// Set up a detector for the final leg `before_stop → destination_stop`.
    ///
    /// Fails if either stop lacks an identifier or valid coordinates, or if
    /// `config` is out of range.
    pub fn new(
        trip_id:          impl Into<TripId>,
        destination_id:   impl Into<StopId>,
        before_stop:      ReferenceStop,
        destination_stop: ReferenceStop,
        config:           DetectorConfig,
    ) -> DetectResult<Self> {
        before_stop.validate("before stop")?;
        destination_stop.validate("destination stop")?;
        config.validate()?;

        let trip_id = trip_id.into();
        info!(
            "trip {trip_id}: navigating {} -> {} (base radius {} m, lead {} s)",
            before_stop.id, destination_stop.id, config.base_radius_m, config.lead_time_secs
        );

        Ok(Self {
            trip_id,
            destination_id: destination_id.into(),
            before_stop,
            destination_stop,
            config,
            signals: AlertSignals::new(),
            last_reading: None,
            last_proximity: None,
            stats: DetectorStats::default(),
        })
    }

    // ── Ingest ────────────────────────────────────────────────────────────

    /// Apply one reading.
    pub fn update(&mut self, reading: &Reading) -> UpdateOutcome {
        self.update_observed(reading, &mut NoopObserver)
    }

    /// Apply one reading, reporting what happened to `observer`.
    pub fn update_observed<O: ArrivalObserver>(
        &mut self,
        reading: &Reading,
        observer: &mut O,
    ) -> UpdateOutcome {
        if let Err(e) = reading.validate() {
            self.stats.rejected += 1;
            warn!("trip {}: discarding reading at {}: {e}", self.trip_id, reading.timestamp);
            observer.on_rejected(reading, &e);
            return UpdateOutcome::Rejected(e);
        }

        let speed_mps = self.effective_speed(reading);
        let proximity = Proximity {
            before_m:      self.before_stop.distance_from(reading.position),
            destination_m: self.destination_stop.distance_from(reading.position),
            speed_mps,
            radius_m:      self.config.adaptive_radius_m(speed_mps),
        };
        let low_accuracy = !self.config.is_trustworthy(reading.accuracy_m);

        self.stats.accepted += 1;
        if low_accuracy {
            self.stats.low_accuracy += 1;
        }
        self.last_reading = Some(reading.clone());
        self.last_proximity = Some(proximity);

        debug!(
            "trip {}: {} speed {:.1} m/s acc {:.0} m, before {:.0} m, dest {:.0} m, radius {:.0} m",
            self.trip_id,
            reading.position,
            speed_mps,
            reading.accuracy_m,
            proximity.before_m,
            proximity.destination_m,
            proximity.radius_m
        );
        observer.on_accepted(reading, &proximity);

        let transition = if low_accuracy {
            None
        } else {
            self.next_phase(&proximity).filter(|&to| self.signals.advance(to))
        };

        match transition {
            Some(Phase::Ready) => {
                info!(
                    "trip {}: get ready, {:.0} m from before stop {}",
                    self.trip_id, proximity.before_m, self.before_stop.id
                );
                observer.on_ready(&self.trip_id, reading);
            }
            Some(Phase::Finished) => {
                info!(
                    "trip {}: pull the cord, {:.0} m from destination {}",
                    self.trip_id, proximity.destination_m, self.destination_stop.id
                );
                observer.on_finished(&self.trip_id, reading);
            }
            Some(Phase::AwaitingReady) | None => {}
        }

        UpdateOutcome::Accepted { proximity, low_accuracy, transition }
    }

    fn next_phase(&self, proximity: &Proximity) -> Option<Phase> {
        match self.signals.phase() {
            Phase::AwaitingReady if proximity.before_m <= proximity.radius_m => Some(Phase::Ready),
            Phase::Ready if proximity.destination_m <= proximity.radius_m => Some(Phase::Finished),
            _ => None,
        }
    }

    /// Reported speed, or an estimate from the previous reading when the
    /// device reported none.
    ///
    /// Estimation needs a trustworthy previous fix and a positive interval;
    /// out-of-order timestamps give a zero interval and therefore no estimate.
    /// A displacement within either fix's accuracy radius is positioning
    /// noise, so the vehicle counts as stopped.
    fn effective_speed(&self, reading: &Reading) -> f64 {
        if reading.speed_mps > 0.0 || !self.config.infer_missing_speed {
            return reading.speed_mps;
        }
        let Some(previous) = self.last_reading.as_ref() else {
            return 0.0;
        };
        if !self.config.is_trustworthy(previous.accuracy_m) {
            return 0.0;
        }
        let secs = reading.timestamp.since(previous.timestamp).as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        let moved_m = previous.position.distance_m(reading.position);
        if moved_m <= previous.accuracy_m.max(reading.accuracy_m) {
            return 0.0;
        }
        (moved_m / secs).min(self.config.max_inferred_speed_mps)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn phase(&self) -> Phase {
        self.signals.phase()
    }

    /// The get-ready alert has fired.  Never reverts.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.signals.is_ready()
    }

    /// The pull-the-cord alert has fired.  Never reverts; implies `is_ready`.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.signals.is_finished()
    }

    /// A read handle for other threads.
    pub fn signals(&self) -> AlertSignals {
        self.signals.clone()
    }

    pub fn trip_id(&self) -> &TripId {
        &self.trip_id
    }

    pub fn destination_id(&self) -> &StopId {
        &self.destination_id
    }

    pub fn before_stop(&self) -> &ReferenceStop {
        &self.before_stop
    }

    pub fn destination_stop(&self) -> &ReferenceStop {
        &self.destination_stop
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// The most recent accepted reading.
    pub fn last_reading(&self) -> Option<&Reading> {
        self.last_reading.as_ref()
    }

    pub fn last_proximity(&self) -> Option<&Proximity> {
        self.last_proximity.as_ref()
    }

    pub fn stats(&self) -> DetectorStats {
        self.stats
    }
}
