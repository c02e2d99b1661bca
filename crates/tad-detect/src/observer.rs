//! Push-style notification of detector activity.

use std::sync::mpsc::Sender;

use log::debug;
use tad_core::{Reading, ReadingError, Timestamp, TripId};

use crate::Proximity;

/// Callbacks invoked by
/// [`ArrivalDetector::update_observed`][crate::ArrivalDetector::update_observed].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: alert printer
///
/// ```rust,ignore
/// struct Printer;
///
/// impl ArrivalObserver for Printer {
///     fn on_finished(&mut self, trip: &TripId, _reading: &Reading) {
///         println!("{trip}: pull the cord!");
///     }
/// }
/// ```
pub trait ArrivalObserver {
    /// Called for every reading that passed validation, before any alert
    /// callback for the same reading.
    fn on_accepted(&mut self, _reading: &Reading, _proximity: &Proximity) {}

    /// Called for readings discarded as physically impossible.
    fn on_rejected(&mut self, _reading: &Reading, _error: &ReadingError) {}

    /// The get-ready alert fired on `reading`.
    fn on_ready(&mut self, _trip: &TripId, _reading: &Reading) {}

    /// The pull-the-cord alert fired on `reading`.
    fn on_finished(&mut self, _trip: &TripId, _reading: &Reading) {}
}

/// An [`ArrivalObserver`] that does nothing.
pub struct NoopObserver;

impl ArrivalObserver for NoopObserver {}

// ── Channel delivery ──────────────────────────────────────────────────────────

/// An alert transition, as delivered over a channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AlertEvent {
    Ready { trip: TripId, at: Timestamp },
    Finished { trip: TripId, at: Timestamp },
}

/// Forwards alert transitions to an `mpsc` channel, for hosts whose alerting
/// runs on its own thread.
///
/// A dropped receiver is not an error; the event is discarded.
pub struct ChannelObserver {
    tx: Sender<AlertEvent>,
}

impl ChannelObserver {
    pub fn new(tx: Sender<AlertEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: AlertEvent) {
        if let Err(e) = self.tx.send(event) {
            debug!("alert receiver gone, dropping {:?}", e.0);
        }
    }
}

impl ArrivalObserver for ChannelObserver {
    fn on_ready(&mut self, trip: &TripId, reading: &Reading) {
        self.send(AlertEvent::Ready { trip: trip.clone(), at: reading.timestamp });
    }

    fn on_finished(&mut self, trip: &TripId, reading: &Reading) {
        self.send(AlertEvent::Finished { trip: trip.clone(), at: reading.timestamp });
    }
}
