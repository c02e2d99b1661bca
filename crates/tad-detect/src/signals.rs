//! Latched alert signals shared between the updating thread and readers.
//!
//! Location callbacks arrive on one thread while the alerting layer polls on
//! another.  The detector is the only writer; readers hold cheap clones of
//! [`AlertSignals`] and never block it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::Phase;

/// Read handle onto a detector's phase.
///
/// Clones observe the same detector.  Only the owning detector can advance
/// the phase, and it can only move forward.
#[derive(Clone, Debug, Default)]
pub struct AlertSignals {
    phase: Arc<AtomicU8>,
}

impl AlertSignals {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        Phase::from_repr(self.phase.load(Ordering::Acquire))
    }

    /// The get-ready alert has fired.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.phase().is_ready()
    }

    /// The pull-the-cord alert has fired.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.phase().is_finished()
    }

    /// Move to `to` if it is later than the current phase.
    ///
    /// Returns `true` if the phase changed.
    pub(crate) fn advance(&self, to: Phase) -> bool {
        let previous = self.phase.fetch_max(to as u8, Ordering::AcqRel);
        previous < to as u8
    }
}
