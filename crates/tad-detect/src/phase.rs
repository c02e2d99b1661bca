//! Alert phases of a trip.

use std::fmt;

/// Where the trip stands with respect to the two alerts.
///
/// Phases only move forward: `AwaitingReady → Ready → Finished`.  The
/// discriminants are ordered so the latest phase is the numeric maximum.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Phase {
    /// Neither alert has fired.
    #[default]
    AwaitingReady = 0,
    /// The get-ready alert fired near the before stop.
    Ready = 1,
    /// The pull-the-cord alert fired near the destination.
    Finished = 2,
}

impl Phase {
    #[inline]
    pub fn is_ready(self) -> bool {
        self >= Phase::Ready
    }

    #[inline]
    pub fn is_finished(self) -> bool {
        self == Phase::Finished
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::AwaitingReady => "awaiting_ready",
            Phase::Ready         => "ready",
            Phase::Finished      => "finished",
        }
    }

    /// Inverse of `phase as u8`.  Unknown values saturate to `Finished`.
    #[inline]
    pub(crate) fn from_repr(value: u8) -> Phase {
        match value {
            0 => Phase::AwaitingReady,
            1 => Phase::Ready,
            _ => Phase::Finished,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
