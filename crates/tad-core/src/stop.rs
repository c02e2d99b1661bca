//! Reference stops bounding the final leg of a trip.

use crate::{GeoPoint, StopId, TadError, TadResult};

/// A transit stop the detector measures distance against.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferenceStop {
    pub id:       StopId,
    pub position: GeoPoint,
}

impl ReferenceStop {
    pub fn new(id: impl Into<StopId>, position: GeoPoint) -> Self {
        Self { id: id.into(), position }
    }

    /// Check the stop is usable as a geofence centre.
    ///
    /// `role` names the stop in the error message (`"before stop"`, …).
    pub fn validate(&self, role: &str) -> TadResult<()> {
        if self.id.is_blank() {
            return Err(TadError::Config(format!("{role} has no identifier")));
        }
        if !self.position.is_valid() {
            return Err(TadError::Config(format!(
                "{role} {} has invalid coordinates {}",
                self.id, self.position
            )));
        }
        Ok(())
    }

    /// Great-circle distance from `point` to this stop, metres.
    #[inline]
    pub fn distance_from(&self, point: GeoPoint) -> f64 {
        point.distance_m(self.position)
    }
}
