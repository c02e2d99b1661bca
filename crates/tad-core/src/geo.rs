//! Geographic coordinate type and great-circle distance.
//!
//! Unlike a city-scale simulation, alert triggering compares distances of a
//! few tens of metres against each other, so coordinates are kept in `f64`.

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `true` if both components are finite and inside the WGS-84 ranges
    /// (`lat` in [-90, 90], `lon` in [-180, 180]).
    #[inline]
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// The point `north_m` metres north and `east_m` metres east of `self`,
    /// using a local equirectangular approximation.
    ///
    /// Good to well under a metre over the few kilometres of a final trip leg;
    /// used to lay out synthetic trips and test fixtures.
    pub fn offset_m(self, north_m: f64, east_m: f64) -> GeoPoint {
        let m_per_deg = EARTH_RADIUS_M.to_radians();
        let lat = self.lat + north_m / m_per_deg;
        let lon = self.lon + east_m / (m_per_deg * self.lat.to_radians().cos());
        GeoPoint { lat, lon }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
