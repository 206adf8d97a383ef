//! Coordinates, distances and the radius-search sizing rules.
//!
//! Every distance in this crate is a great-circle distance on a sphere with
//! the IUGG mean Earth radius (6371.0088 km). The Postgres repository asks
//! PostGIS for the same thing (`use_spheroid = false`), so both repositories
//! agree to within floating-point noise. Against the WGS84 spheroid the
//! spherical figure is off by at most about 0.5%.

use geo::{HaversineDistance, Point};
use std::fmt;

use crate::error::{SellerError, SellerResult};

/// Default upper bound of a radius search
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 500.0;

/// Sellers returned by one radius search
pub const RESULT_LIMIT: usize = 20;

const MIN_CANDIDATES: i64 = 50;
const MAX_CANDIDATES: i64 = 200;

/// A validated WGS84 coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> SellerResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(SellerError::Validation(format!(
                "latitude must be between -90 and 90, got {}",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(SellerError::Validation(format!(
                "longitude must be between -180 and 180, got {}",
                longitude
            )));
        }
        Ok(Self { latitude, longitude })
    }

    /// The point for a stored lat/lon pair; `None` when either half is missing
    /// or out of range.
    pub fn from_optional(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon).ok(),
            _ => None,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    fn to_point(self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Great-circle distance in kilometres
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    a.to_point().haversine_distance(&b.to_point()) / 1000.0
}

/// Inclusive `[min_km, max_km]` band. An inverted band matches nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceRange {
    pub min_km: f64,
    pub max_km: f64,
}

impl DistanceRange {
    pub fn new(min_km: f64, max_km: f64) -> Self {
        Self { min_km, max_km }
    }

    pub fn contains(&self, distance_km: f64) -> bool {
        self.min_km <= distance_km && distance_km <= self.max_km
    }

    pub fn is_empty(&self) -> bool {
        self.min_km > self.max_km
    }

    pub fn max_radius_m(&self) -> f64 {
        self.max_km * 1000.0
    }
}

impl Default for DistanceRange {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_MAX_DISTANCE_KM)
    }
}

/// How many nearest locations to read before collapsing them per seller.
///
/// `floor(max_km / 10) * 20`, clamped to `[50, 200]`. Wider searches cross
/// more sellers with several factories, so they over-fetch more.
pub fn expanded_limit(max_km: f64) -> u64 {
    let tens = (max_km / 10.0).floor() as i64;
    tens.saturating_mul(20).clamp(MIN_CANDIDATES, MAX_CANDIDATES) as u64
}
