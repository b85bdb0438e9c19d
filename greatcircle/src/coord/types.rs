//! Geographic value types shared by every stage of the pipeline.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean radius of the Earth in kilometers (spherical model).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Meters per kilometer.
pub const METERS_PER_KM: f64 = 1000.0;

/// Great-circle distance from any point to its antipode, in meters.
///
/// A circle with this radius covers the whole sphere; larger radii wrap
/// back onto themselves and are clamped to this value.
pub const ANTIPODAL_DISTANCE_M: f64 = PI * EARTH_RADIUS_KM * METERS_PER_KM;

/// Latitude of the north map edge.
pub const MAX_LAT: f64 = 90.0;

/// Latitude of the south map edge.
pub const MIN_LAT: f64 = -90.0;

/// A latitude/longitude pair in degrees.
///
/// Longitude is unbounded: copies of a shape are produced by shifting
/// longitudes by multiples of 360°.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Create a new position.
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns true if both coordinates are finite and the latitude lies
    /// within [`MIN_LAT`, `MAX_LAT`].
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.lng.is_finite() && (MIN_LAT..=MAX_LAT).contains(&self.lat)
    }

    /// Returns this position moved east by `degrees` of longitude.
    #[inline]
    pub fn shifted(self, degrees: f64) -> Self {
        Self {
            lat: self.lat,
            lng: self.lng + degrees,
        }
    }

    /// Returns the point on the same meridian pinned to the given latitude.
    ///
    /// Used for seam points on the top or bottom map edge.
    #[inline]
    pub fn pinned(self, lat: f64) -> Self {
        Self { lat, lng: self.lng }
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// An axis-aligned lat/lng bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    /// South-west corner.
    pub south_west: LatLng,
    /// North-east corner.
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// Build bounds from any two opposite corners.
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self {
            south_west: LatLng::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            north_east: LatLng::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    /// Center of the box.
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// Returns true if the position lies inside the box (edges included).
    pub fn contains(&self, point: LatLng) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }
}

impl fmt::Display for LatLngBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.south_west, self.north_east)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid() {
        assert!(LatLng::new(90.0, 540.0).is_valid());
        assert!(LatLng::new(-90.0, -180.0).is_valid());
        assert!(!LatLng::new(90.5, 0.0).is_valid());
        assert!(!LatLng::new(f64::NAN, 0.0).is_valid());
        assert!(!LatLng::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_shifted_keeps_latitude() {
        let p = LatLng::new(12.5, 30.0).shifted(-720.0);
        assert_eq!(p, LatLng::new(12.5, -690.0));
    }

    #[test]
    fn test_pinned_keeps_longitude() {
        let p = LatLng::new(80.0, 17.0).pinned(MAX_LAT);
        assert_eq!(p, LatLng::new(90.0, 17.0));
    }

    #[test]
    fn test_bounds_from_any_corners() {
        let bounds = LatLngBounds::from_corners(LatLng::new(10.0, -5.0), LatLng::new(-10.0, 5.0));
        assert_eq!(bounds.south_west, LatLng::new(-10.0, -5.0));
        assert_eq!(bounds.north_east, LatLng::new(10.0, 5.0));
        assert!(bounds.contains(LatLng::new(0.0, 0.0)));
        assert!(!bounds.contains(LatLng::new(11.0, 0.0)));
        assert_eq!(bounds.center(), LatLng::new(0.0, 0.0));
    }

    #[test]
    fn test_antipodal_distance_matches_default_cap() {
        // The default radius cap is the antipodal distance truncated to 0.5 m
        assert!((ANTIPODAL_DISTANCE_M - 20_015_086.5).abs() < 1.0);
    }
}
