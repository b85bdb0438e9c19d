//! Pole-crossing classification.
//!
//! A circle traced in lat/lng space stays a closed ring only while it does
//! not contain a pole. We detect pole containment numerically: projecting
//! due north with bearings 0° and 360° (and due south with 180° and −180°)
//! gives the same point unless the path runs over the pole, in which case
//! the two bearings land on opposite branches of `atan2` and their
//! longitudes differ by 360°.
//!
//! Control points are rounded to [`CONTROL_POINT_DECIMALS`] so that
//! floating-point noise near tangency does not register as a crossing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coord::{project, LatLng};

/// Decimal places used when comparing control points.
pub const CONTROL_POINT_DECIMALS: u32 = 3;

/// How the flattened circle interacts with the poles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipStatus {
    /// Closed ring, no pole inside the circle.
    None,
    /// The circle contains the north pole.
    Top,
    /// The circle contains the south pole.
    Bottom,
    /// The circle contains both poles; the polygon needs holes.
    Both,
}

impl ClipStatus {
    /// Returns true if the circle touches a map edge.
    pub fn is_clipped(&self) -> bool {
        !matches!(self, ClipStatus::None)
    }
}

impl fmt::Display for ClipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClipStatus::None => "none",
            ClipStatus::Top => "top",
            ClipStatus::Bottom => "bottom",
            ClipStatus::Both => "both",
        };
        write!(f, "{}", name)
    }
}

/// The four rounded control points at the circle's north and south extremes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoints {
    /// Projection at bearing 0°.
    pub north: LatLng,
    /// Projection at bearing 360°.
    pub north_full_turn: LatLng,
    /// Projection at bearing 180°.
    pub south: LatLng,
    /// Projection at bearing −180°.
    pub south_full_turn: LatLng,
}

impl ControlPoints {
    /// Compute the control points of a circle.
    pub fn compute(center: LatLng, radius_km: f64) -> Self {
        let at = |bearing: f64| project(center, bearing, radius_km, Some(CONTROL_POINT_DECIMALS));
        Self {
            north: at(0.0),
            north_full_turn: at(360.0),
            south: at(180.0),
            south_full_turn: at(-180.0),
        }
    }

    /// True when the north pair disagrees (north pole inside the circle).
    pub fn north_diverges(&self) -> bool {
        self.north != self.north_full_turn
    }

    /// True when the south pair disagrees (south pole inside the circle).
    pub fn south_diverges(&self) -> bool {
        self.south != self.south_full_turn
    }

    /// Clip status implied by these control points.
    pub fn status(&self) -> ClipStatus {
        match (self.north_diverges(), self.south_diverges()) {
            (true, true) => ClipStatus::Both,
            (true, false) => ClipStatus::Top,
            (false, true) => ClipStatus::Bottom,
            (false, false) => ClipStatus::None,
        }
    }
}

/// Result of classifying a circle: the status and the points that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub status: ClipStatus,
    pub controls: ControlPoints,
}

/// Classify a circle against the poles, keeping the control points.
pub fn classify_with_controls(center: LatLng, radius_km: f64) -> Classification {
    let controls = ControlPoints::compute(center, radius_km);
    Classification {
        status: controls.status(),
        controls,
    }
}

/// Classify a circle against the poles.
///
/// # Arguments
///
/// * `center` - Circle center
/// * `radius_km` - Circle radius in kilometers
#[inline]
pub fn classify(center: LatLng, radius_km: f64) -> ClipStatus {
    classify_with_controls(center, radius_km).status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::km_to_degrees;

    #[test]
    fn test_small_circle_at_origin_is_closed() {
        assert_eq!(classify(LatLng::new(0.0, 0.0), 1000.0), ClipStatus::None);
    }

    #[test]
    fn test_circle_over_north_pole_is_top() {
        assert_eq!(classify(LatLng::new(85.0, 0.0), 1000.0), ClipStatus::Top);
    }

    #[test]
    fn test_circle_over_south_pole_is_bottom() {
        assert_eq!(
            classify(LatLng::new(-85.0, 40.0), 1000.0),
            ClipStatus::Bottom
        );
    }

    #[test]
    fn test_circle_centered_on_pole() {
        assert_eq!(classify(LatLng::new(90.0, 0.0), 1000.0), ClipStatus::Top);
        assert_eq!(classify(LatLng::new(90.0, 45.0), 12_000.0), ClipStatus::Top);
        assert_eq!(classify(LatLng::new(-90.0, 0.0), 1000.0), ClipStatus::Bottom);
        assert_eq!(
            classify(LatLng::new(-90.0, -120.0), 12_000.0),
            ClipStatus::Bottom
        );
    }

    #[test]
    fn test_near_antipodal_circle_is_both() {
        assert_eq!(classify(LatLng::new(0.0, 0.0), 19_000.0), ClipStatus::Both);
    }

    #[test]
    fn test_large_circle_off_equator_is_both() {
        assert_eq!(
            classify(LatLng::new(5.0, 20.0), 15_000.0),
            ClipStatus::Both
        );
    }

    #[test]
    fn test_radius_beyond_nearer_pole() {
        // 60°N is 30° (~3336 km) from the north pole and 150° from the south
        assert_eq!(classify(LatLng::new(60.0, -45.0), 4_000.0), ClipStatus::Top);
        assert_eq!(
            classify(LatLng::new(-60.0, 120.0), 4_000.0),
            ClipStatus::Bottom
        );
    }

    #[test]
    fn test_control_points_are_rounded() {
        let controls = ControlPoints::compute(LatLng::new(10.0, 10.0), 500.0);
        for p in [controls.north, controls.south] {
            assert_eq!(p.lat, (p.lat * 1000.0).round() / 1000.0);
            assert_eq!(p.lng, (p.lng * 1000.0).round() / 1000.0);
        }
        assert!(controls.north.lat > 10.0);
        assert!(controls.south.lat < 10.0);
    }

    #[test]
    fn test_classification_keeps_controls() {
        let result = classify_with_controls(LatLng::new(85.0, 0.0), 1000.0);
        assert_eq!(result.status, ClipStatus::Top);
        assert!(result.controls.north_diverges());
        assert!(!result.controls.south_diverges());
        assert_eq!(result.controls.north.lng, 180.0);
        assert_eq!(result.controls.north_full_turn.lng, -180.0);
    }

    #[test]
    fn test_status_display_and_flags() {
        assert_eq!(ClipStatus::Both.to_string(), "both");
        assert!(ClipStatus::Top.is_clipped());
        assert!(!ClipStatus::None.is_clipped());
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_circles_clear_of_poles_are_closed(
                lat in -80.0..80.0_f64,
                lng in -180.0..180.0_f64,
                fraction in 0.01..1.0_f64
            ) {
                // Keep |lat| + radius (in degrees) at or below 89°
                let max_deg = 89.0 - lat.abs();
                let radius_deg = max_deg * fraction;
                let radius_km = radius_deg.to_radians() * crate::coord::EARTH_RADIUS_KM;

                prop_assert!(km_to_degrees(radius_km) <= max_deg + 1e-9);
                prop_assert_eq!(classify(LatLng::new(lat, lng), radius_km), ClipStatus::None);
            }

            #[test]
            fn test_circles_over_north_pole_are_clipped(
                lat in 10.0..=90.0_f64,
                lng in -180.0..180.0_f64,
                extra_deg in 1.0..5.0_f64
            ) {
                // Reaches past the north pole but stops short of the south pole
                let radius_deg = 90.0 - lat + extra_deg;
                let radius_km = radius_deg.to_radians() * crate::coord::EARTH_RADIUS_KM;
                let status = classify(LatLng::new(lat, lng), radius_km);
                prop_assert_eq!(status, ClipStatus::Top);
            }

            #[test]
            fn test_circles_over_south_pole_are_clipped(
                lat in -90.0..=-10.0_f64,
                lng in -180.0..180.0_f64,
                extra_deg in 1.0..5.0_f64
            ) {
                let radius_deg = 90.0 + lat + extra_deg;
                let radius_km = radius_deg.to_radians() * crate::coord::EARTH_RADIUS_KM;
                let status = classify(LatLng::new(lat, lng), radius_km);
                prop_assert_eq!(status, ClipStatus::Bottom);
            }
        }
    }
}
