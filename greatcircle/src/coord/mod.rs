//! Coordinate math on a spherical Earth
//!
//! Provides the destination-point projection used to trace circles, plus the
//! rounding and unit helpers the rest of the pipeline relies on.

mod types;

pub use types::{
    LatLng, LatLngBounds, ANTIPODAL_DISTANCE_M, EARTH_RADIUS_KM, MAX_LAT, METERS_PER_KM, MIN_LAT,
};

/// Below this `cos φ1` the origin is treated as sitting on a pole.
const POLE_COS_EPSILON: f64 = 1e-9;

/// Projects a point a given distance along a bearing from an origin.
///
/// Uses the spherical destination formula:
///
/// ```text
/// φ2 = asin(sin φ1 · cos δ + cos φ1 · sin δ · cos θ)
/// λ2 = λ1 + atan2(sin θ · sin δ · cos φ1, cos δ − sin φ1 · sin φ2)
/// ```
///
/// # Arguments
///
/// * `origin` - Start point in degrees
/// * `bearing` - Bearing in degrees clockwise from north (any real value)
/// * `distance_km` - Distance along the surface in kilometers
/// * `round_decimals` - When set, both coordinates are rounded half-up to
///   this many decimal places
///
/// # Returns
///
/// The destination point. Longitude is NOT normalized: bearings 0° and 360°
/// land on opposite sides of the antimeridian when the path crosses a pole,
/// which is exactly what the clip classifier looks for.
///
/// An origin on a pole uses the limit of the longitude term as `φ1 → ±90°`,
/// so bearing θ from the north pole lands on meridian `λ1 + atan2(sin θ, −cos θ)`
/// and from the south pole on `λ1 + atan2(sin θ, cos θ)`.
#[inline]
pub fn project(
    origin: LatLng,
    bearing: f64,
    distance_km: f64,
    round_decimals: Option<u32>,
) -> LatLng {
    let lat1 = origin.lat.to_radians();
    let lng1 = origin.lng.to_radians();
    let brng = bearing.to_radians();
    let delta = distance_km / EARTH_RADIUS_KM;

    let (sin_lat1, cos_lat1) = lat1.sin_cos();
    let (sin_d, cos_d) = delta.sin_cos();

    // Mathematically within [-1, 1]; clamp so rounding noise never yields NaN
    let sin_lat2 = (sin_lat1 * cos_d + cos_lat1 * sin_d * brng.cos()).clamp(-1.0, 1.0);
    let lat2 = sin_lat2.asin();
    let (y, x) = if cos_lat1.abs() < POLE_COS_EPSILON {
        (brng.sin(), -sin_lat1 * brng.cos())
    } else {
        (brng.sin() * sin_d * cos_lat1, cos_d - sin_lat1 * lat2.sin())
    };
    let lng2 = lng1 + y.atan2(x);

    let dest = LatLng::new(lat2.to_degrees(), lng2.to_degrees());
    match round_decimals {
        Some(decimals) => LatLng::new(
            round_half_up(dest.lat, decimals),
            round_half_up(dest.lng, decimals),
        ),
        None => dest,
    }
}

/// Rounds to the given number of decimals, ties toward positive infinity.
#[inline]
pub fn round_half_up(value: f64, decimals: u32) -> f64 {
    let multiplier = 10f64.powi(decimals as i32);
    (value * multiplier + 0.5).floor() / multiplier
}

/// Converts a radius in meters to kilometers.
#[inline]
pub fn meters_to_km(meters: f64) -> f64 {
    meters / METERS_PER_KM
}

/// Angular size in degrees of an arc of the given length in kilometers.
#[inline]
pub fn km_to_degrees(distance_km: f64) -> f64 {
    (distance_km / EARTH_RADIUS_KM).to_degrees()
}
