//! Ring assembly: turning a spherical circle into flat lat/lng rings.
//!
//! The circle is traced in two half sweeps of bearing per copy. Where the
//! sweeps start and stop, and which seam points close them, depends on the
//! clip status:
//!
//! | status | sweep 1      | sweep 2    | leading seam point              |
//! |--------|--------------|------------|---------------------------------|
//! | none   | 0 → 180      | 180 → 360  | -                               |
//! | top    | 360 → 180    | 180 → 0    | (90, north control lng − 360·C) |
//! | bottom | −180 → 0     | 0 → 180    | (−90, south control lng − 360·C)|
//! | both   | −180 → 0     | 0 → 180    | (−90, south control lng − 360·C)|
//!
//! Copies are produced by shifting the traced points, never by
//! re-projecting from a shifted center, so every copy is bit-for-bit the
//! primary ring moved by `360·c`.
//!
//! # Output topology
//!
//! ```text
//! none    one closed ring per copy               [r(-C) .. r(+C)]
//! top     a single ring hugging the north edge   [r]
//! bottom  a single ring hugging the south edge   [r]
//! both    one outer ring + 2·C holes             [outer, hole, hole, ..]
//! ```
//!
//! In the `both` case the outer ring runs from the leftmost copy's western
//! half, along the map edges, to the rightmost copy's eastern half. The
//! eastern half of copy `c` and the western half of copy `c + 1` enclose the
//! uncovered gap between them, which becomes a hole.

use crate::clip::{ClipStatus, ControlPoints};
use crate::coord::{project, LatLng, MAX_LAT, MIN_LAT};
use crate::error::GreatCircleError;

/// An ordered sequence of vertices. The closing edge is implicit.
pub type Ring = Vec<LatLng>;

/// An ordered sequence of rings.
pub type RingSet = Vec<Ring>;

/// Degrees of longitude between neighbouring copies.
const COPY_SPAN_DEG: f64 = 360.0;

/// Bearing range of a half sweep. The stop bearing is never emitted.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sweep {
    start: f64,
    stop: f64,
}

impl Sweep {
    const fn new(start: f64, stop: f64) -> Self {
        Self { start, stop }
    }
}

/// Sweep bounds for a clip status.
fn sweeps_for(status: ClipStatus) -> (Sweep, Sweep) {
    match status {
        ClipStatus::None => (Sweep::new(0.0, 180.0), Sweep::new(180.0, 360.0)),
        ClipStatus::Top => (Sweep::new(360.0, 180.0), Sweep::new(180.0, 0.0)),
        ClipStatus::Bottom | ClipStatus::Both => {
            (Sweep::new(-180.0, 0.0), Sweep::new(0.0, 180.0))
        }
    }
}

/// Traces circle points for one center and radius.
struct Tracer {
    center: LatLng,
    radius_km: f64,
    deg_step: f64,
}

impl Tracer {
    /// Unrounded point on the circle at a bearing.
    fn at(&self, bearing: f64) -> LatLng {
        project(self.center, bearing, self.radius_km, None)
    }

    /// Appends the points of a half sweep, shifted east by `offset` degrees.
    fn sweep(&self, sweep: Sweep, offset: f64, ring: &mut Ring) {
        let ascending = sweep.start < sweep.stop;
        let step = if ascending { self.deg_step } else { -self.deg_step };

        let mut theta = sweep.start;
        while (ascending && theta < sweep.stop) || (!ascending && theta > sweep.stop) {
            ring.push(self.at(theta).shifted(offset));
            theta += step;
        }
    }
}

/// Longitude offset of copy `c`.
#[inline]
fn copy_offset(copy: i64) -> f64 {
    COPY_SPAN_DEG * copy as f64
}

/// Assemble the vertex rings of a circle.
///
/// # Arguments
///
/// * `center` - Circle center
/// * `radius_km` - Radius in kilometers
/// * `status` - Clip status from [`crate::clip::classify`]
/// * `copies` - Copies per side (0 = primary instance only)
/// * `deg_step` - Bearing step between vertices in degrees
///
/// # Returns
///
/// The rings, laid out as described in the module docs. For `top` and
/// `bottom` the set holds exactly one ring.
///
/// # Errors
///
/// [`GreatCircleError::InvalidStep`] if `deg_step` is not a positive finite
/// number (the sweeps would never terminate).
pub fn assemble(
    center: LatLng,
    radius_km: f64,
    status: ClipStatus,
    copies: u32,
    deg_step: f64,
) -> Result<RingSet, GreatCircleError> {
    if !deg_step.is_finite() || deg_step <= 0.0 {
        return Err(GreatCircleError::InvalidStep(deg_step));
    }

    let tracer = Tracer {
        center,
        radius_km,
        deg_step,
    };
    let copies = copies as i64;

    let rings = match status {
        ClipStatus::None => assemble_closed(&tracer, copies),
        ClipStatus::Top | ClipStatus::Bottom => {
            let controls = ControlPoints::compute(center, radius_km);
            vec![assemble_edge(&tracer, status, &controls, copies)]
        }
        ClipStatus::Both => {
            let controls = ControlPoints::compute(center, radius_km);
            assemble_with_holes(&tracer, &controls, copies)
        }
    };

    tracing::trace!(
        status = %status,
        copies,
        rings = rings.len(),
        vertices = rings.iter().map(Vec::len).sum::<usize>(),
        "Assembled rings"
    );

    Ok(rings)
}

/// `none`: one independent ring per copy.
fn assemble_closed(tracer: &Tracer, copies: i64) -> RingSet {
    let (first, second) = sweeps_for(ClipStatus::None);
    (-copies..=copies)
        .map(|copy| {
            let offset = copy_offset(copy);
            let mut ring = Ring::new();
            tracer.sweep(first, offset, &mut ring);
            tracer.sweep(second, offset, &mut ring);
            ring
        })
        .collect()
}

/// `top` / `bottom`: every copy chained into one ring closed along a map edge.
fn assemble_edge(
    tracer: &Tracer,
    status: ClipStatus,
    controls: &ControlPoints,
    copies: i64,
) -> Ring {
    let (first, second) = sweeps_for(status);
    let (edge_lat, seam_lng, closing_bearing) = match status {
        ClipStatus::Top => (MAX_LAT, controls.north_full_turn.lng, 0.0),
        _ => (MIN_LAT, controls.south_full_turn.lng, 180.0),
    };

    let mut ring = vec![LatLng::new(edge_lat, seam_lng - copy_offset(copies))];
    for copy in -copies..=copies {
        let offset = copy_offset(copy);
        tracer.sweep(first, offset, &mut ring);
        tracer.sweep(second, offset, &mut ring);
    }

    let closing = tracer.at(closing_bearing).shifted(copy_offset(copies));
    ring.push(closing);
    ring.push(closing.pinned(edge_lat));
    ring
}

/// `both`: one outer ring spanning all copies plus a hole between each pair.
fn assemble_with_holes(tracer: &Tracer, controls: &ControlPoints, copies: i64) -> RingSet {
    let (first, second) = sweeps_for(ClipStatus::Both);
    let leftmost = copy_offset(-copies);
    let rightmost = copy_offset(copies);

    let north = tracer.at(0.0);
    let north_full_turn = tracer.at(360.0);
    let south = tracer.at(180.0);
    let south_full_turn = tracer.at(-180.0);

    let mut rings = RingSet::new();
    let mut pending = vec![LatLng::new(MIN_LAT, controls.south_full_turn.lng + leftmost)];

    for copy in -copies..=copies {
        let offset = copy_offset(copy);

        // Western half
        tracer.sweep(first, offset, &mut pending);
        pending.push(north_full_turn.shifted(offset));
        if copy == -copies {
            // Start of the outer ring: climb to the north edge
            pending.push(LatLng::new(MAX_LAT, south_full_turn.lng + leftmost));
            pending.push(LatLng::new(MAX_LAT, south.lng + leftmost));
            rings.push(std::mem::take(&mut pending));
        } else if let Some(hole) = rings.last_mut() {
            // Closes the hole opened by the previous copy's eastern half
            hole.append(&mut pending);
        }

        if copy == copies {
            pending.push(LatLng::new(MAX_LAT, north.lng + rightmost));
        }

        // Eastern half
        tracer.sweep(second, offset, &mut pending);
        pending.push(south.shifted(offset));
        if copy == copies {
            // End of the outer ring: drop back to the south edge
            pending.push(LatLng::new(MIN_LAT, south.lng + rightmost));
            if let Some(outer) = rings.first_mut() {
                outer.append(&mut pending);
            }
        } else {
            rings.push(std::mem::take(&mut pending));
        }
    }

    rings
}
