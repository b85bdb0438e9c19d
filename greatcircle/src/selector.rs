//! Shape selection and primitive lifecycle.
//!
//! Each redraw ends with a [`RenderForm`]: either one unprojected circle per
//! copy or an explicitly assembled polygon. [`LiveShape`] tracks what is
//! currently on the map and moves from one form to the next:
//!
//! ```text
//!            apply(Circles)             apply(Polygon / MultiPolygon)
//!   Empty ───────────────► Circles ◄──────────────────────────► Polygon
//!     ▲                      │  teardown on form change           │
//!     └──────── teardown ────┴────────────────────────────────────┘
//! ```
//!
//! Applying the same form again updates primitives in place. Any change of
//! form, including single ring to ring set, removes the old primitives first.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::assembler::{assemble, Ring, RingSet};
use crate::clip::{Classification, ClipStatus};
use crate::config::{ClipLat, GreatCircleOptions, PathStyle};
use crate::coord::{meters_to_km, LatLng};
use crate::error::GreatCircleError;
use crate::surface::{MapSurface, PolygonShape, PrimitiveId};

/// How a redraw realizes the circle on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum RenderForm {
    /// One unprojected circle at `center.lng + 360·c` for every `c` in
    /// `[-copies, copies]`.
    Circles {
        center: LatLng,
        radius_m: f64,
        copies: u32,
    },
    /// A single ring closed against a pole edge.
    Polygon { ring: Ring },
    /// Disjoint rings, or an outer ring followed by holes.
    MultiPolygon { rings: RingSet },
}

impl RenderForm {
    /// Short name used in logs and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            RenderForm::Circles { .. } => "circles",
            RenderForm::Polygon { .. } => "polygon",
            RenderForm::MultiPolygon { .. } => "multi_polygon",
        }
    }

    /// Number of primitives this form occupies on a map.
    pub fn primitive_count(&self) -> usize {
        match self {
            RenderForm::Circles { copies, .. } => 2 * *copies as usize + 1,
            RenderForm::Polygon { .. } | RenderForm::MultiPolygon { .. } => 1,
        }
    }
}

/// Decide whether the polygon form is needed.
///
/// `AlwaysCircle` wins over every other rule. Otherwise the polygon is used
/// for large radii, for any pole crossing, when a rounded control point
/// reaches the latitude threshold, or unconditionally for `AlwaysPolygon`.
pub fn prefers_polygon(
    options: &GreatCircleOptions,
    classification: &Classification,
    radius_m: f64,
) -> bool {
    match options.clip_lat {
        ClipLat::AlwaysCircle => false,
        ClipLat::AlwaysPolygon => true,
        ClipLat::Latitude(threshold) => {
            radius_m >= options.clip_rad
                || classification.status.is_clipped()
                || classification.controls.north.lat >= threshold
                || classification.controls.south.lat <= -threshold
        }
    }
}

/// Compute the render form for one redraw.
///
/// # Arguments
///
/// * `center` - Circle center
/// * `radius_m` - Radius in meters, already clamped
/// * `options` - Overlay options (`clip_lat`, `clip_rad`, `deg_step`)
/// * `classification` - Clip status and control points for this center/radius
/// * `copies` - Copies per side from the copy planner
pub fn select(
    center: LatLng,
    radius_m: f64,
    options: &GreatCircleOptions,
    classification: &Classification,
    copies: u32,
) -> Result<RenderForm, GreatCircleError> {
    if !prefers_polygon(options, classification, radius_m) {
        return Ok(RenderForm::Circles {
            center,
            radius_m,
            copies,
        });
    }

    let rings = assemble(
        center,
        meters_to_km(radius_m),
        classification.status,
        copies,
        options.deg_step,
    )?;

    Ok(match classification.status {
        ClipStatus::Top | ClipStatus::Bottom => RenderForm::Polygon {
            ring: rings.into_iter().next().unwrap_or_default(),
        },
        ClipStatus::None | ClipStatus::Both => RenderForm::MultiPolygon { rings },
    })
}

/// Primitives currently owned by an overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LiveShape {
    /// Nothing on the map.
    #[default]
    Empty,
    /// Circle primitives keyed by signed copy offset.
    Circles(BTreeMap<i32, PrimitiveId>),
    /// A polygon primitive; `multi` records whether it holds a ring set.
    Polygon { id: PrimitiveId, multi: bool },
}

impl LiveShape {
    /// Returns true if nothing is live.
    pub fn is_empty(&self) -> bool {
        matches!(self, LiveShape::Empty)
    }

    /// Handles of every live primitive.
    pub fn ids(&self) -> Vec<PrimitiveId> {
        match self {
            LiveShape::Empty => Vec::new(),
            LiveShape::Circles(cache) => cache.values().copied().collect(),
            LiveShape::Polygon { id, .. } => vec![*id],
        }
    }

    /// Bring the map in line with `form`.
    pub fn apply<M: MapSurface + ?Sized>(&mut self, form: &RenderForm, map: &mut M, style: &PathStyle) {
        match form {
            RenderForm::Circles {
                center,
                radius_m,
                copies,
            } => self.apply_circles(*center, *radius_m, *copies, map, style),
            RenderForm::Polygon { ring } => {
                self.apply_polygon(PolygonShape::Ring(ring.clone()), map, style)
            }
            RenderForm::MultiPolygon { rings } => {
                self.apply_polygon(PolygonShape::Rings(rings.clone()), map, style)
            }
        }
    }

    fn apply_circles<M: MapSurface + ?Sized>(
        &mut self,
        center: LatLng,
        radius_m: f64,
        copies: u32,
        map: &mut M,
        style: &PathStyle,
    ) {
        if !matches!(self, LiveShape::Circles(_)) {
            self.teardown(map);
            *self = LiveShape::Circles(BTreeMap::new());
        }
        let LiveShape::Circles(cache) = self else {
            return;
        };

        let copies = copies as i32;
        let stale: Vec<i32> = cache
            .keys()
            .copied()
            .filter(|offset| offset.abs() > copies)
            .collect();
        for offset in stale {
            if let Some(id) = cache.remove(&offset) {
                debug!(offset, %id, "Evicting circle copy");
                map.remove(id);
            }
        }

        for offset in -copies..=copies {
            let position = center.shifted(360.0 * offset as f64);
            match cache.get(&offset) {
                Some(id) => map.update_circle(*id, position, radius_m, style),
                None => {
                    let id = map.add_circle(position, radius_m, style);
                    cache.insert(offset, id);
                }
            }
        }
    }

    fn apply_polygon<M: MapSurface + ?Sized>(
        &mut self,
        shape: PolygonShape,
        map: &mut M,
        style: &PathStyle,
    ) {
        let multi = shape.is_multi();
        if let LiveShape::Polygon { id, multi: live } = *self {
            if live == multi {
                map.update_polygon(id, &shape, style);
                return;
            }
        }
        self.teardown(map);
        let id = map.add_polygon(&shape, style);
        *self = LiveShape::Polygon { id, multi };
    }

    /// Restyle every live primitive.
    pub fn set_style<M: MapSurface + ?Sized>(&self, map: &mut M, style: &PathStyle) {
        for id in self.ids() {
            map.set_style(id, style);
        }
    }

    /// Remove every live primitive from the map.
    pub fn teardown<M: MapSurface + ?Sized>(&mut self, map: &mut M) {
        let ids = self.ids();
        if !ids.is_empty() {
            debug!(count = ids.len(), "Tearing down primitives");
        }
        for id in ids {
            map.remove(id);
        }
        *self = LiveShape::Empty;
    }
}
