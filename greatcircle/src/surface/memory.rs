//! In-memory map surface.
//!
//! Keeps the live primitives in a `BTreeMap` and counts every call, which
//! makes leaks and needless re-creation visible in tests.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{MapSurface, PolygonShape, PrimitiveId, Viewport};
use crate::config::PathStyle;
use crate::coord::LatLng;

/// A primitive as stored by [`MemorySurface`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Circle {
        center: LatLng,
        radius_m: f64,
        style: PathStyle,
    },
    Polygon {
        shape: PolygonShape,
        style: PathStyle,
    },
}

impl Primitive {
    /// Style of the primitive.
    pub fn style(&self) -> &PathStyle {
        match self {
            Primitive::Circle { style, .. } | Primitive::Polygon { style, .. } => style,
        }
    }
}

/// Call counters for a [`MemorySurface`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SurfaceStats {
    pub created: usize,
    pub updated: usize,
    pub restyled: usize,
    pub removed: usize,
}

/// A map surface that stores primitives in memory.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    zoom: u8,
    viewport_width: u32,
    next_id: u64,
    primitives: BTreeMap<PrimitiveId, Primitive>,
    stats: SurfaceStats,
}

impl MemorySurface {
    /// Create an empty surface at the given zoom and viewport width.
    pub fn new(zoom: u8, viewport_width: u32) -> Self {
        Self {
            zoom,
            viewport_width,
            next_id: 1,
            primitives: BTreeMap::new(),
            stats: SurfaceStats::default(),
        }
    }

    /// Change the zoom level. Hosts follow this with a `zoomend` event.
    pub fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom;
    }

    /// Change the viewport width.
    pub fn set_viewport_width(&mut self, width: u32) {
        self.viewport_width = width;
    }

    /// Look up a live primitive.
    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(&id)
    }

    /// All live primitives in creation order.
    pub fn primitives(&self) -> impl Iterator<Item = (PrimitiveId, &Primitive)> {
        self.primitives.iter().map(|(id, p)| (*id, p))
    }

    /// Number of live primitives.
    pub fn live_count(&self) -> usize {
        self.primitives.len()
    }

    /// Live circle primitives.
    pub fn circles(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives
            .values()
            .filter(|p| matches!(p, Primitive::Circle { .. }))
    }

    /// Live polygon primitives.
    pub fn polygons(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives
            .values()
            .filter(|p| matches!(p, Primitive::Polygon { .. }))
    }

    /// Call counters since creation.
    pub fn stats(&self) -> SurfaceStats {
        self.stats
    }

    fn insert(&mut self, primitive: Primitive) -> PrimitiveId {
        let id = PrimitiveId(self.next_id);
        self.next_id += 1;
        self.primitives.insert(id, primitive);
        self.stats.created += 1;
        id
    }
}

impl Viewport for MemorySurface {
    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn viewport_width(&self) -> u32 {
        self.viewport_width
    }
}

impl MapSurface for MemorySurface {
    fn add_circle(&mut self, center: LatLng, radius_m: f64, style: &PathStyle) -> PrimitiveId {
        self.insert(Primitive::Circle {
            center,
            radius_m,
            style: style.clone(),
        })
    }

    fn update_circle(&mut self, id: PrimitiveId, center: LatLng, radius_m: f64, style: &PathStyle) {
        match self.primitives.get_mut(&id) {
            Some(primitive) if matches!(primitive, Primitive::Circle { .. }) => {
                *primitive = Primitive::Circle {
                    center,
                    radius_m,
                    style: style.clone(),
                };
                self.stats.updated += 1;
            }
            _ => tracing::warn!(%id, "update_circle on unknown or non-circle primitive"),
        }
    }

    fn add_polygon(&mut self, shape: &PolygonShape, style: &PathStyle) -> PrimitiveId {
        self.insert(Primitive::Polygon {
            shape: shape.clone(),
            style: style.clone(),
        })
    }

    fn update_polygon(&mut self, id: PrimitiveId, shape: &PolygonShape, style: &PathStyle) {
        match self.primitives.get_mut(&id) {
            Some(primitive) if matches!(primitive, Primitive::Polygon { .. }) => {
                *primitive = Primitive::Polygon {
                    shape: shape.clone(),
                    style: style.clone(),
                };
                self.stats.updated += 1;
            }
            _ => tracing::warn!(%id, "update_polygon on unknown or non-polygon primitive"),
        }
    }

    fn set_style(&mut self, id: PrimitiveId, new_style: &PathStyle) {
        match self.primitives.get_mut(&id) {
            Some(Primitive::Circle { style, .. }) | Some(Primitive::Polygon { style, .. }) => {
                *style = new_style.clone();
                self.stats.restyled += 1;
            }
            None => tracing::warn!(%id, "set_style on unknown primitive"),
        }
    }

    fn remove(&mut self, id: PrimitiveId) {
        if self.primitives.remove(&id).is_some() {
            self.stats.removed += 1;
        } else {
            tracing::warn!(%id, "remove on unknown primitive");
        }
    }
}
