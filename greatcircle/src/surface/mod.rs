//! Rendering collaborator interface.
//!
//! The overlay never draws anything itself. It asks a [`MapSurface`] to
//! create, update, restyle and remove primitives, and reads zoom and
//! viewport width through the [`Viewport`] supertrait. Hosts implement the
//! trait for their map; [`MemorySurface`] is an in-memory implementation
//! used by the CLI and the tests.
//!
//! # Design Principles
//!
//! - **Handles, not objects**: primitives are addressed by [`PrimitiveId`]
//! - **Synchronous**: every call completes before the redraw continues
//! - **Shared maps**: `Rc<RefCell<S>>` is itself a surface, so several
//!   overlays can draw onto one map

mod memory;
mod raster;

pub use memory::{MemorySurface, Primitive, SurfaceStats};
pub use raster::{rasterize, save_png, RasterError};

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::assembler::{Ring, RingSet};
use crate::config::PathStyle;
use crate::coord::LatLng;
pub use crate::copies::Viewport;

/// Opaque handle for a primitive living on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrimitiveId(pub u64);

impl fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Vertex data of a polygon primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rings", rename_all = "snake_case")]
pub enum PolygonShape {
    /// A single ring.
    Ring(Ring),
    /// Several rings: disjoint outlines, or an outer ring followed by holes.
    Rings(RingSet),
}

impl PolygonShape {
    /// Returns true if the shape holds multiple rings.
    pub fn is_multi(&self) -> bool {
        matches!(self, PolygonShape::Rings(_))
    }

    /// Iterates over every ring of the shape.
    pub fn rings(&self) -> Box<dyn Iterator<Item = &Ring> + '_> {
        match self {
            PolygonShape::Ring(ring) => Box::new(std::iter::once(ring)),
            PolygonShape::Rings(rings) => Box::new(rings.iter()),
        }
    }
}

/// A map that can host circle and polygon primitives.
pub trait MapSurface: Viewport {
    /// Create a circle primitive (unprojected, radius in meters).
    fn add_circle(&mut self, center: LatLng, radius_m: f64, style: &PathStyle) -> PrimitiveId;

    /// Move, resize and restyle an existing circle.
    fn update_circle(&mut self, id: PrimitiveId, center: LatLng, radius_m: f64, style: &PathStyle);

    /// Create a polygon primitive.
    fn add_polygon(&mut self, shape: &PolygonShape, style: &PathStyle) -> PrimitiveId;

    /// Replace the vertices and style of an existing polygon.
    fn update_polygon(&mut self, id: PrimitiveId, shape: &PolygonShape, style: &PathStyle);

    /// Restyle a primitive.
    fn set_style(&mut self, id: PrimitiveId, style: &PathStyle);

    /// Remove a primitive from the surface.
    fn remove(&mut self, id: PrimitiveId);
}

impl<T: Viewport + ?Sized> Viewport for Rc<RefCell<T>> {
    fn zoom(&self) -> u8 {
        self.borrow().zoom()
    }

    fn viewport_width(&self) -> u32 {
        self.borrow().viewport_width()
    }
}

impl<T: MapSurface + ?Sized> MapSurface for Rc<RefCell<T>> {
    fn add_circle(&mut self, center: LatLng, radius_m: f64, style: &PathStyle) -> PrimitiveId {
        self.borrow_mut().add_circle(center, radius_m, style)
    }

    fn update_circle(&mut self, id: PrimitiveId, center: LatLng, radius_m: f64, style: &PathStyle) {
        self.borrow_mut().update_circle(id, center, radius_m, style)
    }

    fn add_polygon(&mut self, shape: &PolygonShape, style: &PathStyle) -> PrimitiveId {
        self.borrow_mut().add_polygon(shape, style)
    }

    fn update_polygon(&mut self, id: PrimitiveId, shape: &PolygonShape, style: &PathStyle) {
        self.borrow_mut().update_polygon(id, shape, style)
    }

    fn set_style(&mut self, id: PrimitiveId, style: &PathStyle) {
        self.borrow_mut().set_style(id, style)
    }

    fn remove(&mut self, id: PrimitiveId) {
        self.borrow_mut().remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_shape_rings() {
        let ring = vec![LatLng::new(0.0, 0.0), LatLng::new(1.0, 0.0), LatLng::new(0.0, 1.0)];
        let single = PolygonShape::Ring(ring.clone());
        assert!(!single.is_multi());
        assert_eq!(single.rings().count(), 1);

        let multi = PolygonShape::Rings(vec![ring.clone(), ring]);
        assert!(multi.is_multi());
        assert_eq!(multi.rings().count(), 2);
    }

    #[test]
    fn test_shared_surface_forwards_calls() {
        let shared = Rc::new(RefCell::new(MemorySurface::new(3, 1024)));
        let mut handle = Rc::clone(&shared);

        let id = handle.add_circle(LatLng::new(1.0, 2.0), 500.0, &PathStyle::default());
        assert_eq!(handle.zoom(), 3);
        assert_eq!(shared.borrow().live_count(), 1);

        handle.remove(id);
        assert_eq!(shared.borrow().live_count(), 0);
    }

    #[test]
    fn test_primitive_id_display() {
        assert_eq!(PrimitiveId(7).to_string(), "#7");
    }
}
