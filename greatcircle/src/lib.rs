//! GreatCircle - circles of constant radius on the sphere, flattened for web maps
//!
//! A circle drawn around a point on the Earth stops being a circle once it
//! is projected to lat/lng. Near a pole it opens into an arc that has to be
//! closed along the map edge, near the antipode it wraps both poles and
//! needs holes, and at low zoom it must be repeated every 360° so each
//! world copy shows it. This crate computes those outlines and keeps a map
//! surface's primitives in sync with them.
//!
//! # Pipeline
//!
//! ```text
//! center, radius ──► clip::classify ──┐
//! zoom, width ─────► copies::plan ────┼─► assembler::assemble ─► selector::select ─► MapSurface
//! options ────────────────────────────┘
//! ```
//!
//! [`GreatCircle`] runs that pipeline on every change and owns the
//! resulting primitives on a [`MapSurface`].

pub mod assembler;
pub mod binding;
pub mod clip;
pub mod config;
pub mod coord;
pub mod copies;
pub mod error;
pub mod great_circle;
pub mod logging;
pub mod selector;
pub mod surface;

pub use assembler::{assemble, Ring, RingSet};
pub use binding::{Companion, Marker, DEFAULT_BIND_EVENT};
pub use clip::{classify, classify_with_controls, Classification, ClipStatus, ControlPoints};
pub use config::{ClipLat, GreatCircleOptions, PathStyle, Rgba};
pub use coord::{project, LatLng, LatLngBounds};
pub use copies::{plan, Viewport};
pub use error::{ConfigError, GreatCircleError};
pub use great_circle::{GreatCircle, ZOOM_END_EVENT};
pub use selector::{select, LiveShape, RenderForm};
pub use surface::{MapSurface, MemorySurface, PolygonShape, PrimitiveId};
