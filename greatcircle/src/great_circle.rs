//! The great circle overlay object.
//!
//! [`GreatCircle`] owns a center, a set of options and whatever primitives
//! it currently has on a map. Every mutation runs one synchronous redraw:
//! classify, plan copies, assemble, select a form and apply it to the map.
//! Nothing derived is kept between redraws except the primitive handles.
//!
//! # Example
//!
//! ```
//! use greatcircle::{GreatCircle, GreatCircleOptions, LatLng, MemorySurface};
//!
//! let mut circle = GreatCircle::new(
//!     LatLng::new(51.5, -0.1),
//!     GreatCircleOptions::new(3_000_000.0),
//! )
//! .unwrap();
//! circle.add_to(MemorySurface::new(3, 1024)).unwrap();
//! assert!(circle.map().map_or(false, |map| map.live_count() > 0));
//! ```

use tracing::{debug, info};

use crate::binding::{Binding, Companion, MARKER_WRAP_MAX_ZOOM};
use crate::clip::{classify_with_controls, ClipStatus};
use crate::config::{GreatCircleOptions, PathStyle};
use crate::coord::{meters_to_km, project, LatLng, LatLngBounds};
use crate::copies::{plan_for, Viewport};
use crate::error::GreatCircleError;
use crate::selector::{select, LiveShape, RenderForm};
use crate::surface::MapSurface;

/// Event name a host forwards after the map zoom changed.
pub const ZOOM_END_EVENT: &str = "zoomend";

/// Bearing of the north-west bounds corner.
const BOUNDS_NW_BEARING: f64 = 315.0;

/// Bearing of the south-east bounds corner.
const BOUNDS_SE_BEARING: f64 = 135.0;

/// A circle of constant radius on the sphere, drawn on a flat map.
#[derive(Debug)]
pub struct GreatCircle<M: MapSurface> {
    center: LatLng,
    options: GreatCircleOptions,
    map: Option<M>,
    live: LiveShape,
    binding: Option<Binding>,
}

/// Everything one redraw derives from the current state.
struct Frame {
    status: ClipStatus,
    copies: u32,
    form: RenderForm,
}

fn compute_frame(
    center: LatLng,
    options: &GreatCircleOptions,
    viewport: &impl Viewport,
) -> Result<Frame, GreatCircleError> {
    let radius_m = options.effective_radius()?;
    let classification = classify_with_controls(center, meters_to_km(radius_m));
    let copies = plan_for(viewport, options);
    let form = select(center, radius_m, options, &classification, copies)?;
    Ok(Frame {
        status: classification.status,
        copies,
        form,
    })
}

fn checked_center(center: LatLng) -> Result<LatLng, GreatCircleError> {
    if center.is_valid() {
        Ok(center)
    } else {
        Err(GreatCircleError::InvalidCenter(center))
    }
}

impl<M: MapSurface> GreatCircle<M> {
    /// Create a detached overlay.
    ///
    /// The radius in `options` (if any) is clamped like [`set_radius`](Self::set_radius).
    ///
    /// # Errors
    ///
    /// Returns an error if the center is not a valid position or the options
    /// fail validation.
    pub fn new(center: LatLng, mut options: GreatCircleOptions) -> Result<Self, GreatCircleError> {
        let center = checked_center(center)?;
        options.validate()?;
        if let Some(radius) = options.radius {
            options.radius = Some(options.clamp_radius(radius)?);
        }
        Ok(Self {
            center,
            options,
            map: None,
            live: LiveShape::Empty,
            binding: None,
        })
    }

    /// Attach to a map and draw.
    ///
    /// An overlay already on another map is removed from it first; that map
    /// is dropped.
    pub fn add_to(&mut self, map: M) -> Result<(), GreatCircleError> {
        if self.map.is_some() {
            self.remove();
        }
        self.map = Some(map);
        info!(center = %self.center, "Great circle added to map");
        self.redraw()
    }

    /// Remove every primitive and detach, handing the map back.
    pub fn remove(&mut self) -> Option<M> {
        let mut map = self.map.take()?;
        self.live.teardown(&mut map);
        Some(map)
    }

    /// Returns true while attached to a map.
    pub fn is_attached(&self) -> bool {
        self.map.is_some()
    }

    /// The map this overlay is drawn on.
    pub fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }

    /// Mutable access to the map, e.g. to change its zoom.
    ///
    /// Follow a zoom change with [`handle_event`](Self::handle_event)`("zoomend")`.
    pub fn map_mut(&mut self) -> Option<&mut M> {
        self.map.as_mut()
    }

    /// Move the center and redraw.
    ///
    /// An invalid position is rejected and the current center kept.
    pub fn set_lat_lng(&mut self, position: impl Into<LatLng>) -> Result<(), GreatCircleError> {
        self.center = checked_center(position.into())?;
        self.redraw()
    }

    /// Current center.
    pub fn lat_lng(&self) -> LatLng {
        self.center
    }

    /// Set the radius in meters, clamped to `max_radius` and the antipodal
    /// distance, and redraw.
    pub fn set_radius(&mut self, radius: f64) -> Result<(), GreatCircleError> {
        let clamped = self.options.clamp_radius(radius)?;
        self.options.radius = Some(clamped);
        self.redraw()
    }

    /// Stored radius in meters, after clamping.
    pub fn radius(&self) -> Option<f64> {
        self.options.radius
    }

    /// Restyle every live primitive and keep the style for future ones.
    pub fn set_style(&mut self, style: PathStyle) {
        if let Some(map) = self.map.as_mut() {
            self.live.set_style(map, &style);
        }
        self.options.style = style;
    }

    /// Current options.
    pub fn options(&self) -> &GreatCircleOptions {
        &self.options
    }

    /// Primitives currently on the map.
    pub fn live_shape(&self) -> &LiveShape {
        &self.live
    }

    /// Approximate bounds from the projections at bearings 315° and 135°.
    ///
    /// This is not the exact extent of the drawn polygon, only a box around
    /// the center that grows with the radius.
    pub fn bounds(&self) -> Result<LatLngBounds, GreatCircleError> {
        let radius_km = meters_to_km(self.options.effective_radius()?);
        Ok(LatLngBounds::from_corners(
            project(self.center, BOUNDS_NW_BEARING, radius_km, None),
            project(self.center, BOUNDS_SE_BEARING, radius_km, None),
        ))
    }

    /// Compute the render form for a viewport without touching any map.
    pub fn geometry(&self, viewport: &impl Viewport) -> Result<RenderForm, GreatCircleError> {
        compute_frame(self.center, &self.options, viewport).map(|frame| frame.form)
    }

    /// Recompute everything and bring the map up to date.
    ///
    /// Detached overlays have nothing to draw; this returns `Ok(())`.
    ///
    /// # Errors
    ///
    /// [`GreatCircleError::RadiusNotSet`] when attached without a radius.
    pub fn redraw(&mut self) -> Result<(), GreatCircleError> {
        let Some(map) = self.map.as_mut() else {
            return Ok(());
        };

        let frame = compute_frame(self.center, &self.options, &*map)?;
        debug!(
            clip_status = %frame.status,
            copies = frame.copies,
            form = frame.form.name(),
            "Redrawing great circle"
        );
        self.live.apply(&frame.form, map, &self.options.style);
        Ok(())
    }

    /// Follow a companion's position.
    ///
    /// The companion is read immediately and again every time `event` is
    /// passed to [`handle_event`](Self::handle_event).
    pub fn bind_to(
        &mut self,
        companion: Box<dyn Companion>,
        event: impl Into<String>,
    ) -> Result<(), GreatCircleError> {
        let binding = Binding::new(companion, event);
        debug!(?binding, "Binding great circle");
        self.binding = Some(binding);
        self.sync_companion()
    }

    /// Drop the companion binding, if any.
    pub fn unbind(&mut self) -> Option<Box<dyn Companion>> {
        self.binding.take().map(|binding| binding.companion)
    }

    /// React to a host event.
    ///
    /// `"zoomend"` redraws; the bound event name re-reads the companion.
    /// Other events are ignored.
    pub fn handle_event(&mut self, event: &str) -> Result<(), GreatCircleError> {
        if event == ZOOM_END_EVENT {
            return self.redraw();
        }
        let bound = self
            .binding
            .as_ref()
            .map_or(false, |binding| binding.event == event);
        if bound {
            self.sync_companion()
        } else {
            Ok(())
        }
    }

    fn sync_companion(&mut self) -> Result<(), GreatCircleError> {
        let Some(binding) = self.binding.as_mut() else {
            return Ok(());
        };

        // Compared before wrapping: a wrapped companion at our center still
        // counts as unmoved.
        let position = checked_center(binding.companion.lat_lng())?;
        let unmoved = position == self.center;

        let zoom = self.map.as_ref().map(|map| map.zoom());
        if self.options.wrap_marker && matches!(zoom, Some(z) if z <= MARKER_WRAP_MAX_ZOOM) {
            binding.wrap_companion();
        }

        if unmoved {
            return Ok(());
        }
        let position = binding.companion.lat_lng();
        self.set_lat_lng(position)
    }
}
