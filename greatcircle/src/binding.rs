//! Position binding to a companion object.
//!
//! An overlay can follow another object with a position, typically a
//! draggable marker. The host forwards the companion's movement event to
//! the overlay, which re-reads the companion's position.

use std::cell::RefCell;
use std::rc::Rc;

use crate::coord::LatLng;

/// Event the companion is expected to emit when it moves.
pub const DEFAULT_BIND_EVENT: &str = "drag";

/// Zoom at or below which a wrapped companion is pulled back into ±180°.
pub const MARKER_WRAP_MAX_ZOOM: u8 = 2;

/// An object with a position that an overlay can follow.
pub trait Companion {
    /// Current position.
    fn lat_lng(&self) -> LatLng;

    /// Move the companion.
    fn set_lat_lng(&mut self, position: LatLng);
}

impl<T: Companion + ?Sized> Companion for Rc<RefCell<T>> {
    fn lat_lng(&self) -> LatLng {
        self.borrow().lat_lng()
    }

    fn set_lat_lng(&mut self, position: LatLng) {
        self.borrow_mut().set_lat_lng(position)
    }
}

/// A bare positioned marker.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Marker {
    position: LatLng,
}

impl Marker {
    pub fn new(position: LatLng) -> Self {
        Self { position }
    }
}

impl Companion for Marker {
    fn lat_lng(&self) -> LatLng {
        self.position
    }

    fn set_lat_lng(&mut self, position: LatLng) {
        self.position = position;
    }
}

/// A companion together with the event that signals its movement.
pub(crate) struct Binding {
    pub(crate) companion: Box<dyn Companion>,
    pub(crate) event: String,
}

impl Binding {
    pub(crate) fn new(companion: Box<dyn Companion>, event: impl Into<String>) -> Self {
        Self {
            companion,
            event: event.into(),
        }
    }

    /// Pulls the companion back into [-180, 180] when it has been dragged
    /// onto a neighbouring world copy.
    ///
    /// Returns the companion's position after wrapping.
    pub(crate) fn wrap_companion(&mut self) -> LatLng {
        let mut position = self.companion.lat_lng();
        let wrapped = if position.lng < -180.0 {
            Some(position.lng + 360.0)
        } else if position.lng > 180.0 {
            Some(position.lng - 360.0)
        } else {
            None
        };

        if let Some(lng) = wrapped {
            tracing::debug!(from = position.lng, to = lng, "Wrapping companion longitude");
            position.lng = lng;
            self.companion.set_lat_lng(position);
        }
        position
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("position", &self.companion.lat_lng())
            .field("event", &self.event)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_moves() {
        let mut marker = Marker::new(LatLng::new(1.0, 2.0));
        marker.set_lat_lng(LatLng::new(3.0, 4.0));
        assert_eq!(marker.lat_lng(), LatLng::new(3.0, 4.0));
    }

    #[test]
    fn test_shared_marker_is_companion() {
        let shared = Rc::new(RefCell::new(Marker::new(LatLng::new(0.0, 0.0))));
        let mut handle: Box<dyn Companion> = Box::new(Rc::clone(&shared));
        handle.set_lat_lng(LatLng::new(5.0, 6.0));
        assert_eq!(shared.borrow().lat_lng(), LatLng::new(5.0, 6.0));
    }

    #[test]
    fn test_wrap_companion_east() {
        let shared = Rc::new(RefCell::new(Marker::new(LatLng::new(10.0, 200.0))));
        let mut binding = Binding::new(Box::new(Rc::clone(&shared)), DEFAULT_BIND_EVENT);
        let position = binding.wrap_companion();
        assert_eq!(position, LatLng::new(10.0, -160.0));
        assert_eq!(shared.borrow().lat_lng(), LatLng::new(10.0, -160.0));
    }

    #[test]
    fn test_wrap_companion_west() {
        let mut binding = Binding::new(
            Box::new(Marker::new(LatLng::new(-10.0, -190.0))),
            DEFAULT_BIND_EVENT,
        );
        assert_eq!(binding.wrap_companion(), LatLng::new(-10.0, 170.0));
    }

    #[test]
    fn test_wrap_companion_in_range_is_untouched() {
        let mut binding = Binding::new(Box::new(Marker::new(LatLng::new(0.0, 180.0))), "move");
        assert_eq!(binding.wrap_companion(), LatLng::new(0.0, 180.0));
        assert_eq!(binding.event, "move");
    }
}
