//! Horizontal copy planning.
//!
//! At low zoom a web map shows the world several times side by side. To keep
//! the overlay visible on every repeat we draw copies shifted by multiples
//! of 360° longitude. The count is a visual heuristic tuned for 256 px tiles:
//!
//! | zoom | span (px) | bias |
//! |------|-----------|------|
//! | 0    | 256       | 2    |
//! | 1    | 512       | 2    |
//! | 2    | 768       | 1    |
//! | >2   | -         | 1 copy per side |

use crate::config::GreatCircleOptions;

/// Pixel span used per zoom level for zooms 0, 1 and 2.
const TILE_SPAN_PX: [f64; 3] = [256.0, 512.0, 768.0];

/// Extra copies added per zoom level for zooms 0, 1 and 2.
const COPY_BIAS: [u32; 3] = [2, 2, 1];

/// Copies per side once the world no longer repeats much on screen.
const HIGH_ZOOM_COPIES: u32 = 1;

/// Read-only view of the host map needed for planning.
pub trait Viewport {
    /// Current zoom level.
    fn zoom(&self) -> u8;

    /// Viewport width in pixels.
    fn viewport_width(&self) -> u32;
}

/// Plan how many copies to draw on each side of the primary instance.
///
/// # Arguments
///
/// * `zoom` - Current map zoom level
/// * `viewport_width` - Viewport width in pixels
/// * `options` - Overlay options (`max_copies` caps, `wrap_elements` disables)
///
/// # Returns
///
/// Copies per side; `0` means only the primary instance.
pub fn plan(zoom: u8, viewport_width: u32, options: &GreatCircleOptions) -> u32 {
    if !options.wrap_elements {
        return 0;
    }

    let estimate = match TILE_SPAN_PX.get(zoom as usize) {
        Some(span) => {
            let repeats = (viewport_width as f64 / span / 4.0).ceil() as u32;
            repeats + COPY_BIAS[zoom as usize]
        }
        None => HIGH_ZOOM_COPIES,
    };

    match options.max_copies {
        Some(max) => estimate.min(max),
        None => estimate,
    }
}

/// Plan copies for a viewport.
#[inline]
pub fn plan_for(viewport: &impl Viewport, options: &GreatCircleOptions) -> u32 {
    plan(viewport.zoom(), viewport.viewport_width(), options)
}
