//! Render command - draw the overlay onto a blank map and save a PNG.

use std::path::Path;

use greatcircle::surface::save_png;
use greatcircle::LatLng;

use super::common::{CircleArgs, ViewArgs};
use crate::error::CliError;

/// Largest zoom the rasterizer is asked to draw.
const MAX_RENDER_ZOOM: u8 = 12;

/// Run the render command.
///
/// The image is centered on `view_center` when given, else on the circle.
pub fn run(
    args: &CircleArgs,
    view: &ViewArgs,
    view_center: Option<LatLng>,
    output: &Path,
) -> Result<(), CliError> {
    if view.zoom > MAX_RENDER_ZOOM {
        return Err(CliError::Argument(format!(
            "zoom {} is above the render limit of {}",
            view.zoom, MAX_RENDER_ZOOM
        )));
    }

    let mut overlay = args.overlay()?;
    overlay.add_to(view.surface())?;
    let center = view_center.unwrap_or_else(|| overlay.lat_lng());

    let map = overlay
        .map()
        .ok_or_else(|| CliError::Argument("overlay is not attached to a map".to_string()))?;
    save_png(map, center, output)?;

    println!(
        "Rendered {} primitive(s) at zoom {} to {}",
        map.live_count(),
        view.zoom,
        output.display()
    );
    Ok(())
}
