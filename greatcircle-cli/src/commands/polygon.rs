//! Polygon command - print the render form for a viewport as JSON.

use super::common::{print_json, CircleArgs, ViewArgs};
use crate::error::CliError;

/// Run the polygon command.
pub fn run(args: &CircleArgs, view: &ViewArgs) -> Result<(), CliError> {
    let overlay = args.overlay()?;
    let form = overlay.geometry(&view.surface())?;
    tracing::debug!(
        form = form.name(),
        primitives = form.primitive_count(),
        "Computed render form"
    );
    print_json(&form)
}
