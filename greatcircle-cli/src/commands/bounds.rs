//! Bounds command - print the approximate bounding box as JSON.

use super::common::{print_json, CircleArgs};
use crate::error::CliError;

/// Run the bounds command.
pub fn run(args: &CircleArgs) -> Result<(), CliError> {
    let bounds = args.overlay()?.bounds()?;
    print_json(&bounds)
}
