//! Classify command - report how a circle meets the poles.

use greatcircle::coord::meters_to_km;
use greatcircle::{classify_with_controls, Classification};
use serde::Serialize;

use super::common::{print_json, CircleArgs};
use crate::error::CliError;

#[derive(Serialize)]
struct Report {
    radius_m: f64,
    #[serde(flatten)]
    classification: Classification,
}

/// Run the classify command.
pub fn run(args: &CircleArgs, json: bool) -> Result<(), CliError> {
    let overlay = args.overlay()?;
    let radius_m = overlay.options().effective_radius()?;
    let classification = classify_with_controls(overlay.lat_lng(), meters_to_km(radius_m));

    if json {
        return print_json(&Report {
            radius_m,
            classification,
        });
    }

    let controls = &classification.controls;
    println!("Center:      {}", overlay.lat_lng());
    println!("Radius:      {} m", radius_m);
    println!("Clip status: {}", classification.status);
    println!();
    println!("Control points:");
    println!("  bearing    0: {}", controls.north);
    println!("  bearing  360: {}", controls.north_full_turn);
    println!("  bearing  180: {}", controls.south);
    println!("  bearing -180: {}", controls.south_full_turn);
    Ok(())
}
