//! GreatCircle CLI - Command-line interface
//!
//! Classifies, outlines and renders circles of constant radius on the
//! sphere as they appear on a flat lat/lng map.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use greatcircle::LatLng;

use commands::common::{CircleArgs, ViewArgs};
use error::CliError;

#[derive(Parser, Debug)]
#[command(
    name = "greatcircle",
    author,
    version,
    about = "Spherical circles on a flat lat/lng map"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report the clip status and control points of a circle
    Classify {
        #[command(flatten)]
        circle: CircleArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the render form (circles or polygon rings) as JSON
    Polygon {
        #[command(flatten)]
        circle: CircleArgs,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Print the approximate bounding box as JSON
    Bounds {
        #[command(flatten)]
        circle: CircleArgs,
    },

    /// Draw the circle onto a blank map and save it as PNG
    Render {
        #[command(flatten)]
        circle: CircleArgs,

        #[command(flatten)]
        view: ViewArgs,

        /// Latitude at the image center (defaults to the circle center)
        #[arg(long, allow_hyphen_values = true, requires = "view_lng")]
        view_lat: Option<f64>,

        /// Longitude at the image center (defaults to the circle center)
        #[arg(long, allow_hyphen_values = true, requires = "view_lat")]
        view_lng: Option<f64>,

        /// Output PNG path
        #[arg(short, long, default_value = "greatcircle.png")]
        output: PathBuf,
    },
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Classify { circle, json } => commands::classify::run(&circle, json),
        Command::Polygon { circle, view } => commands::polygon::run(&circle, &view),
        Command::Bounds { circle } => commands::bounds::run(&circle),
        Command::Render {
            circle,
            view,
            view_lat,
            view_lng,
            output,
        } => {
            let view_center = view_lat.zip(view_lng).map(|(lat, lng)| LatLng::new(lat, lng));
            commands::render::run(&circle, &view, view_center, &output)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    greatcircle::logging::init(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
