//! Common arguments and helpers shared across CLI commands.

use std::path::PathBuf;

use clap::Args;
use greatcircle::{ClipLat, GreatCircle, GreatCircleOptions, LatLng, MemorySurface};

use crate::error::CliError;

/// Circle center, radius and option overrides.
#[derive(Debug, Clone, Args)]
pub struct CircleArgs {
    /// Center latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Center longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Radius in meters (overrides the options file)
    #[arg(long)]
    pub radius: Option<f64>,

    /// INI options file with [circle] and [style] sections
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Bearing step in degrees between vertices
    #[arg(long)]
    pub deg_step: Option<f64>,

    /// Cap on copies per side (-1 for unbounded)
    #[arg(long, allow_hyphen_values = true)]
    pub max_copies: Option<i64>,

    /// Draw only the primary instance, no ±360° copies
    #[arg(long)]
    pub no_wrap: bool,

    /// Circle/polygon rule: "true" (always circle), "false" (always polygon)
    /// or a latitude threshold
    #[arg(long)]
    pub clip_lat: Option<ClipLat>,
}

/// Map viewport used for copy planning.
#[derive(Debug, Clone, Copy, Args)]
pub struct ViewArgs {
    /// Map zoom level
    #[arg(long, default_value_t = 3)]
    pub zoom: u8,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1024)]
    pub width: u32,
}

impl ViewArgs {
    /// An empty map with this viewport.
    pub fn surface(&self) -> MemorySurface {
        MemorySurface::new(self.zoom, self.width)
    }
}

impl CircleArgs {
    /// Circle center.
    pub fn center(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    /// Resolve options: file first, then command-line overrides.
    pub fn options(&self) -> Result<GreatCircleOptions, CliError> {
        // CLI takes precedence, then config
        let mut options = match &self.config {
            Some(path) => GreatCircleOptions::from_ini_file(path)?,
            None => GreatCircleOptions::default(),
        };

        if let Some(radius) = self.radius {
            options = options.with_radius(radius);
        }
        if let Some(step) = self.deg_step {
            options = options.with_deg_step(step);
        }
        if let Some(max) = self.max_copies {
            let max = match max {
                -1 => None,
                n => Some(u32::try_from(n).map_err(|_| {
                    CliError::Argument(format!("max-copies must be -1 or >= 0, got {}", n))
                })?),
            };
            options = options.with_max_copies(max);
        }
        if self.no_wrap {
            options = options.with_wrap_elements(false);
        }
        if let Some(clip_lat) = self.clip_lat {
            options = options.with_clip_lat(clip_lat);
        }

        options.validate()?;
        Ok(options)
    }

    /// A detached overlay built from these arguments.
    pub fn overlay(&self) -> Result<GreatCircle<MemorySurface>, CliError> {
        Ok(GreatCircle::new(self.center(), self.options()?)?)
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CircleArgs {
        CircleArgs {
            lat: 10.0,
            lng: 20.0,
            radius: Some(1000.0),
            config: None,
            deg_step: None,
            max_copies: None,
            no_wrap: false,
            clip_lat: None,
        }
    }

    #[test]
    fn test_overrides_apply() {
        let mut args = args();
        args.deg_step = Some(2.0);
        args.max_copies = Some(-1);
        args.no_wrap = true;
        args.clip_lat = Some(ClipLat::AlwaysPolygon);

        let options = args.options().unwrap();
        assert_eq!(options.radius, Some(1000.0));
        assert_eq!(options.deg_step, 2.0);
        assert_eq!(options.max_copies, None);
        assert!(!options.wrap_elements);
        assert_eq!(options.clip_lat, ClipLat::AlwaysPolygon);
    }

    #[test]
    fn test_negative_max_copies_rejected() {
        let mut args = args();
        args.max_copies = Some(-3);
        assert!(matches!(args.options(), Err(CliError::Argument(_))));
    }

    #[test]
    fn test_config_file_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("circle.ini");
        std::fs::write(&path, "[circle]\nradius = 5000\ndeg_step = 1\n").unwrap();

        let mut args = args();
        args.radius = None;
        args.config = Some(path);
        args.deg_step = Some(0.25);

        let options = args.options().unwrap();
        assert_eq!(options.radius, Some(5000.0));
        assert_eq!(options.deg_step, 0.25);
    }

    #[test]
    fn test_latitude_out_of_range_is_rejected() {
        let mut args = args();
        args.lat = 95.0;
        assert!(matches!(
            args.overlay(),
            Err(CliError::Geometry(greatcircle::GreatCircleError::InvalidCenter(_)))
        ));
    }

    #[test]
    fn test_bad_step_is_geometry_error() {
        let mut args = args();
        args.deg_step = Some(0.0);
        assert!(matches!(args.options(), Err(CliError::Geometry(_))));
    }
}
