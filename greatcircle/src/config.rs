//! Configuration for a great-circle overlay.
//!
//! Options are a plain struct with documented defaults and `with_*` builder
//! methods. They can also be read from an INI file:
//!
//! ```ini
//! [circle]
//! radius = 1500000
//! clip_lat = 80
//! clip_rad = 2000000
//! deg_step = 0.5
//! max_copies = -1
//! wrap_elements = true
//! wrap_marker = true
//! max_radius = 20015086.5
//!
//! [style]
//! color = 3388ff
//! weight = 3
//! opacity = 1.0
//! fill = true
//! fill_color = 3388ff
//! fill_opacity = 0.2
//! ```
//!
//! `clip_lat` takes `true`, `false`, or a latitude; `-1` disables
//! `max_copies` and `max_radius`. Colors are `rrggbb` hex, since `#` starts
//! an INI comment.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use ini::{Ini, Properties};
use serde::{Deserialize, Serialize};

use crate::coord::ANTIPODAL_DISTANCE_M;
use crate::error::{ConfigError, GreatCircleError};

/// Default latitude beyond which the polygon form is preferred.
pub const DEFAULT_CLIP_LAT: f64 = 80.0;

/// Default radius (meters) at which the polygon form is always used.
pub const DEFAULT_CLIP_RAD: f64 = 2_000_000.0;

/// Default bearing step (degrees) between ring vertices.
pub const DEFAULT_DEG_STEP: f64 = 0.5;

/// Default radius cap (meters), half the Earth's circumference.
pub const DEFAULT_MAX_RADIUS: f64 = 20_015_086.5;

/// INI section holding the geometry options.
const CIRCLE_SECTION: &str = "circle";

/// INI section holding the path style.
const STYLE_SECTION: &str = "style";

/// When the unprojected circle primitive may be used instead of a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipLat {
    /// Always render the computed polygon.
    AlwaysPolygon,
    /// Always render a plain circle primitive, even across poles.
    AlwaysCircle,
    /// Use the polygon once a control point reaches this latitude (±).
    Latitude(f64),
}

impl Default for ClipLat {
    fn default() -> Self {
        ClipLat::Latitude(DEFAULT_CLIP_LAT)
    }
}

impl FromStr for ClipLat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "true" => Ok(ClipLat::AlwaysCircle),
            "false" => Ok(ClipLat::AlwaysPolygon),
            other => other
                .parse::<f64>()
                .ok()
                .filter(|lat| lat.is_finite())
                .map(ClipLat::Latitude)
                .ok_or_else(|| ConfigError::invalid("clip_lat", s)),
        }
    }
}

impl fmt::Display for ClipLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipLat::AlwaysPolygon => write!(f, "false"),
            ClipLat::AlwaysCircle => write!(f, "true"),
            ClipLat::Latitude(lat) => write!(f, "{}", lat),
        }
    }
}

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `rrggbb` (a leading `#` is accepted) with the given opacity.
    pub fn from_hex(hex: &str, opacity: f64) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: opacity_to_alpha(opacity),
        })
    }

    /// Returns the same color with a different opacity.
    pub fn with_opacity(self, opacity: f64) -> Self {
        Self {
            a: opacity_to_alpha(opacity),
            ..self
        }
    }
}

fn opacity_to_alpha(opacity: f64) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Stroke and fill style applied to every primitive of an overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStyle {
    /// Stroke color.
    pub color: Rgba,
    /// Stroke width in pixels.
    pub weight: f32,
    /// Fill color, or `None` for an outline only.
    pub fill: Option<Rgba>,
}

impl Default for PathStyle {
    fn default() -> Self {
        // Leaflet path defaults: #3388ff, weight 3, fill opacity 0.2
        let blue = Rgba::new(0x33, 0x88, 0xff, 0xff);
        Self {
            color: blue,
            weight: 3.0,
            fill: Some(blue.with_opacity(0.2)),
        }
    }
}

impl PathStyle {
    /// Set the stroke color.
    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Set the stroke width.
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Set (or clear) the fill color.
    pub fn with_fill(mut self, fill: Option<Rgba>) -> Self {
        self.fill = fill;
        self
    }
}

/// Options controlling how a great circle is computed and rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct GreatCircleOptions {
    /// Circle radius in meters. Must be set before the first redraw.
    pub radius: Option<f64>,

    /// Latitude rule for choosing between circle and polygon forms.
    pub clip_lat: ClipLat,

    /// Radius (meters) at or above which the polygon form is used.
    pub clip_rad: f64,

    /// Bearing step in degrees between ring vertices. Smaller is smoother.
    pub deg_step: f64,

    /// Cap on horizontal copies per side. `None` means unbounded.
    pub max_copies: Option<u32>,

    /// Whether to draw copies at ±360° longitude offsets at all.
    pub wrap_elements: bool,

    /// Whether a bound companion is wrapped back into [-180, 180] at low zoom.
    pub wrap_marker: bool,

    /// Cap on the radius in meters. `None` disables the cap.
    pub max_radius: Option<f64>,

    /// Style handed to every primitive.
    pub style: PathStyle,
}

impl Default for GreatCircleOptions {
    fn default() -> Self {
        Self {
            radius: None,
            clip_lat: ClipLat::default(),
            clip_rad: DEFAULT_CLIP_RAD,
            deg_step: DEFAULT_DEG_STEP,
            max_copies: None,
            wrap_elements: true,
            wrap_marker: true,
            max_radius: Some(DEFAULT_MAX_RADIUS),
            style: PathStyle::default(),
        }
    }
}

impl GreatCircleOptions {
    /// Create options with the given radius and defaults for everything else.
    pub fn new(radius: f64) -> Self {
        Self {
            radius: Some(radius),
            ..Default::default()
        }
    }

    /// Set the radius in meters.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Set the latitude rule.
    pub fn with_clip_lat(mut self, clip_lat: ClipLat) -> Self {
        self.clip_lat = clip_lat;
        self
    }

    /// Set the polygon radius threshold.
    pub fn with_clip_rad(mut self, clip_rad: f64) -> Self {
        self.clip_rad = clip_rad;
        self
    }

    /// Set the bearing step in degrees.
    pub fn with_deg_step(mut self, deg_step: f64) -> Self {
        self.deg_step = deg_step;
        self
    }

    /// Set (or clear) the copy cap.
    pub fn with_max_copies(mut self, max_copies: Option<u32>) -> Self {
        self.max_copies = max_copies;
        self
    }

    /// Enable or disable horizontal copies.
    pub fn with_wrap_elements(mut self, wrap: bool) -> Self {
        self.wrap_elements = wrap;
        self
    }

    /// Enable or disable companion wrapping.
    pub fn with_wrap_marker(mut self, wrap: bool) -> Self {
        self.wrap_marker = wrap;
        self
    }

    /// Set (or clear) the radius cap.
    pub fn with_max_radius(mut self, max_radius: Option<f64>) -> Self {
        self.max_radius = max_radius;
        self
    }

    /// Set the path style.
    pub fn with_style(mut self, style: PathStyle) -> Self {
        self.style = style;
        self
    }

    /// Applies the radius cap (and the antipodal limit) to a requested radius.
    ///
    /// # Errors
    ///
    /// Returns [`GreatCircleError::InvalidRadius`] for non-finite or
    /// non-positive radii. Oversized radii are clamped, never rejected.
    pub fn clamp_radius(&self, radius: f64) -> Result<f64, GreatCircleError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GreatCircleError::InvalidRadius(radius));
        }
        let capped = match self.max_radius {
            Some(max) if radius > max => max,
            _ => radius,
        };
        let clamped = capped.min(ANTIPODAL_DISTANCE_M);
        if clamped != radius {
            tracing::warn!(requested = radius, clamped, "Radius clamped");
        }
        Ok(clamped)
    }

    /// The radius to draw with: the configured radius after clamping.
    ///
    /// # Errors
    ///
    /// [`GreatCircleError::RadiusNotSet`] if no radius is configured, or
    /// [`GreatCircleError::InvalidRadius`] if it is unusable.
    pub fn effective_radius(&self) -> Result<f64, GreatCircleError> {
        let radius = self.radius.ok_or(GreatCircleError::RadiusNotSet)?;
        self.clamp_radius(radius)
    }

    /// Checks every option that has a validity constraint.
    pub fn validate(&self) -> Result<(), GreatCircleError> {
        if !self.deg_step.is_finite() || self.deg_step <= 0.0 {
            return Err(GreatCircleError::InvalidStep(self.deg_step));
        }
        if let Some(radius) = self.radius {
            self.clamp_radius(radius)?;
        }
        if !self.clip_rad.is_finite() || self.clip_rad < 0.0 {
            return Err(ConfigError::invalid("clip_rad", self.clip_rad).into());
        }
        if let Some(max) = self.max_radius {
            if !max.is_finite() || max <= 0.0 {
                return Err(ConfigError::invalid("max_radius", max).into());
            }
        }
        Ok(())
    }

    /// Load options from an INI file. Missing keys keep their defaults.
    pub fn from_ini_file(path: impl AsRef<Path>) -> Result<Self, GreatCircleError> {
        let ini = Ini::load_from_file(path.as_ref()).map_err(ConfigError::from)?;
        Self::from_ini(&ini)
    }

    /// Load options from INI text. Missing keys keep their defaults.
    pub fn from_ini_str(text: &str) -> Result<Self, GreatCircleError> {
        let ini = Ini::load_from_str(text).map_err(ConfigError::from)?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, GreatCircleError> {
        let mut options = Self::default();

        if let Some(section) = ini.section(Some(CIRCLE_SECTION)) {
            if let Some(radius) = parse_key::<f64>(section, "radius")? {
                options.radius = Some(radius);
            }
            if let Some(clip_lat) = parse_key::<ClipLat>(section, "clip_lat")? {
                options.clip_lat = clip_lat;
            }
            if let Some(clip_rad) = parse_key(section, "clip_rad")? {
                options.clip_rad = clip_rad;
            }
            if let Some(deg_step) = parse_key(section, "deg_step")? {
                options.deg_step = deg_step;
            }
            if let Some(max_copies) = parse_key::<i64>(section, "max_copies")? {
                options.max_copies = match max_copies {
                    -1 => None,
                    n if n >= 0 => Some(
                        u32::try_from(n).map_err(|_| ConfigError::invalid("max_copies", n))?,
                    ),
                    n => return Err(ConfigError::invalid("max_copies", n).into()),
                };
            }
            if let Some(wrap) = parse_key(section, "wrap_elements")? {
                options.wrap_elements = wrap;
            }
            if let Some(wrap) = parse_key(section, "wrap_marker")? {
                options.wrap_marker = wrap;
            }
            if let Some(max_radius) = parse_key::<f64>(section, "max_radius")? {
                options.max_radius = if max_radius == -1.0 {
                    None
                } else {
                    Some(max_radius)
                };
            }
        }

        if let Some(section) = ini.section(Some(STYLE_SECTION)) {
            options.style = parse_style(section, options.style)?;
        }

        options.validate()?;
        Ok(options)
    }
}

fn parse_style(section: &Properties, mut style: PathStyle) -> Result<PathStyle, ConfigError> {
    let opacity = parse_key::<f64>(section, "opacity")?.unwrap_or(1.0);
    if let Some(hex) = section.get("color") {
        style.color = Rgba::from_hex(hex, opacity).ok_or_else(|| ConfigError::invalid("color", hex))?;
    } else {
        style.color = style.color.with_opacity(opacity);
    }
    if let Some(weight) = parse_key(section, "weight")? {
        style.weight = weight;
    }

    let fill_enabled = parse_key::<bool>(section, "fill")?.unwrap_or(style.fill.is_some());
    let fill_opacity = parse_key::<f64>(section, "fill_opacity")?.unwrap_or(0.2);
    style.fill = if fill_enabled {
        // Fill follows the stroke color unless given explicitly
        let fill = match section.get("fill_color") {
            Some(hex) => Rgba::from_hex(hex, fill_opacity)
                .ok_or_else(|| ConfigError::invalid("fill_color", hex))?,
            None => style.color.with_opacity(fill_opacity),
        };
        Some(fill)
    } else {
        None
    };
    Ok(style)
}

fn parse_key<T: FromStr>(section: &Properties, key: &str) -> Result<Option<T>, ConfigError> {
    match section.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::invalid(key, raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_options() {
        let options = GreatCircleOptions::default();
        assert_eq!(options.radius, None);
        assert_eq!(options.clip_lat, ClipLat::Latitude(80.0));
        assert_eq!(options.clip_rad, 2_000_000.0);
        assert_eq!(options.deg_step, 0.5);
        assert_eq!(options.max_copies, None);
        assert!(options.wrap_elements);
        assert!(options.wrap_marker);
        assert_eq!(options.max_radius, Some(20_015_086.5));
    }

    #[test]
    fn test_builder_pattern() {
        let options = GreatCircleOptions::new(1_000.0)
            .with_clip_lat(ClipLat::AlwaysPolygon)
            .with_clip_rad(5_000.0)
            .with_deg_step(2.0)
            .with_max_copies(Some(3))
            .with_wrap_elements(false)
            .with_wrap_marker(false)
            .with_max_radius(None);

        assert_eq!(options.radius, Some(1_000.0));
        assert_eq!(options.clip_lat, ClipLat::AlwaysPolygon);
        assert_eq!(options.clip_rad, 5_000.0);
        assert_eq!(options.deg_step, 2.0);
        assert_eq!(options.max_copies, Some(3));
        assert!(!options.wrap_elements);
        assert!(!options.wrap_marker);
        assert_eq!(options.max_radius, None);
    }

    #[test]
    fn test_clamp_radius_to_max_radius() {
        let options = GreatCircleOptions::default();
        let clamped = options.clamp_radius(25_000_000.0).unwrap();
        assert_eq!(clamped, DEFAULT_MAX_RADIUS);
    }

    #[test]
    fn test_clamp_radius_to_antipode_without_cap() {
        let options = GreatCircleOptions::default().with_max_radius(None);
        let clamped = options.clamp_radius(50_000_000.0).unwrap();
        assert_eq!(clamped, ANTIPODAL_DISTANCE_M);
    }

    #[test]
    fn test_clamp_radius_passes_small_values() {
        let options = GreatCircleOptions::default();
        assert_eq!(options.clamp_radius(1_234.5).unwrap(), 1_234.5);
    }

    #[test]
    fn test_clamp_radius_rejects_invalid() {
        let options = GreatCircleOptions::default();
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                options.clamp_radius(bad),
                Err(GreatCircleError::InvalidRadius(_))
            ));
        }
    }

    #[test]
    fn test_effective_radius_requires_radius() {
        let options = GreatCircleOptions::default();
        assert!(matches!(
            options.effective_radius(),
            Err(GreatCircleError::RadiusNotSet)
        ));
    }

    #[test]
    fn test_validate_rejects_bad_step() {
        let options = GreatCircleOptions::new(1_000.0).with_deg_step(0.0);
        assert!(matches!(
            options.validate(),
            Err(GreatCircleError::InvalidStep(_))
        ));
    }

    #[test]
    fn test_clip_lat_parsing() {
        assert_eq!("true".parse::<ClipLat>().unwrap(), ClipLat::AlwaysCircle);
        assert_eq!("False".parse::<ClipLat>().unwrap(), ClipLat::AlwaysPolygon);
        assert_eq!("75.5".parse::<ClipLat>().unwrap(), ClipLat::Latitude(75.5));
        assert!("north".parse::<ClipLat>().is_err());
    }

    #[test]
    fn test_rgba_from_hex() {
        let color = Rgba::from_hex("#ff8000", 0.5).unwrap();
        assert_eq!(color, Rgba::new(255, 128, 0, 128));
        assert!(Rgba::from_hex("#ff80", 1.0).is_none());
        assert!(Rgba::from_hex("zzzzzz", 1.0).is_none());
    }

    #[test]
    fn test_from_ini_str_overrides_defaults() {
        let options = GreatCircleOptions::from_ini_str(
            "[circle]\n\
             radius = 1500000\n\
             clip_lat = false\n\
             deg_step = 1.0\n\
             max_copies = 2\n\
             wrap_elements = false\n\
             max_radius = -1\n\
             [style]\n\
             color = ff0000\n\
             weight = 1.5\n\
             fill = false\n",
        )
        .unwrap();

        assert_eq!(options.radius, Some(1_500_000.0));
        assert_eq!(options.clip_lat, ClipLat::AlwaysPolygon);
        assert_eq!(options.clip_rad, DEFAULT_CLIP_RAD);
        assert_eq!(options.deg_step, 1.0);
        assert_eq!(options.max_copies, Some(2));
        assert!(!options.wrap_elements);
        assert!(options.wrap_marker);
        assert_eq!(options.max_radius, None);
        assert_eq!(options.style.color, Rgba::new(255, 0, 0, 255));
        assert_eq!(options.style.weight, 1.5);
        assert_eq!(options.style.fill, None);
    }

    #[test]
    fn test_from_ini_str_fill_colors() {
        let options = GreatCircleOptions::from_ini_str(
            "[style]\ncolor = 0000ff\nfill = true\nfill_color = 00ff00\nfill_opacity = 0.4\n",
        )
        .unwrap();
        assert_eq!(options.style.fill, Some(Rgba::new(0, 255, 0, 102)));

        // Without fill_color the fill reuses the stroke color
        let options =
            GreatCircleOptions::from_ini_str("[style]\ncolor = 0000ff\nfill = true\n").unwrap();
        assert_eq!(options.style.color, Rgba::new(0, 0, 255, 255));
        assert_eq!(options.style.fill, Some(Rgba::new(0, 0, 255, 51)));
    }

    #[test]
    fn test_from_ini_str_unbounded_copies() {
        let options = GreatCircleOptions::from_ini_str("[circle]\nmax_copies = -1\n").unwrap();
        assert_eq!(options.max_copies, None);
    }

    #[test]
    fn test_from_ini_str_rejects_bad_value() {
        let err = GreatCircleOptions::from_ini_str("[circle]\ndeg_step = fast\n").unwrap_err();
        assert!(matches!(
            err,
            GreatCircleError::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_from_ini_str_rejects_negative_copies() {
        let err = GreatCircleOptions::from_ini_str("[circle]\nmax_copies = -4\n").unwrap_err();
        assert!(err.to_string().contains("max_copies"));
    }

    #[test]
    fn test_from_ini_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[circle]\nradius = 42000\nclip_lat = true").unwrap();

        let options = GreatCircleOptions::from_ini_file(file.path()).unwrap();
        assert_eq!(options.radius, Some(42_000.0));
        assert_eq!(options.clip_lat, ClipLat::AlwaysCircle);
    }

    #[test]
    fn test_from_ini_file_missing() {
        let err = GreatCircleOptions::from_ini_file("/nonexistent/greatcircle.ini").unwrap_err();
        assert!(matches!(err, GreatCircleError::Config(ConfigError::Io(_))));
    }
}
