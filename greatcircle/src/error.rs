//! Error types for circle geometry and overlay configuration.

use thiserror::Error;

use crate::coord::LatLng;

/// Errors raised while computing or rendering a great circle.
#[derive(Debug, Error)]
pub enum GreatCircleError {
    /// Radius is not a finite, positive number of meters.
    #[error("Invalid radius: {0} m (must be finite and greater than zero)")]
    InvalidRadius(f64),

    /// Center is not a finite position with latitude in [-90, 90].
    #[error("Invalid center: {0} (latitude must be within [-90, 90] and coordinates finite)")]
    InvalidCenter(LatLng),

    /// A redraw was requested before any radius was configured.
    #[error("Radius has not been set")]
    RadiusNotSet,

    /// Angular step is not a finite, positive number of degrees.
    #[error("Invalid angular step: {0}° (must be finite and greater than zero)")]
    InvalidStep(f64),

    /// Options could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while loading or validating options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The options file could not be read.
    #[error("Failed to read options file: {0}")]
    Io(#[from] std::io::Error),

    /// The options file is not valid INI.
    #[error("Failed to parse options: {0}")]
    Parse(String),

    /// An option holds a value that cannot be used.
    #[error("Invalid value for '{key}': {value}")]
    InvalidValue { key: String, value: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, value: impl ToString) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

impl From<ini::Error> for ConfigError {
    fn from(e: ini::Error) -> Self {
        match e {
            ini::Error::Io(io) => ConfigError::Io(io),
            ini::Error::Parse(parse) => ConfigError::Parse(parse.to_string()),
        }
    }
}

impl From<ini::ParseError> for ConfigError {
    fn from(e: ini::ParseError) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_radius_display() {
        let err = GreatCircleError::InvalidRadius(-5.0);
        assert!(err.to_string().contains("Invalid radius"));
        assert!(err.to_string().contains("-5"));
    }

    #[test]
    fn test_invalid_center_display() {
        let err = GreatCircleError::InvalidCenter(LatLng::new(91.0, 0.0));
        assert!(err.to_string().starts_with("Invalid center"));
        assert!(err.to_string().contains("91"));
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: GreatCircleError = ConfigError::invalid("deg_step", "zero").into();
        assert!(matches!(err, GreatCircleError::Config(_)));
        assert_eq!(err.to_string(), "Invalid value for 'deg_step': zero");
    }

    #[test]
    fn test_parse_error_conversion() {
        let parse = ini::Ini::load_from_str("[unterminated").unwrap_err();
        let err: ConfigError = parse.into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
