//! CLI error types.

use std::fmt;

use greatcircle::surface::RasterError;
use greatcircle::GreatCircleError;

/// Errors reported by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// The geometry library rejected the input.
    Geometry(GreatCircleError),

    /// Rendering or saving the image failed.
    Render(RasterError),

    /// JSON output could not be produced.
    Output(serde_json::Error),

    /// Invalid command-line argument.
    Argument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Geometry(e) => write!(f, "{}", e),
            CliError::Render(e) => write!(f, "Render failed: {}", e),
            CliError::Output(e) => write!(f, "Failed to write output: {}", e),
            CliError::Argument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Geometry(e) => Some(e),
            CliError::Render(e) => Some(e),
            CliError::Output(e) => Some(e),
            CliError::Argument(_) => None,
        }
    }
}

impl From<GreatCircleError> for CliError {
    fn from(e: GreatCircleError) -> Self {
        CliError::Geometry(e)
    }
}

impl From<RasterError> for CliError {
    fn from(e: RasterError) -> Self {
        CliError::Render(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_display() {
        let err = CliError::Argument("zoom out of range".to_string());
        assert_eq!(err.to_string(), "Invalid argument: zoom out of range");

        let err: CliError = GreatCircleError::RadiusNotSet.into();
        assert!(matches!(err, CliError::Geometry(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
