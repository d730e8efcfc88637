//! CLI error type.

use std::fmt;

use pantry::config::ConfigError;
use pantry::MetadataError;

/// Errors surfaced by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Loading or scanning package metadata failed.
    Metadata(MetadataError),
    /// Configuration file or key problem.
    Config(String),
    /// Rendering JSON output failed.
    Serialize(String),
    /// Filesystem access outside the loader failed.
    Io(std::io::Error),
    /// Validation found problems; the report has already been printed.
    ValidationFailed { errors: usize, warnings: usize },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Metadata(e) => write!(f, "{}", e),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Serialize(msg) => write!(f, "Failed to render JSON: {}", msg),
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::ValidationFailed { errors, warnings } => write!(
                f,
                "Validation failed with {} error(s) and {} warning(s)",
                errors, warnings
            ),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Metadata(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MetadataError> for CliError {
    fn from(e: MetadataError) -> Self {
        CliError::Metadata(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialize(e.to_string())
    }
}
