//! Error types for metadata loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::manifest::ParseError;
use crate::validation::ValidationIssue;

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Errors that can occur while loading package metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// No manifest at the given location.
    #[error("manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    /// A file the manifest reads (the long description) does not exist.
    #[error("resource not found: {}", .path.display())]
    ResourceNotFound { path: PathBuf },

    /// Failed to read a file that exists.
    #[error("failed to read {}: {source}", .path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// The manifest is not syntactically valid.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse { path: PathBuf, source: ParseError },

    /// A directive is unknown or has the wrong shape.
    #[error("{}:{line}: invalid `{directive}` directive: {reason}", .path.display())]
    InvalidDirective {
        path: PathBuf,
        line: usize,
        directive: String,
        reason: String,
    },

    /// Two attributes share a key.
    #[error("{}:{line}: duplicate attribute '{key}'", .path.display())]
    DuplicateAttribute {
        path: PathBuf,
        line: usize,
        key: String,
    },

    /// Two packages in one registry share a name.
    #[error("package '{name}' at {} is already provided by {}", .path.display(), .existing.display())]
    DuplicatePackage {
        name: String,
        path: PathBuf,
        existing: PathBuf,
    },

    /// No `name` directive and no directory name to fall back on.
    #[error("cannot determine package name for {}", .0.display())]
    MissingName(PathBuf),

    /// Strict loading rejected the metadata.
    #[error("{} failed validation with {} issue(s)", .path.display(), .issues.len())]
    Validation {
        path: PathBuf,
        issues: Vec<ValidationIssue>,
    },
}

impl MetadataError {
    /// Whether the error means a required file is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            MetadataError::ManifestNotFound(_) | MetadataError::ResourceNotFound { .. }
        )
    }
}
