//! Configuration for the metadata loader.
//!
//! [`LoaderConfig`] is what the [`Loader`](crate::loader::Loader) runs with.
//! It can be built in code or read from the user's INI file through
//! [`ConfigFile`].

mod file;

pub use file::{config_file_path, ConfigError, ConfigFile, ConfigKey, LoaderSection};

use std::fmt;
use std::str::FromStr;

use crate::package::MANIFEST_FILENAME;

/// What to do with a directive the loader does not know.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownDirectivePolicy {
    /// Fail the load.
    #[default]
    Error,
    /// Log a warning and skip the directive.
    Ignore,
}

impl UnknownDirectivePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnknownDirectivePolicy::Error => "error",
            UnknownDirectivePolicy::Ignore => "ignore",
        }
    }
}

impl FromStr for UnknownDirectivePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(UnknownDirectivePolicy::Error),
            "ignore" => Ok(UnknownDirectivePolicy::Ignore),
            other => Err(format!("expected 'error' or 'ignore', got '{}'", other)),
        }
    }
}

impl fmt::Display for UnknownDirectivePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the metadata loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Manifest filename looked up inside a package directory.
    pub manifest_filename: String,

    /// Fail the load when validation reports any issue.
    pub strict: bool,

    /// Handling of directives outside the known set.
    pub unknown_directives: UnknownDirectivePolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            manifest_filename: MANIFEST_FILENAME.to_string(),
            strict: false,
            unknown_directives: UnknownDirectivePolicy::Error,
        }
    }
}

impl LoaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the manifest filename.
    pub fn with_manifest_filename(mut self, filename: impl Into<String>) -> Self {
        self.manifest_filename = filename.into();
        self
    }

    /// Enable or disable strict validation.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the unknown-directive policy.
    pub fn with_unknown_directives(mut self, policy: UnknownDirectivePolicy) -> Self {
        self.unknown_directives = policy;
        self
    }
}

impl From<&ConfigFile> for LoaderConfig {
    fn from(file: &ConfigFile) -> Self {
        Self {
            manifest_filename: file.loader.manifest_filename.clone(),
            strict: file.loader.strict,
            unknown_directives: file.loader.unknown_directives,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoaderConfig::default();
        assert_eq!(config.manifest_filename, "metadata.rb");
        assert!(!config.strict);
        assert_eq!(config.unknown_directives, UnknownDirectivePolicy::Error);
    }

    #[test]
    fn test_builder_pattern() {
        let config = LoaderConfig::new()
            .with_manifest_filename("package.rb")
            .with_strict(true)
            .with_unknown_directives(UnknownDirectivePolicy::Ignore);

        assert_eq!(config.manifest_filename, "package.rb");
        assert!(config.strict);
        assert_eq!(config.unknown_directives, UnknownDirectivePolicy::Ignore);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            " Ignore ".parse::<UnknownDirectivePolicy>(),
            Ok(UnknownDirectivePolicy::Ignore)
        );
        assert_eq!(
            "error".parse::<UnknownDirectivePolicy>(),
            Ok(UnknownDirectivePolicy::Error)
        );
        assert!("skip".parse::<UnknownDirectivePolicy>().is_err());
    }

    #[test]
    fn test_from_config_file() {
        let mut file = ConfigFile::default();
        file.loader.strict = true;

        let config = LoaderConfig::from(&file);
        assert!(config.strict);
        assert_eq!(config.manifest_filename, "metadata.rb");
    }
}
