//! INI configuration file.
//!
//! ```text
//! [loader]
//! manifest_filename = metadata.rb
//! strict = false
//! unknown_directives = error
//! ```
//!
//! A missing file means defaults. The location is `$PANTRY_CONFIG` when set,
//! otherwise `<config dir>/pantry/config.ini`.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use super::UnknownDirectivePolicy;
use crate::package::MANIFEST_FILENAME;

const LOADER_SECTION: &str = "loader";

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "PANTRY_CONFIG";

/// Errors reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read { path: PathBuf, source: ini::Error },

    #[error("failed to write config {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// Location of the user's configuration file.
pub fn config_file_path() -> PathBuf {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pantry")
        .join("config.ini")
}

/// `[loader]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderSection {
    pub manifest_filename: String,
    pub strict: bool,
    pub unknown_directives: UnknownDirectivePolicy,
}

impl Default for LoaderSection {
    fn default() -> Self {
        Self {
            manifest_filename: MANIFEST_FILENAME.to_string(),
            strict: false,
            unknown_directives: UnknownDirectivePolicy::Error,
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub loader: LoaderSection,
}

impl ConfigFile {
    /// Load from [`config_file_path`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut config = Self::default();
        if let Some(section) = ini.section(Some(LOADER_SECTION)) {
            for key in ConfigKey::all() {
                if let Some(value) = section.get(key.key_name()) {
                    key.set(&mut config, value)?;
                }
            }
        }

        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Save to [`config_file_path`].
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini.write_to_file(path).map_err(write_err)
    }
}

/// A settable configuration key, addressed as `section.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    LoaderManifestFilename,
    LoaderStrict,
    LoaderUnknownDirectives,
}

impl ConfigKey {
    /// Every key in display order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::LoaderManifestFilename,
            ConfigKey::LoaderStrict,
            ConfigKey::LoaderUnknownDirectives,
        ]
    }

    pub fn section(&self) -> &'static str {
        LOADER_SECTION
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::LoaderManifestFilename => "manifest_filename",
            ConfigKey::LoaderStrict => "strict",
            ConfigKey::LoaderUnknownDirectives => "unknown_directives",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value rendered as text.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::LoaderManifestFilename => config.loader.manifest_filename.clone(),
            ConfigKey::LoaderStrict => config.loader.strict.to_string(),
            ConfigKey::LoaderUnknownDirectives => config.loader.unknown_directives.to_string(),
        }
    }

    /// Parse and store a value.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason,
        };

        match self {
            ConfigKey::LoaderManifestFilename => {
                let filename = value.trim();
                if filename.is_empty() || filename.contains(['/', '\\']) {
                    return Err(invalid("expected a bare filename".to_string()));
                }
                config.loader.manifest_filename = filename.to_string();
            }
            ConfigKey::LoaderStrict => {
                config.loader.strict = parse_bool(value)
                    .ok_or_else(|| invalid("expected true or false".to_string()))?;
            }
            ConfigKey::LoaderUnknownDirectives => {
                config.loader.unknown_directives = value.parse().map_err(invalid)?;
            }
        }
        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
