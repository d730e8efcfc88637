//! CLI command implementations.

pub mod config;
pub mod json;
pub mod list;
pub mod show;
pub mod validate;

use pantry::config::{ConfigFile, LoaderConfig};
use pantry::Loader;
use tracing::debug;

use crate::error::CliError;

/// Build a loader from the user's configuration file.
fn configured_loader() -> Result<Loader, CliError> {
    let config = ConfigFile::load()?;
    let loader_config = LoaderConfig::from(&config);
    debug!(?loader_config, "Using loader configuration");
    Ok(Loader::new(loader_config))
}
