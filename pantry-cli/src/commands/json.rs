//! `pantry json`: print the compiled metadata.json form.

use std::path::Path;

use pantry::export::to_json;

use crate::error::CliError;

pub fn run(path: &Path) -> Result<(), CliError> {
    let metadata = super::configured_loader()?.load(path)?;
    println!("{}", to_json(&metadata)?);
    Ok(())
}
