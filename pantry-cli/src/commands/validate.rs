//! `pantry validate`: report validation issues for a package.

use std::path::Path;

use pantry::validation::{has_errors, validate, Severity, ValidationIssue};
use pantry::Loader;

use crate::error::CliError;

/// Load a package and print every issue.
///
/// Fails when an issue is an error, or on any issue when `strict` is set
/// (either by flag or by `loader.strict` in the config file).
pub fn run(path: &Path, strict: bool) -> Result<(), CliError> {
    let configured = super::configured_loader()?;
    let strict = strict || configured.config().strict;

    // Load leniently so the issues can be listed instead of aborting.
    let loader = Loader::new(configured.config().clone().with_strict(false));
    let metadata = loader.load(path)?;

    let issues = validate(&metadata);
    for issue in &issues {
        println!("{}", issue);
    }

    check(&issues, strict)?;
    println!("{}: ok ({} warning(s))", metadata, issues.len());
    Ok(())
}

fn check(issues: &[ValidationIssue], strict: bool) -> Result<(), CliError> {
    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    let warnings = issues.len() - errors;

    if has_errors(issues) || (strict && warnings > 0) {
        return Err(CliError::ValidationFailed { errors, warnings });
    }
    Ok(())
}
