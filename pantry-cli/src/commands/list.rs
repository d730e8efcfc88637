//! `pantry list`: scan a registry directory.

use std::path::Path;

use pantry::registry::{PackageRegistry, ScanReport};

use crate::error::CliError;

/// Scan `dir` and print one line per package, then any failures.
pub fn run(dir: &Path) -> Result<(), CliError> {
    let loader = super::configured_loader()?;
    let report = PackageRegistry::scan_with(dir, &loader)?;
    print!("{}", render(&report));

    for failure in &report.failures {
        eprintln!("skipped {}: {}", failure.path.display(), failure.error);
    }
    Ok(())
}

fn render(report: &ScanReport) -> String {
    let registry = &report.registry;
    if registry.is_empty() {
        return format!("No packages found in {}\n", registry.root().display());
    }

    let width = registry.iter().map(|p| p.name().len()).max().unwrap_or(0);
    let mut out = String::new();
    for package in registry.iter() {
        let version = if package.version().is_empty() {
            "-"
        } else {
            package.version()
        };
        out.push_str(&format!(
            "{:<width$}  {:<10}  {}\n",
            package.name(),
            version,
            package.package_dir().display(),
            width = width
        ));
    }
    out
}
