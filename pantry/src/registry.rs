//! Package registry discovery.
//!
//! A registry is a directory whose immediate subdirectories are packages.
//! Scanning loads every package that carries a manifest and reports the ones
//! that fail without aborting the rest.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::MetadataError;
use crate::loader::Loader;
use crate::package::LoadedPackage;

/// A package directory that could not be registered.
#[derive(Debug)]
pub struct ScanFailure {
    /// Package directory.
    pub path: PathBuf,

    pub error: MetadataError,
}

/// Packages found by a scan, keyed and ordered by name.
#[derive(Debug, Default)]
pub struct PackageRegistry {
    root: PathBuf,
    packages: BTreeMap<String, LoadedPackage>,
}

/// Outcome of [`PackageRegistry::scan`].
#[derive(Debug)]
pub struct ScanReport {
    pub registry: PackageRegistry,

    /// Directories that held a manifest but failed to load, sorted by path.
    pub failures: Vec<ScanFailure>,
}

impl ScanReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl PackageRegistry {
    /// Scan `root` with the default loader.
    pub fn scan(root: impl Into<PathBuf>) -> Result<ScanReport, std::io::Error> {
        Self::scan_with(root, &Loader::default())
    }

    /// Scan `root`, loading each package with `loader`.
    ///
    /// A missing root yields an empty registry. Hidden directories and
    /// directories without a manifest are skipped. A second package claiming
    /// an already registered name is reported as a failure.
    pub fn scan_with(root: impl Into<PathBuf>, loader: &Loader) -> Result<ScanReport, std::io::Error> {
        let root = root.into();
        let mut registry = PackageRegistry {
            root: root.clone(),
            packages: BTreeMap::new(),
        };
        let mut failures = Vec::new();

        if !root.is_dir() {
            debug!(root = %root.display(), "Registry root does not exist");
            return Ok(ScanReport { registry, failures });
        }

        let mut candidates = Vec::new();
        for entry in std::fs::read_dir(&root)? {
            let entry = entry?;
            let path = entry.path();

            // Skip non-directories
            if !path.is_dir() {
                continue;
            }

            // Skip hidden folders
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }

            if !path.join(&loader.config().manifest_filename).is_file() {
                continue;
            }

            candidates.push(path);
        }

        // Directory order decides which duplicate wins.
        candidates.sort();

        for path in candidates {
            match loader.load_package(&path) {
                Ok(package) => {
                    let name = package.name().to_string();
                    if let Some(existing) = registry.packages.get(&name) {
                        let error = MetadataError::DuplicatePackage {
                            name,
                            path: package.package_dir().to_path_buf(),
                            existing: existing.package_dir().to_path_buf(),
                        };
                        warn!(path = %path.display(), %error, "Duplicate package name");
                        failures.push(ScanFailure { path, error });
                        continue;
                    }
                    registry.packages.insert(name, package);
                }
                Err(error) => {
                    warn!(path = %path.display(), %error, "Failed to load package");
                    failures.push(ScanFailure { path, error });
                }
            }
        }

        debug!(
            root = %root.display(),
            packages = registry.len(),
            failures = failures.len(),
            "Registry scan complete"
        );
        Ok(ScanReport { registry, failures })
    }

    /// Registry root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, name: &str) -> Option<&LoadedPackage> {
        self.packages.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Packages in name order.
    pub fn iter(&self) -> impl Iterator<Item = &LoadedPackage> {
        self.packages.values()
    }
}
