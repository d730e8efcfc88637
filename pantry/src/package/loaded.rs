//! Loaded package type with filesystem context.
//!
//! The [`LoadedPackage`] struct extends [`PackageMetadata`] with the location
//! it was loaded from using composition.

use std::ops::Deref;
use std::path::{Path, PathBuf};

use super::metadata::PackageMetadata;

/// Package metadata together with the manifest file it came from.
///
/// The [`Deref`] implementation allows transparent access to
/// [`PackageMetadata`] accessors.
///
/// # Example
///
/// ```
/// use pantry::package::{LoadedPackage, PackageMetadata};
///
/// let metadata = PackageMetadata::builder("vim").version("1.0.0").build();
/// let loaded = LoadedPackage::new(metadata, "/cookbooks/vim/metadata.rb");
///
/// assert_eq!(loaded.name(), "vim");
/// assert_eq!(loaded.package_dir().to_str().unwrap(), "/cookbooks/vim");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPackage {
    /// The assembled metadata (composition).
    pub metadata: PackageMetadata,

    /// Path of the manifest file.
    pub manifest_path: PathBuf,
}

impl LoadedPackage {
    pub fn new(metadata: PackageMetadata, manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            metadata,
            manifest_path: manifest_path.into(),
        }
    }

    /// Path of the manifest file.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Directory holding the manifest.
    pub fn package_dir(&self) -> &Path {
        self.manifest_path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Deref to PackageMetadata for convenient access to its accessors.
impl Deref for LoadedPackage {
    type Target = PackageMetadata;

    fn deref(&self) -> &Self::Target {
        &self.metadata
    }
}

/// Drop the location and keep the metadata.
impl From<LoadedPackage> for PackageMetadata {
    fn from(loaded: LoadedPackage) -> Self {
        loaded.metadata
    }
}

impl AsRef<PackageMetadata> for LoadedPackage {
    fn as_ref(&self) -> &PackageMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_metadata() -> PackageMetadata {
        PackageMetadata::builder("vim").version("1.0.0").build()
    }

    #[test]
    fn test_loaded_package_new() {
        let loaded = LoadedPackage::new(test_metadata(), "/pkgs/vim/metadata.rb");

        assert_eq!(loaded.metadata.name(), "vim");
        assert_eq!(loaded.manifest_path(), Path::new("/pkgs/vim/metadata.rb"));
        assert_eq!(loaded.package_dir(), Path::new("/pkgs/vim"));
    }

    #[test]
    fn test_package_dir_of_bare_filename() {
        let loaded = LoadedPackage::new(test_metadata(), "metadata.rb");
        assert_eq!(loaded.package_dir(), Path::new(""));
    }

    #[test]
    fn test_loaded_package_deref() {
        let loaded = LoadedPackage::new(test_metadata(), "/pkgs/vim/metadata.rb");

        assert_eq!(loaded.version(), "1.0.0");
        assert_eq!(loaded.to_string(), "vim v1.0.0");
    }

    #[test]
    fn test_loaded_package_into_metadata() {
        let loaded = LoadedPackage::new(test_metadata(), "/pkgs/vim/metadata.rb");
        let metadata: PackageMetadata = loaded.into();

        assert_eq!(metadata, test_metadata());
    }

    #[test]
    fn test_loaded_package_as_ref() {
        let loaded = LoadedPackage::new(test_metadata(), "/pkgs/vim/metadata.rb");
        let metadata_ref: &PackageMetadata = loaded.as_ref();

        assert_eq!(metadata_ref.name(), "vim");
    }
}
