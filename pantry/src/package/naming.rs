//! Package naming and manifest location conventions.
//!
//! A package lives in its own directory. The directory name is the package
//! name unless the manifest declares one, and the manifest sits at a fixed
//! filename inside it.

use std::path::{Path, PathBuf};

/// Default manifest filename inside a package directory.
pub const MANIFEST_FILENAME: &str = "metadata.rb";

/// Resolve the manifest path for a package directory or manifest file.
///
/// Directories get `manifest_filename` appended; anything else is taken to
/// be the manifest itself.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use pantry::package::manifest_path;
///
/// // `/cookbooks/vim` is a directory
/// assert_eq!(
///     manifest_path(Path::new("/cookbooks/vim"), "metadata.rb"),
///     Path::new("/cookbooks/vim/metadata.rb")
/// );
/// ```
pub fn manifest_path(path: &Path, manifest_filename: &str) -> PathBuf {
    if path.is_dir() {
        path.join(manifest_filename)
    } else {
        path.to_path_buf()
    }
}

/// Derive a package name from the directory holding its manifest.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use pantry::package::package_name_from_manifest;
///
/// assert_eq!(
///     package_name_from_manifest(Path::new("/cookbooks/vim/metadata.rb")),
///     Some("vim".to_string())
/// );
/// assert_eq!(package_name_from_manifest(Path::new("metadata.rb")), None);
/// ```
pub fn package_name_from_manifest(manifest: &Path) -> Option<String> {
    let dir = manifest.parent()?;
    let name = dir.file_name()?.to_str()?.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Join a manifest-relative `/`-separated path onto the package directory.
pub fn resolve_relative(package_dir: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .fold(package_dir.to_path_buf(), |acc, segment| acc.join(segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_path_for_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            manifest_path(dir.path(), MANIFEST_FILENAME),
            dir.path().join("metadata.rb")
        );
    }

    #[test]
    fn test_manifest_path_for_file_is_unchanged() {
        let path = Path::new("/nowhere/vim/metadata.rb");
        assert_eq!(manifest_path(path, MANIFEST_FILENAME), path);
    }

    #[test]
    fn test_name_from_nested_manifest() {
        assert_eq!(
            package_name_from_manifest(Path::new("cookbooks/apache2/metadata.rb")),
            Some("apache2".to_string())
        );
    }

    #[test]
    fn test_name_missing_for_root_manifest() {
        assert_eq!(package_name_from_manifest(Path::new("/metadata.rb")), None);
    }

    #[test]
    fn test_resolve_relative_segments() {
        assert_eq!(
            resolve_relative(Path::new("/pkg"), "docs/README.md"),
            Path::new("/pkg/docs/README.md")
        );
        assert_eq!(
            resolve_relative(Path::new("/pkg"), "./README.md"),
            Path::new("/pkg/README.md")
        );
    }
}
