//! Integration tests for loading package metadata from disk.
//!
//! These tests load the fixture packages under `tests/fixtures/` and verify:
//! - The long description is the companion README, read at load time
//! - A missing README fails the load with a not-found error
//! - Declared attributes keep their key and default
//! - Loading is idempotent and export reflects the loaded value
//!
//! Run with: `cargo test --test load_integration`

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use pantry::config::LoaderConfig;
use pantry::export::to_json_value;
use pantry::registry::PackageRegistry;
use pantry::{load, Loader, MetadataError};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Copy a fixture package into a fresh temp registry.
fn copy_fixture(name: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join(name);
    fs::create_dir_all(&target).unwrap();

    for entry in fs::read_dir(fixture(name)).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), target.join(entry.file_name())).unwrap();
    }
    (temp, target)
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_long_description_is_readme_contents() {
    let readme = fs::read_to_string(fixture("vim").join("README.md")).unwrap();
    let metadata = load(fixture("vim")).unwrap();

    assert_eq!(metadata.long_description(), readme);
}

#[test]
fn test_identity_fields() {
    let metadata = load(fixture("vim").join("metadata.rb")).unwrap();

    assert_eq!(metadata.name(), "vim");
    assert_eq!(metadata.maintainer(), "Opscode, Inc.");
    assert_eq!(metadata.maintainer_email(), "cookbooks@opscode.com");
    assert_eq!(metadata.license(), "Apache 2.0");
    assert_eq!(metadata.description(), "Installs vim and optional extra packages.");
    assert_eq!(metadata.version(), "1.0.0");
    assert_eq!(metadata.semver().unwrap().major, 1);
}

#[test]
fn test_single_attribute() {
    let metadata = load(fixture("vim")).unwrap();

    assert_eq!(metadata.attributes().len(), 1);
    let attribute = &metadata.attributes()[0];
    assert_eq!(attribute.key(), "vim/sucks");
    assert_eq!(attribute.default(), Some("true"));
    assert_eq!(attribute.display_name(), Some("VIM sucks?"));
    assert_eq!(attribute.description(), Some("Describes whether VIM sucks"));
    assert_eq!(attribute.path_segments(), vec!["vim", "sucks"]);
}

#[test]
fn test_missing_readme_is_not_found() {
    let (_temp, package) = copy_fixture("vim");
    fs::remove_file(package.join("README.md")).unwrap();

    let err = load(&package).unwrap_err();

    match &err {
        MetadataError::ResourceNotFound { path } => {
            assert_eq!(path, &package.join("README.md"));
        }
        other => panic!("expected ResourceNotFound, got {:?}", other),
    }
    assert!(err.is_not_found());
}

#[test]
fn test_readme_is_read_at_load_time() {
    let (_temp, package) = copy_fixture("vim");

    let before = load(&package).unwrap();
    fs::write(package.join("README.md"), "rewritten\n").unwrap();

    assert_ne!(before.long_description(), "rewritten\n");
    assert_eq!(load(&package).unwrap().long_description(), "rewritten\n");
}

#[test]
fn test_reload_is_identical() {
    let first = load(fixture("vim")).unwrap();
    let second = load(fixture("vim")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_strict_load_accepts_reference_package() {
    let loader = Loader::new(LoaderConfig::new().with_strict(true));
    assert!(loader.load(fixture("vim")).is_ok());
}

#[test]
fn test_duplicate_attribute_fails() {
    let err = load(fixture("broken")).unwrap_err();

    match err {
        MetadataError::DuplicateAttribute { key, line, .. } => {
            assert_eq!(key, "broken/key");
            assert_eq!(line, 4);
        }
        other => panic!("expected DuplicateAttribute, got {:?}", other),
    }
}

// ============================================================================
// Registry and export
// ============================================================================

#[test]
fn test_fixture_registry() {
    let report = PackageRegistry::scan(fixture("")).unwrap();

    assert!(report.registry.contains("vim"));
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].path.ends_with("broken"));
}

#[test]
fn test_export_matches_loaded_metadata() {
    let metadata = load(fixture("vim")).unwrap();
    let json = to_json_value(&metadata).unwrap();

    assert_eq!(json["name"], "vim");
    assert_eq!(json["long_description"], metadata.long_description());
    assert_eq!(json["attributes"]["vim/sucks"]["default"], "true");
}
