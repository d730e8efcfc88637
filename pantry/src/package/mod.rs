//! Package metadata types.
//!
//! This module provides the data structures describing a configuration
//! package: its identity, long description and the attributes it exposes.
//!
//! # Overview
//!
//! - **PackageMetadata**: identity, descriptions, version and attributes
//! - **AttributeSpec**: one defaulted tunable, keyed by a slash path
//! - **Dependency / Platform / Recipe**: recorded declarations, never resolved
//! - **LoadedPackage**: metadata plus the manifest path it was loaded from
//!
//! # Type Hierarchy
//!
//! ```text
//! PackageMetadata (base)              LoadedPackage (composition)
//! ├── name, maintainer, license ...   ├── metadata: PackageMetadata  ←── contains
//! ├── long_description                └── manifest_path: PathBuf
//! └── attributes: Vec<AttributeSpec>
//! ```
//!
//! Values are built once by the loader and never mutated afterwards.

mod attribute;
mod declarations;
mod loaded;
mod metadata;
mod naming;

pub use attribute::{AttributeSpec, AttributeType, Requirement};
pub use declarations::{Dependency, Platform, Recipe, ANY_VERSION};
pub use loaded::LoadedPackage;
pub use metadata::{PackageMetadata, PackageMetadataBuilder};

pub use naming::{manifest_path, package_name_from_manifest, resolve_relative, MANIFEST_FILENAME};

// Re-export semver::Version for convenience
pub use semver::Version;
