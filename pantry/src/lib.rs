//! Pantry - package metadata loading
//!
//! This library reads the declarative `metadata.rb` manifest that describes a
//! configuration-management package, resolves the files it references, and
//! produces an immutable [`PackageMetadata`] value. It also validates that
//! value, scans directories of packages, and renders the compiled
//! `metadata.json` form.
//!
//! ```no_run
//! let metadata = pantry::load("packages/vim").unwrap();
//! println!("{} by {}", metadata, metadata.maintainer());
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod manifest;
pub mod package;
pub mod registry;
pub mod validation;

pub use error::{MetadataError, MetadataResult};
pub use loader::{load, Loader};
pub use package::{AttributeSpec, LoadedPackage, PackageMetadata};
