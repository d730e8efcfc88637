//! Metadata loading.
//!
//! Turns a manifest on disk into a [`PackageMetadata`]:
//!
//! 1. Locate the manifest (a file, or `metadata.rb` inside a directory)
//! 2. Parse it into directives
//! 3. Interpret each directive, reading the companion long-description
//!    document as soon as it is referenced
//! 4. Enforce attribute-key uniqueness and, in strict mode, validation
//!
//! All I/O happens during the call. The returned value never touches the
//! filesystem again.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::{LoaderConfig, UnknownDirectivePolicy};
use crate::error::{MetadataError, MetadataResult};
use crate::manifest::{parse_manifest, Directive, Value};
use crate::package::{
    manifest_path, package_name_from_manifest, resolve_relative, AttributeSpec, Dependency,
    LoadedPackage, PackageMetadata, PackageMetadataBuilder, Platform, Recipe, Requirement,
};
use crate::validation::validate;

/// Load package metadata with the default configuration.
///
/// `path` is either a manifest file or a package directory.
///
/// # Errors
///
/// Fails with [`MetadataError::ResourceNotFound`] when the manifest's
/// long-description document is missing, and with the other
/// [`MetadataError`] variants for unreadable, malformed or inconsistent
/// manifests.
pub fn load(path: impl AsRef<Path>) -> MetadataResult<PackageMetadata> {
    Loader::default().load(path)
}

/// Metadata loader.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load metadata from a manifest file or package directory.
    pub fn load(&self, path: impl AsRef<Path>) -> MetadataResult<PackageMetadata> {
        self.load_package(path).map(PackageMetadata::from)
    }

    /// Load metadata and keep the manifest location alongside it.
    pub fn load_package(&self, path: impl AsRef<Path>) -> MetadataResult<LoadedPackage> {
        let manifest = manifest_path(path.as_ref(), &self.config.manifest_filename);
        debug!(path = %manifest.display(), "Loading package manifest");

        let source = read_file(&manifest).map_err(|e| match e {
            MetadataError::ResourceNotFound { path } => MetadataError::ManifestNotFound(path),
            other => other,
        })?;

        let parsed = parse_manifest(&source).map_err(|e| MetadataError::Parse {
            path: manifest.clone(),
            source: e,
        })?;

        let package_dir: PathBuf = manifest
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let mut assembler = Assembler {
            manifest: &manifest,
            package_dir: &package_dir,
            policy: self.config.unknown_directives,
            name: None,
            builder: PackageMetadata::builder(""),
        };
        for directive in &parsed.directives {
            assembler.apply(directive)?;
        }

        let name = match assembler.name.take() {
            Some(name) => name,
            None => name_from_location(&manifest)?,
        };
        let metadata = assembler.builder.name(name).build();

        let issues = validate(&metadata);
        for issue in &issues {
            debug!(package = metadata.name(), %issue, "Validation issue");
        }
        if self.config.strict && !issues.is_empty() {
            return Err(MetadataError::Validation {
                path: manifest,
                issues,
            });
        }

        debug!(
            package = metadata.name(),
            version = metadata.version(),
            attributes = metadata.attributes().len(),
            "Loaded package metadata"
        );
        Ok(LoadedPackage::new(metadata, manifest))
    }
}

/// Package name implied by the directory holding the manifest.
///
/// Relative paths such as `metadata.rb` or `./metadata.rb` have no usable
/// parent name, so the path is resolved against the filesystem first.
fn name_from_location(manifest: &Path) -> MetadataResult<String> {
    let absolute = fs::canonicalize(manifest).map_err(|e| MetadataError::ReadFailed {
        path: manifest.to_path_buf(),
        source: e,
    })?;
    package_name_from_manifest(&absolute)
        .ok_or_else(|| MetadataError::MissingName(manifest.to_path_buf()))
}

/// Read a whole file, mapping a missing file to `ResourceNotFound`.
fn read_file(path: &Path) -> MetadataResult<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            MetadataError::ResourceNotFound {
                path: path.to_path_buf(),
            }
        } else {
            MetadataError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Folds directives into a metadata builder.
struct Assembler<'a> {
    manifest: &'a Path,
    package_dir: &'a Path,
    policy: UnknownDirectivePolicy,
    name: Option<String>,
    builder: PackageMetadataBuilder,
}

impl Assembler<'_> {
    fn invalid(&self, directive: &Directive, reason: impl Into<String>) -> MetadataError {
        MetadataError::InvalidDirective {
            path: self.manifest.to_path_buf(),
            line: directive.line,
            directive: directive.name.clone(),
            reason: reason.into(),
        }
    }

    /// Scalar directives may be repeated; the last one wins.
    fn apply(&mut self, directive: &Directive) -> MetadataResult<()> {
        let builder = std::mem::replace(&mut self.builder, PackageMetadata::builder(""));
        self.builder = match directive.name.as_str() {
            "name" => {
                let name = self.single_text(directive)?;
                if name.trim().is_empty() {
                    return Err(self.invalid(directive, "package name is empty"));
                }
                self.name = Some(name);
                builder
            }
            "maintainer" => builder.maintainer(self.single_text(directive)?),
            "maintainer_email" => builder.maintainer_email(self.single_text(directive)?),
            "license" => builder.license(self.single_text(directive)?),
            "description" => builder.description(self.single_text(directive)?),
            "version" => builder.version(self.single_text(directive)?),
            "long_description" => builder.long_description(self.long_description(directive)?),
            "attribute" => {
                let attribute = self.attribute(directive)?;
                if builder.has_attribute(attribute.key()) {
                    return Err(MetadataError::DuplicateAttribute {
                        path: self.manifest.to_path_buf(),
                        line: directive.line,
                        key: attribute.key().to_string(),
                    });
                }
                builder.attribute(attribute)
            }
            "depends" => {
                let (name, constraint) = self.name_and_constraint(directive)?;
                builder.dependency(Dependency::new(name, constraint))
            }
            "supports" => {
                let (name, constraint) = self.name_and_constraint(directive)?;
                builder.platform(Platform::new(name, constraint))
            }
            "recipe" => {
                self.no_options(directive)?;
                match directive.args.as_slice() {
                    [name, description] => builder.recipe(Recipe {
                        name: self.text(directive, name)?,
                        description: self.text(directive, description)?,
                    }),
                    _ => return Err(self.invalid(directive, "expected a name and a description")),
                }
            }
            other => match self.policy {
                UnknownDirectivePolicy::Error => {
                    return Err(self.invalid(directive, "unknown directive"));
                }
                UnknownDirectivePolicy::Ignore => {
                    warn!(
                        path = %self.manifest.display(),
                        line = directive.line,
                        directive = other,
                        "Skipping unknown directive"
                    );
                    builder
                }
            },
        };
        Ok(())
    }

    fn no_options(&self, directive: &Directive) -> MetadataResult<()> {
        match directive.options.first() {
            Some((key, _)) => Err(self.invalid(directive, format!("unexpected option '{}'", key))),
            None => Ok(()),
        }
    }

    /// Text form of a scalar literal.
    fn text(&self, directive: &Directive, value: &Value) -> MetadataResult<String> {
        match value {
            Value::Str(s) | Value::Symbol(s) | Value::Number(s) => Ok(s.clone()),
            other => Err(self.invalid(
                directive,
                format!("expected a string, got {}", other.kind()),
            )),
        }
    }

    fn single_text(&self, directive: &Directive) -> MetadataResult<String> {
        self.no_options(directive)?;
        match directive.args.as_slice() {
            [value] => self.text(directive, value),
            args => Err(self.invalid(
                directive,
                format!("expected exactly one argument, got {}", args.len()),
            )),
        }
    }

    fn name_and_constraint(&self, directive: &Directive) -> MetadataResult<(String, Option<String>)> {
        self.no_options(directive)?;
        match directive.args.as_slice() {
            [name] => Ok((self.text(directive, name)?, None)),
            [name, constraint] => Ok((
                self.text(directive, name)?,
                Some(self.text(directive, constraint)?),
            )),
            _ => Err(self.invalid(directive, "expected a name and an optional version constraint")),
        }
    }

    fn long_description(&self, directive: &Directive) -> MetadataResult<String> {
        self.no_options(directive)?;
        match directive.args.as_slice() {
            [Value::FileRef(relative)] => {
                let path = resolve_relative(self.package_dir, relative);
                debug!(path = %path.display(), "Reading long description");
                read_file(&path)
            }
            [value] => self.text(directive, value),
            args => Err(self.invalid(
                directive,
                format!("expected exactly one argument, got {}", args.len()),
            )),
        }
    }

    fn string_list(&self, directive: &Directive, option: &str, value: &Value) -> MetadataResult<Vec<String>> {
        match value {
            Value::Array(items) => items.iter().map(|v| self.text(directive, v)).collect(),
            other => Err(self.invalid(
                directive,
                format!("option '{}' expects an array, got {}", option, other.kind()),
            )),
        }
    }

    fn attribute(&self, directive: &Directive) -> MetadataResult<AttributeSpec> {
        let key = match directive.args.as_slice() {
            [key] => self.text(directive, key)?,
            _ => return Err(self.invalid(directive, "expected exactly one attribute key")),
        };

        let mut attribute = AttributeSpec::new(key);
        for (option, value) in &directive.options {
            attribute = match option.as_str() {
                "display_name" => attribute.with_display_name(self.text(directive, value)?),
                "description" => attribute.with_description(self.text(directive, value)?),
                "default" => match value {
                    Value::Nil => attribute,
                    Value::Bool(b) => attribute.with_default(b.to_string()),
                    other => attribute.with_default(self.text(directive, other)?),
                },
                "type" => {
                    let text = self.text(directive, value)?;
                    attribute.with_type(text.parse().map_err(|e: String| self.invalid(directive, e))?)
                }
                "required" => {
                    let required = match value {
                        // Older manifests write `:required => true`.
                        Value::Bool(true) => Requirement::Required,
                        Value::Bool(false) => Requirement::Optional,
                        other => self
                            .text(directive, other)?
                            .parse()
                            .map_err(|e: String| self.invalid(directive, e))?,
                    };
                    attribute.with_required(required)
                }
                "choice" => attribute.with_choice(self.string_list(directive, option, value)?),
                "recipes" => attribute.with_recipes(self.string_list(directive, option, value)?),
                "calculated" => match value {
                    Value::Bool(b) => attribute.with_calculated(*b),
                    other => {
                        return Err(self.invalid(
                            directive,
                            format!("option 'calculated' expects a boolean, got {}", other.kind()),
                        ))
                    }
                },
                unknown => {
                    return Err(self.invalid(directive, format!("unknown attribute option '{}'", unknown)))
                }
            };
        }
        Ok(attribute)
    }
}
