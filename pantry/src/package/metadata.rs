//! Package metadata type.
//!
//! [`PackageMetadata`] is the assembled, immutable description of one
//! package: identity, long description and declared attributes. It is built
//! once by the [`loader`](crate::loader) and only read afterwards.

use std::fmt;

use semver::Version;

use super::attribute::AttributeSpec;
use super::declarations::{Dependency, Platform, Recipe};

/// Complete metadata of a package.
///
/// Fields are only reachable through accessors; once built the value cannot
/// change.
///
/// # Example
///
/// ```
/// use pantry::package::{AttributeSpec, PackageMetadata};
///
/// let metadata = PackageMetadata::builder("vim")
///     .maintainer("Opscode, Inc.")
///     .version("1.0.0")
///     .attribute(AttributeSpec::new("vim/sucks").with_default("true"))
///     .build();
///
/// assert_eq!(metadata.name(), "vim");
/// assert_eq!(metadata.attribute("vim/sucks").unwrap().default(), Some("true"));
/// assert_eq!(metadata.to_string(), "vim v1.0.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    name: String,
    maintainer: String,
    maintainer_email: String,
    license: String,
    description: String,
    long_description: String,
    version: String,
    attributes: Vec<AttributeSpec>,
    dependencies: Vec<Dependency>,
    platforms: Vec<Platform>,
    recipes: Vec<Recipe>,
}

impl PackageMetadata {
    /// Start building metadata for the named package.
    pub fn builder(name: impl Into<String>) -> PackageMetadataBuilder {
        PackageMetadataBuilder::new(name)
    }

    /// Package name, unique within a registry.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn maintainer(&self) -> &str {
        &self.maintainer
    }

    /// Maintainer contact address. Not checked for email shape.
    pub fn maintainer_email(&self) -> &str {
        &self.maintainer_email
    }

    /// Free-form license identifier.
    pub fn license(&self) -> &str {
        &self.license
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Full text of the companion document, read at load time.
    pub fn long_description(&self) -> &str {
        &self.long_description
    }

    /// Version exactly as declared.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Parsed view of the version, when it has semantic-version shape.
    ///
    /// A two-component version (`1.0`) is read as `1.0.0`.
    ///
    /// ```
    /// use pantry::package::PackageMetadata;
    /// use semver::Version;
    ///
    /// let short = PackageMetadata::builder("a").version("1.2").build();
    /// assert_eq!(short.semver(), Some(Version::new(1, 2, 0)));
    ///
    /// let odd = PackageMetadata::builder("b").version("latest").build();
    /// assert_eq!(odd.semver(), None);
    /// ```
    pub fn semver(&self) -> Option<Version> {
        let version = self.version.trim();
        if let Ok(parsed) = Version::parse(version) {
            return Some(parsed);
        }
        let parts: Vec<&str> = version.split('.').collect();
        if parts.len() == 2 && parts.iter().all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit())) {
            return Version::parse(&format!("{}.0", version)).ok();
        }
        None
    }

    /// Attributes in declaration order.
    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }

    /// Find an attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|a| a.key() == key)
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }
}

impl fmt::Display for PackageMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} v{}", self.name, self.version)
        }
    }
}

/// Builder for [`PackageMetadata`].
///
/// Unset text fields are empty. Attribute-key uniqueness is enforced by the
/// loader, not here.
#[derive(Debug, Clone)]
pub struct PackageMetadataBuilder {
    inner: PackageMetadata,
}

impl PackageMetadataBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            inner: PackageMetadata {
                name: name.into(),
                maintainer: String::new(),
                maintainer_email: String::new(),
                license: String::new(),
                description: String::new(),
                long_description: String::new(),
                version: String::new(),
                attributes: Vec::new(),
                dependencies: Vec::new(),
                platforms: Vec::new(),
                recipes: Vec::new(),
            },
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.inner.name = name.into();
        self
    }

    pub fn maintainer(mut self, maintainer: impl Into<String>) -> Self {
        self.inner.maintainer = maintainer.into();
        self
    }

    pub fn maintainer_email(mut self, email: impl Into<String>) -> Self {
        self.inner.maintainer_email = email.into();
        self
    }

    pub fn license(mut self, license: impl Into<String>) -> Self {
        self.inner.license = license.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.inner.description = description.into();
        self
    }

    pub fn long_description(mut self, text: impl Into<String>) -> Self {
        self.inner.long_description = text.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.inner.version = version.into();
        self
    }

    pub fn attribute(mut self, attribute: AttributeSpec) -> Self {
        self.inner.attributes.push(attribute);
        self
    }

    pub fn dependency(mut self, dependency: Dependency) -> Self {
        self.inner.dependencies.push(dependency);
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.inner.platforms.push(platform);
        self
    }

    pub fn recipe(mut self, recipe: Recipe) -> Self {
        self.inner.recipes.push(recipe);
        self
    }

    /// Whether an attribute with this key was already added.
    pub fn has_attribute(&self, key: &str) -> bool {
        self.inner.attributes.iter().any(|a| a.key() == key)
    }

    pub fn build(self) -> PackageMetadata {
        self.inner
    }
}
