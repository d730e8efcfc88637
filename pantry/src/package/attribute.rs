//! Attribute declarations.
//!
//! An attribute is a named, defaulted tunable a package exposes for
//! downstream overriding. Keys are slash-separated paths into the package's
//! attribute tree (`vim/sucks`).

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Declared value type of an attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    #[default]
    String,
    Array,
    Hash,
    Symbol,
    Boolean,
    Numeric,
}

impl AttributeType {
    /// Name as written in a manifest.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Array => "array",
            AttributeType::Hash => "hash",
            AttributeType::Symbol => "symbol",
            AttributeType::Boolean => "boolean",
            AttributeType::Numeric => "numeric",
        }
    }
}

impl FromStr for AttributeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(AttributeType::String),
            "array" => Ok(AttributeType::Array),
            "hash" => Ok(AttributeType::Hash),
            "symbol" => Ok(AttributeType::Symbol),
            "boolean" => Ok(AttributeType::Boolean),
            "numeric" => Ok(AttributeType::Numeric),
            other => Err(format!("unknown attribute type '{}'", other)),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How strongly a consumer is expected to set an attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    Required,
    Recommended,
    #[default]
    Optional,
}

impl Requirement {
    /// Name as written in a manifest.
    pub fn as_str(&self) -> &'static str {
        match self {
            Requirement::Required => "required",
            Requirement::Recommended => "recommended",
            Requirement::Optional => "optional",
        }
    }
}

impl FromStr for Requirement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "required" => Ok(Requirement::Required),
            "recommended" => Ok(Requirement::Recommended),
            "optional" => Ok(Requirement::Optional),
            other => Err(format!("unknown requirement level '{}'", other)),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single attribute declared by a package.
///
/// # Example
///
/// ```
/// use pantry::package::AttributeSpec;
///
/// let attr = AttributeSpec::new("vim/sucks")
///     .with_display_name("VIM sucks?")
///     .with_default("true");
///
/// assert_eq!(attr.key(), "vim/sucks");
/// assert_eq!(attr.default(), Some("true"));
/// assert_eq!(attr.path_segments(), vec!["vim", "sucks"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSpec {
    #[serde(skip)]
    key: String,
    display_name: Option<String>,
    description: Option<String>,
    /// Stored as text whatever the declared type.
    default: Option<String>,
    #[serde(rename = "type")]
    attribute_type: AttributeType,
    required: Requirement,
    choice: Vec<String>,
    recipes: Vec<String>,
    calculated: bool,
}

impl AttributeSpec {
    /// Create an attribute with only its key set.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display_name: None,
            description: None,
            default: None,
            attribute_type: AttributeType::default(),
            required: Requirement::default(),
            choice: Vec::new(),
            recipes: Vec::new(),
            calculated: false,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_type(mut self, attribute_type: AttributeType) -> Self {
        self.attribute_type = attribute_type;
        self
    }

    pub fn with_required(mut self, required: Requirement) -> Self {
        self.required = required;
        self
    }

    pub fn with_choice(mut self, choice: Vec<String>) -> Self {
        self.choice = choice;
        self
    }

    pub fn with_recipes(mut self, recipes: Vec<String>) -> Self {
        self.recipes = recipes;
        self
    }

    pub fn with_calculated(mut self, calculated: bool) -> Self {
        self.calculated = calculated;
        self
    }

    /// Attribute path, unique within its package.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key split into its namespace segments.
    pub fn path_segments(&self) -> Vec<&str> {
        self.key.split('/').filter(|s| !s.is_empty()).collect()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn attribute_type(&self) -> AttributeType {
        self.attribute_type
    }

    pub fn required(&self) -> Requirement {
        self.required
    }

    /// Allowed values; empty means unrestricted.
    pub fn choice(&self) -> &[String] {
        &self.choice
    }

    pub fn recipes(&self) -> &[String] {
        &self.recipes
    }

    /// Whether the value is computed by the package rather than defaulted.
    pub fn is_calculated(&self) -> bool {
        self.calculated
    }
}
