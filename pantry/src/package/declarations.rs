//! Secondary declarations: dependencies, supported platforms and recipes.
//!
//! These are recorded exactly as declared. Nothing here resolves a
//! dependency or checks a platform.

/// Constraint used when a declaration gives none.
pub const ANY_VERSION: &str = ">= 0.0.0";

/// A `depends "name", "constraint"` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub constraint: String,
}

impl Dependency {
    pub fn new(name: impl Into<String>, constraint: Option<String>) -> Self {
        Self {
            name: name.into(),
            constraint: constraint.unwrap_or_else(|| ANY_VERSION.to_string()),
        }
    }
}

/// A `supports "platform", "constraint"` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub name: String,
    pub constraint: String,
}

impl Platform {
    pub fn new(name: impl Into<String>, constraint: Option<String>) -> Self {
        Self {
            name: name.into(),
            constraint: constraint.unwrap_or_else(|| ANY_VERSION.to_string()),
        }
    }
}

/// A `recipe "name", "description"` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub name: String,
    pub description: String,
}
