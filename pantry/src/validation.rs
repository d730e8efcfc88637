//! Advisory checks over loaded metadata.
//!
//! Loading only enforces what makes the metadata unusable (syntax, missing
//! companion document, duplicate attribute keys). Everything else is reported
//! here as a list of issues; strict loading turns any issue into an error.

use std::collections::BTreeSet;
use std::fmt;

use crate::package::PackageMetadata;

/// How serious a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One finding from [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Field or attribute key the finding is about.
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }

    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.field, self.message)
    }
}

/// Check metadata for suspicious or inconsistent declarations.
///
/// Issues come back in field order, then attribute declaration order.
///
/// # Example
///
/// ```
/// use pantry::package::{AttributeSpec, PackageMetadata};
/// use pantry::validation::{validate, Severity};
///
/// let metadata = PackageMetadata::builder("vim")
///     .maintainer("Opscode, Inc.")
///     .maintainer_email("cookbooks@opscode.com")
///     .license("Apache 2.0")
///     .version("1.0.0")
///     .attribute(AttributeSpec::new("vim/sucks").with_default("true"))
///     .build();
///
/// assert!(validate(&metadata).is_empty());
/// ```
pub fn validate(metadata: &PackageMetadata) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (field, value) in [
        ("maintainer", metadata.maintainer()),
        ("license", metadata.license()),
        ("version", metadata.version()),
    ] {
        if value.trim().is_empty() {
            issues.push(ValidationIssue::warning(field, "not declared"));
        }
    }

    let version = metadata.version();
    if !version.trim().is_empty() && metadata.semver().is_none() {
        issues.push(ValidationIssue::warning(
            "version",
            format!("'{}' is not a semantic version", version),
        ));
    }

    let email = metadata.maintainer_email();
    if !email.is_empty() && !email.contains('@') {
        issues.push(ValidationIssue::warning(
            "maintainer_email",
            format!("'{}' does not look like an email address", email),
        ));
    }

    repeated_names(
        &mut issues,
        "dependencies",
        metadata.dependencies().iter().map(|d| d.name.as_str()),
    );
    repeated_names(
        &mut issues,
        "platforms",
        metadata.platforms().iter().map(|p| p.name.as_str()),
    );
    repeated_names(
        &mut issues,
        "recipes",
        metadata.recipes().iter().map(|r| r.name.as_str()),
    );

    for attribute in metadata.attributes() {
        if attribute.path_segments().is_empty() {
            issues.push(ValidationIssue::error(attribute.key(), "attribute key is empty"));
        }

        if let Some(default) = attribute.default() {
            if !attribute.choice().is_empty() && !attribute.choice().iter().any(|c| c == default) {
                issues.push(ValidationIssue::error(
                    attribute.key(),
                    format!("default '{}' is not one of the declared choices", default),
                ));
            }
            if attribute.is_calculated() {
                issues.push(ValidationIssue::error(
                    attribute.key(),
                    "calculated attribute cannot declare a default",
                ));
            }
        }
    }

    issues
}

/// Warn once for every name declared more than once. The compiled JSON
/// form keys these by name, so only the last declaration survives there.
fn repeated_names<'a>(
    issues: &mut Vec<ValidationIssue>,
    field: &str,
    names: impl Iterator<Item = &'a str>,
) {
    let mut seen = BTreeSet::new();
    let mut reported = BTreeSet::new();
    for name in names {
        if !seen.insert(name) && reported.insert(name) {
            issues.push(ValidationIssue::warning(
                field,
                format!("'{}' is declared more than once; the last declaration wins", name),
            ));
        }
    }
}

/// Whether any issue is an error.
pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(ValidationIssue::is_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::{AttributeSpec, Dependency, Platform};

    fn complete() -> crate::package::PackageMetadataBuilder {
        PackageMetadata::builder("vim")
            .maintainer("Opscode, Inc.")
            .maintainer_email("cookbooks@opscode.com")
            .license("Apache 2.0")
            .version("1.0.0")
    }

    #[test]
    fn test_complete_metadata_has_no_issues() {
        assert!(validate(&complete().build()).is_empty());
    }

    #[test]
    fn test_missing_identity_fields_warn() {
        let issues = validate(&PackageMetadata::builder("bare").build());
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();

        assert_eq!(fields, vec!["maintainer", "license", "version"]);
        assert!(!has_errors(&issues));
    }

    #[test]
    fn test_non_semver_version_warns() {
        let issues = validate(&complete().version("one").build());

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(issues[0].message.contains("'one'"));
    }

    #[test]
    fn test_two_component_version_is_accepted() {
        assert!(validate(&complete().version("1.0").build()).is_empty());
    }

    #[test]
    fn test_bad_email_warns() {
        let issues = validate(&complete().maintainer_email("cookbooks").build());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "maintainer_email");
    }

    #[test]
    fn test_default_outside_choice_is_error() {
        let attribute = AttributeSpec::new("vim/sucks")
            .with_choice(vec!["yes".into(), "no".into()])
            .with_default("true");
        let issues = validate(&complete().attribute(attribute).build());

        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert_eq!(issues[0].field, "vim/sucks");
        assert!(has_errors(&issues));
    }

    #[test]
    fn test_calculated_with_default_is_error() {
        let attribute = AttributeSpec::new("x/y")
            .with_calculated(true)
            .with_default("1");
        let issues = validate(&complete().attribute(attribute).build());

        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("calculated"));
    }

    #[test]
    fn test_empty_key_is_error() {
        let issues = validate(&complete().attribute(AttributeSpec::new("/")).build());
        assert!(has_errors(&issues));
    }

    #[test]
    fn test_repeated_dependency_warns_once() {
        let metadata = complete()
            .dependency(Dependency::new("apt", None))
            .dependency(Dependency::new("apt", Some(">= 1.0".into())))
            .dependency(Dependency::new("apt", Some(">= 2.0".into())))
            .platform(Platform::new("ubuntu", None))
            .build();
        let issues = validate(&metadata);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "dependencies");
        assert!(issues[0].message.contains("'apt'"));
        assert!(!has_errors(&issues));
    }

    #[test]
    fn test_issue_display() {
        let issue = ValidationIssue::warning("version", "not declared");
        assert_eq!(issue.to_string(), "warning: version: not declared");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
    }
}
