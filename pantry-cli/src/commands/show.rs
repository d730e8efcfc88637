//! `pantry show`: human-readable package summary.

use std::path::Path;

use pantry::{AttributeSpec, LoadedPackage};

use crate::error::CliError;

/// Load a package and print its summary.
pub fn run(path: &Path, readme: bool) -> Result<(), CliError> {
    let package = super::configured_loader()?.load_package(path)?;
    print!("{}", render(&package, readme));
    Ok(())
}

/// Render the summary text.
fn render(package: &LoadedPackage, readme: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", package.metadata));
    push_field(&mut out, "Maintainer", &maintainer_line(package));
    push_field(&mut out, "License", package.license());
    push_field(&mut out, "Description", package.description());
    push_field(
        &mut out,
        "Manifest",
        &package.manifest_path().display().to_string(),
    );

    if !package.attributes().is_empty() {
        out.push_str(&format!("\nAttributes ({}):\n", package.attributes().len()));
        for attribute in package.attributes() {
            render_attribute(&mut out, attribute);
        }
    }

    if !package.dependencies().is_empty() {
        out.push_str("\nDependencies:\n");
        for dep in package.dependencies() {
            out.push_str(&format!("  {} {}\n", dep.name, dep.constraint));
        }
    }

    if !package.platforms().is_empty() {
        out.push_str("\nPlatforms:\n");
        for platform in package.platforms() {
            out.push_str(&format!("  {} {}\n", platform.name, platform.constraint));
        }
    }

    if !package.recipes().is_empty() {
        out.push_str("\nRecipes:\n");
        for recipe in package.recipes() {
            out.push_str(&format!("  {}  {}\n", recipe.name, recipe.description));
        }
    }

    if readme && !package.long_description().is_empty() {
        out.push('\n');
        out.push_str(package.long_description());
        if !package.long_description().ends_with('\n') {
            out.push('\n');
        }
    }

    out
}

fn maintainer_line(package: &LoadedPackage) -> String {
    match (package.maintainer(), package.maintainer_email()) {
        (name, "") => name.to_string(),
        ("", email) => format!("<{}>", email),
        (name, email) => format!("{} <{}>", name, email),
    }
}

fn push_field(out: &mut String, label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    out.push_str(&format!("  {:<12} {}\n", format!("{}:", label), value));
}

fn render_attribute(out: &mut String, attribute: &AttributeSpec) {
    out.push_str(&format!("  {}\n", attribute.key()));
    if let Some(name) = attribute.display_name() {
        out.push_str(&format!("    Display name: {}\n", name));
    }
    if let Some(description) = attribute.description() {
        out.push_str(&format!("    Description:  {}\n", description));
    }
    if let Some(default) = attribute.default() {
        out.push_str(&format!("    Default:      {}\n", default));
    }
}
