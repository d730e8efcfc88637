//! Compiled JSON form of package metadata.
//!
//! Tools that do not parse manifests consume `metadata.json`, a flat JSON
//! document with the same information. Attributes are an object keyed by
//! attribute key, in declaration order.

use serde_json::{json, Map, Value};

use crate::package::PackageMetadata;

/// Build the compiled JSON document.
///
/// Dependencies, platforms and recipes become objects keyed by name. When a
/// name is declared more than once the later declaration wins.
/// [`validate`](crate::validation::validate) warns about such repeats.
pub fn to_json_value(metadata: &PackageMetadata) -> serde_json::Result<Value> {
    let mut attributes = Map::new();
    for attribute in metadata.attributes() {
        attributes.insert(attribute.key().to_string(), serde_json::to_value(attribute)?);
    }

    let platforms: Map<String, Value> = metadata
        .platforms()
        .iter()
        .map(|p| (p.name.clone(), Value::String(p.constraint.clone())))
        .collect();

    let dependencies: Map<String, Value> = metadata
        .dependencies()
        .iter()
        .map(|d| (d.name.clone(), Value::String(d.constraint.clone())))
        .collect();

    let recipes: Map<String, Value> = metadata
        .recipes()
        .iter()
        .map(|r| (r.name.clone(), Value::String(r.description.clone())))
        .collect();

    Ok(json!({
        "name": metadata.name(),
        "description": metadata.description(),
        "long_description": metadata.long_description(),
        "maintainer": metadata.maintainer(),
        "maintainer_email": metadata.maintainer_email(),
        "license": metadata.license(),
        "platforms": platforms,
        "dependencies": dependencies,
        "recipes": recipes,
        "attributes": attributes,
        "version": metadata.version(),
    }))
}

/// Render the compiled JSON document, pretty-printed.
pub fn to_json(metadata: &PackageMetadata) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&to_json_value(metadata)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::{AttributeSpec, Dependency, Platform, Recipe};

    fn vim() -> PackageMetadata {
        PackageMetadata::builder("vim")
            .maintainer("Opscode, Inc.")
            .license("Apache 2.0")
            .long_description("# vim\n")
            .version("1.0.0")
            .dependency(Dependency::new("apt", None))
            .platform(Platform::new("ubuntu", Some(">= 12.04".into())))
            .recipe(Recipe {
                name: "vim".into(),
                description: "Installs vim".into(),
            })
            .attribute(
                AttributeSpec::new("vim/sucks")
                    .with_display_name("VIM sucks?")
                    .with_description("Describes whether VIM sucks")
                    .with_default("true"),
            )
            .attribute(AttributeSpec::new("vim/extra_packages"))
            .build()
    }

    #[test]
    fn test_identity_fields() {
        let value = to_json_value(&vim()).unwrap();

        assert_eq!(value["name"], "vim");
        assert_eq!(value["maintainer"], "Opscode, Inc.");
        assert_eq!(value["long_description"], "# vim\n");
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["maintainer_email"], "");
    }

    #[test]
    fn test_declarations_are_objects() {
        let value = to_json_value(&vim()).unwrap();

        assert_eq!(value["dependencies"]["apt"], ">= 0.0.0");
        assert_eq!(value["platforms"]["ubuntu"], ">= 12.04");
        assert_eq!(value["recipes"]["vim"], "Installs vim");
    }

    #[test]
    fn test_repeated_dependency_keeps_last() {
        let metadata = PackageMetadata::builder("vim")
            .dependency(Dependency::new("apt", None))
            .dependency(Dependency::new("apt", Some(">= 2.0".into())))
            .build();
        let value = to_json_value(&metadata).unwrap();

        assert_eq!(value["dependencies"], json!({ "apt": ">= 2.0" }));
        assert_eq!(metadata.dependencies().len(), 2);
    }

    #[test]
    fn test_attribute_entry() {
        let value = to_json_value(&vim()).unwrap();
        let attribute = &value["attributes"]["vim/sucks"];

        assert_eq!(attribute["display_name"], "VIM sucks?");
        assert_eq!(attribute["default"], "true");
        assert_eq!(attribute["type"], "string");
        assert_eq!(attribute["required"], "optional");
        assert_eq!(attribute["calculated"], false);
        assert_eq!(attribute["choice"], json!([]));
        assert!(attribute.get("key").is_none());
    }

    #[test]
    fn test_unset_attribute_fields_are_null() {
        let value = to_json_value(&vim()).unwrap();
        assert!(value["attributes"]["vim/extra_packages"]["default"].is_null());
    }

    #[test]
    fn test_attributes_keep_declaration_order() {
        let value = to_json_value(&vim()).unwrap();
        let keys: Vec<&String> = value["attributes"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["vim/sucks", "vim/extra_packages"]);
    }

    #[test]
    fn test_pretty_output_parses_back() {
        let text = to_json(&vim()).unwrap();
        assert!(text.contains("\n  \"name\": \"vim\""));

        let reparsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed, to_json_value(&vim()).unwrap());
    }
}
