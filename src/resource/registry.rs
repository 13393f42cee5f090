//! Resource Registry - Load resource definitions from JSON
//!
//! This module loads the Vultr resource kind definitions from embedded JSON
//! and provides lookup functions for the rest of the crate. Each kind's
//! attribute table is both the whitelist of filterable names and the schema
//! of the state written back after a lookup.

use super::attributes::AttributeValue;
use super::error::LookupError;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[include_str!("../resources/vultr.json")];

/// Declared type of a documented attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Int,
    Float,
    Bool,
    List,
}

impl AttributeType {
    /// Value written to state when the resource does not carry the attribute
    pub fn zero_value(self) -> AttributeValue {
        match self {
            AttributeType::String => AttributeValue::String(String::new()),
            AttributeType::Int => AttributeValue::Number(0u64.into()),
            AttributeType::Float => AttributeValue::Number(
                serde_json::Number::from_f64(0.0).unwrap_or_else(|| 0u64.into()),
            ),
            AttributeType::Bool => AttributeValue::Bool(false),
            AttributeType::List => AttributeValue::List(Vec::new()),
        }
    }
}

/// Attribute definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeDef {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AttributeType,
}

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    pub display_name: String,
    /// Path relative to the API base; may contain a `{scope}` placeholder
    pub list_path: String,
    /// Name of the array in list responses
    pub collection_key: String,
    /// Name of the object in single-item responses, when the API has one
    #[serde(default)]
    pub get_key: Option<String>,
    pub id_field: String,
    /// Placeholder in `list_path` that callers must fill in
    #[serde(default)]
    pub scope: Option<String>,
    pub attributes: Vec<AttributeDef>,
}

impl ResourceDef {
    /// Names of the documented (and therefore filterable) attributes
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    /// Fill the scope placeholder of `list_path`
    pub fn resolve_path(&self, kind: &str, scope: Option<&str>) -> Result<String, LookupError> {
        let Some(placeholder) = self.scope.as_deref() else {
            return Ok(self.list_path.clone());
        };

        match scope.filter(|s| !s.is_empty()) {
            Some(value) => Ok(self.list_path.replace(
                &format!("{{{}}}", placeholder),
                &urlencoding::encode(value),
            )),
            None => Err(LookupError::MissingScope {
                kind: kind.to_string(),
                scope: placeholder.to_string(),
            }),
        }
    }
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub resources: HashMap<String, ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig {
            resources: HashMap::new(),
        };

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            final_config.resources.extend(partial.resources);
        }

        final_config
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(key)
}

/// Get all resource keys, sorted
pub fn get_all_resource_keys() -> Vec<&'static str> {
    let mut keys: Vec<_> = get_registry()
        .resources
        .keys()
        .map(|s| s.as_str())
        .collect();
    keys.sort_unstable();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads_successfully() {
        let registry = get_registry();
        assert!(
            !registry.resources.is_empty(),
            "Registry should have resources"
        );
    }

    #[test]
    fn test_application_resource_exists() {
        let resource = get_resource("application");
        assert!(resource.is_some(), "Application resource should exist");

        let resource = resource.unwrap();
        assert_eq!(resource.display_name, "Applications");
        assert_eq!(resource.collection_key, "applications");
        assert!(resource.get_key.is_none());
    }

    #[test]
    fn test_get_all_resource_keys() {
        let keys = get_all_resource_keys();
        assert_eq!(
            keys,
            vec![
                "application",
                "cdn_pull_zone",
                "dns_domain",
                "dns_record",
                "os",
                "plan",
                "region",
                "ssh_key"
            ]
        );
    }

    #[test]
    fn test_every_kind_documents_its_id_field() {
        for (key, def) in &get_registry().resources {
            assert!(
                def.attribute_names().contains(&def.id_field.as_str()),
                "{} does not document its id field {}",
                key,
                def.id_field
            );
        }
    }

    #[test]
    fn test_attribute_names_unique() {
        for (key, def) in &get_registry().resources {
            let mut names = def.attribute_names();
            let total = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), total, "{} repeats an attribute", key);
        }
    }

    #[test]
    fn test_unscoped_path_is_static() {
        let def = get_resource("ssh_key").unwrap();
        assert_eq!(def.resolve_path("ssh_key", Some("ignored")).unwrap(), "ssh-keys");
    }

    #[test]
    fn test_scoped_path_requires_scope() {
        let def = get_resource("dns_record").unwrap();
        assert_eq!(
            def.resolve_path("dns_record", Some("example.com")).unwrap(),
            "domains/example.com/records"
        );

        let err = def.resolve_path("dns_record", None).unwrap_err();
        assert!(matches!(err, LookupError::MissingScope { ref scope, .. } if scope == "domain"));
        assert!(def.resolve_path("dns_record", Some("")).is_err());
    }

    #[test]
    fn test_scope_value_is_encoded() {
        let def = get_resource("dns_record").unwrap();
        assert_eq!(
            def.resolve_path("dns_record", Some("a/b")).unwrap(),
            "domains/a%2Fb/records"
        );
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(AttributeType::String.zero_value(), AttributeValue::from(""));
        assert_eq!(AttributeType::Bool.zero_value(), AttributeValue::Bool(false));
        assert_eq!(AttributeType::List.zero_value(), AttributeValue::List(vec![]));
        assert_eq!(
            AttributeType::Int.zero_value().as_canonical().unwrap(),
            "0"
        );
    }
}
