//! Attribute projection
//!
//! Turns any serializable resource into a flat, ordered [`AttributeMap`].
//!
//! Projection rules, applied the same way to every resource kind:
//! - strings, numbers and booleans become scalar values (numbers stay numeric)
//! - arrays whose elements are all scalars become [`AttributeValue::List`]
//! - nested objects are flattened into dotted keys (`parent.child`)
//! - arrays containing objects or arrays are not filterable and are dropped
//! - `null` (an unset optional field) leaves the attribute absent

use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Loosely-typed attribute value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    Number(Number),
    Bool(bool),
    List(Vec<AttributeValue>),
}

impl AttributeValue {
    /// Canonical string form of a scalar, `None` for lists
    ///
    /// Booleans render as `true`/`false`, integers in base 10. Whole-number
    /// floats render like integers, so `5.0` and `5` are both `"5"`.
    pub fn as_canonical(&self) -> Option<Cow<'_, str>> {
        match self {
            AttributeValue::String(s) => Some(Cow::Borrowed(s)),
            AttributeValue::Number(n) => Some(Cow::Owned(canonical_number(n))),
            AttributeValue::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            AttributeValue::List(_) => None,
        }
    }

    fn scalar(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(AttributeValue::String(s.clone())),
            Value::Number(n) => Some(AttributeValue::Number(n.clone())),
            Value::Bool(b) => Some(AttributeValue::Bool(*b)),
            _ => None,
        }
    }
}

/// Largest integer an f64 holds exactly
const MAX_EXACT_F64: f64 = 9_007_199_254_740_992.0;

fn canonical_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_EXACT_F64 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}

impl From<i64> for AttributeValue {
    fn from(n: i64) -> Self {
        AttributeValue::Number(n.into())
    }
}

/// Attribute name -> value, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AttributeMap(BTreeMap<String, AttributeValue>);

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flatten a JSON object into an attribute map
    ///
    /// Anything other than an object projects to an empty map.
    pub fn from_json(value: &Value) -> Self {
        let mut map = Self::new();
        if let Value::Object(fields) = value {
            map.flatten_object(None, fields);
        }
        map
    }

    fn flatten_object(&mut self, prefix: Option<&str>, fields: &Map<String, Value>) {
        for (key, value) in fields {
            let name = match prefix {
                Some(prefix) => format!("{}.{}", prefix, key),
                None => key.clone(),
            };

            match value {
                Value::Null => {}
                Value::Object(nested) => self.flatten_object(Some(&name), nested),
                Value::Array(items) => {
                    let scalars: Option<Vec<_>> = items.iter().map(AttributeValue::scalar).collect();
                    if let Some(scalars) = scalars {
                        self.0.insert(name, AttributeValue::List(scalars));
                    }
                }
                scalar => {
                    if let Some(v) = AttributeValue::scalar(scalar) {
                        self.0.insert(name, v);
                    }
                }
            }
        }
    }
}

impl FromIterator<(String, AttributeValue)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (String, AttributeValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Project a resource into its attribute map
///
/// Never fails: a value serde cannot turn into JSON is logged and projects to
/// an empty map, which no filter matches.
pub fn project<R: Serialize + ?Sized>(resource: &R) -> AttributeMap {
    match serde_json::to_value(resource) {
        Ok(value) => AttributeMap::from_json(&value),
        Err(e) => {
            tracing::error!("Failed to project resource into attributes: {}", e);
            AttributeMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Zone {
        id: String,
        label: String,
        cache_size: u64,
        cors: bool,
        regions: Vec<String>,
        date_purged: Option<String>,
    }

    #[test]
    fn test_scalars_and_lists() {
        let zone = Zone {
            id: "pz-1".into(),
            label: "assets".into(),
            cache_size: 1024,
            cors: true,
            regions: vec!["ewr".into(), "lax".into()],
            date_purged: None,
        };

        let attrs = project(&zone);
        assert_eq!(attrs.get("label"), Some(&AttributeValue::from("assets")));
        assert_eq!(attrs.get("cache_size"), Some(&AttributeValue::Number(1024u64.into())));
        assert_eq!(attrs.get("cors"), Some(&AttributeValue::Bool(true)));
        assert_eq!(
            attrs.get("regions"),
            Some(&AttributeValue::List(vec!["ewr".into(), "lax".into()]))
        );
        assert!(!attrs.contains("date_purged"), "null optionals stay absent");
    }

    #[test]
    fn test_nested_objects_flatten_with_dots() {
        let attrs = AttributeMap::from_json(&json!({
            "name": "k8s",
            "meta": {"owner": {"team": "core"}, "tier": 2}
        }));

        let keys: Vec<_> = attrs.keys().collect();
        assert_eq!(keys, vec!["meta.owner.team", "meta.tier", "name"]);
        assert_eq!(attrs.get("meta.owner.team"), Some(&AttributeValue::from("core")));
    }

    #[test]
    fn test_arrays_of_objects_are_dropped() {
        let attrs = AttributeMap::from_json(&json!({
            "node_pools": [{"label": "a"}],
            "mixed": ["a", {"b": 1}],
            "tags": []
        }));

        assert!(!attrs.contains("node_pools"));
        assert!(!attrs.contains("mixed"));
        assert_eq!(attrs.get("tags"), Some(&AttributeValue::List(vec![])));
    }

    #[test]
    fn test_non_object_projects_empty() {
        assert!(AttributeMap::from_json(&json!("plain")).is_empty());
        assert!(AttributeMap::from_json(&json!([1, 2])).is_empty());
    }

    #[test]
    fn test_canonical_strings() {
        assert_eq!(AttributeValue::Bool(false).as_canonical().unwrap(), "false");
        assert_eq!(AttributeValue::from(-42i64).as_canonical().unwrap(), "-42");
        assert_eq!(
            AttributeValue::Number(Number::from_f64(5.5).unwrap())
                .as_canonical()
                .unwrap(),
            "5.5"
        );
        assert!(AttributeValue::List(vec![]).as_canonical().is_none());
    }

    #[test]
    fn test_whole_floats_render_like_integers() {
        let whole = AttributeValue::Number(Number::from_f64(5.0).unwrap());
        assert_eq!(whole.as_canonical().unwrap(), "5");
        let negative = AttributeValue::Number(Number::from_f64(-12.0).unwrap());
        assert_eq!(negative.as_canonical().unwrap(), "-12");
        let huge = AttributeValue::Number(Number::from_f64(1e300).unwrap());
        assert_eq!(huge.as_canonical().unwrap(), Number::from_f64(1e300).unwrap().to_string());
    }

    #[test]
    fn test_projection_is_deterministic() {
        let zone = Zone {
            id: "pz-1".into(),
            label: "assets".into(),
            cache_size: 0,
            cors: false,
            regions: vec![],
            date_purged: Some("2024-01-01".into()),
        };
        assert_eq!(project(&zone), project(&zone));
    }
}
