use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single entry of `componentsSchema.$defs`.
///
/// Kept as raw JSON: only `properties.props.{properties,required,additionalProperties}`
/// is ever inspected, and schemas in the wild carry arbitrary extra keywords.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SchemaDef(pub Value);

impl SchemaDef {
    /// The `properties.props` node, if the definition has one.
    pub fn props_container(&self) -> Option<&Map<String, Value>> {
        self.0.get("properties")?.get("props")?.as_object()
    }

    fn declared(&self) -> Option<&Map<String, Value>> {
        self.props_container()?.get("properties")?.as_object()
    }

    /// Prop names declared under `properties.props.properties`.
    pub fn declared_props(&self) -> Vec<&str> {
        self.declared()
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn declares(&self, prop: &str) -> bool {
        self.declared().is_some_and(|m| m.contains_key(prop))
    }

    /// Whether `prop` is listed in `properties.props.required`.
    pub fn requires(&self, prop: &str) -> bool {
        self.props_container()
            .and_then(|c| c.get("required"))
            .and_then(Value::as_array)
            .is_some_and(|req| req.iter().any(|r| r.as_str() == Some(prop)))
    }

    /// Undeclared runtime props are tolerated unless `additionalProperties`
    /// is literally `false`.
    pub fn allows_additional_props(&self) -> bool {
        !matches!(
            self.props_container().and_then(|c| c.get("additionalProperties")),
            Some(Value::Bool(false))
        )
    }
}

/// The `componentsSchema` node of a conversation document.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ComponentsSchema {
    #[serde(rename = "$defs", default, skip_serializing_if = "Option::is_none")]
    pub defs: Option<BTreeMap<String, SchemaDef>>,
}

/// Fuzzy component-name equivalence shared by every schema lookup.
///
/// Holds when the names are equal, when the key is the name plus a `Props`
/// suffix, or when either holds after case folding (in either direction of
/// the suffix).
pub fn names_equivalent(schema_key: &str, component_name: &str) -> bool {
    if schema_key == component_name {
        return true;
    }
    if schema_key.strip_suffix("Props") == Some(component_name) {
        return true;
    }
    let key = schema_key.to_lowercase();
    let name = component_name.to_lowercase();
    key == name
        || key.strip_suffix("props") == Some(name.as_str())
        || name.strip_suffix("props") == Some(key.as_str())
}

/// Finds the schema definition for a component.
///
/// An exact key wins; otherwise the first equivalent key in key order.
pub fn find_schema<'a>(
    defs: &'a BTreeMap<String, SchemaDef>,
    component_name: &str,
) -> Option<(&'a str, &'a SchemaDef)> {
    if let Some((key, def)) = defs.get_key_value(component_name) {
        return Some((key.as_str(), def));
    }
    defs.iter()
        .find(|(key, _)| names_equivalent(key, component_name))
        .map(|(key, def)| (key.as_str(), def))
}
