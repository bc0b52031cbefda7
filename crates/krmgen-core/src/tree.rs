//! Generic resource tree
//!
//! [`Tree`] is the schema-less form of a resource: nested maps, sequences and
//! scalars with the key order of the source document preserved.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value as JsonValue;

use crate::error::DecodeError;

/// Numeric scalar, keeping integers and floats apart
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Number {
    fn from_yaml(n: &serde_yaml::Number) -> Self {
        if let Some(i) = n.as_i64() {
            Number::Int(i)
        } else if let Some(u) = n.as_u64() {
            Number::UInt(u)
        } else {
            Number::Float(n.as_f64().unwrap_or(f64::NAN))
        }
    }

    fn from_json(n: &serde_json::Number) -> Self {
        if let Some(i) = n.as_i64() {
            Number::Int(i)
        } else if let Some(u) = n.as_u64() {
            Number::UInt(u)
        } else {
            Number::Float(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

/// Schema-less value tree
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Tree {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Seq(Vec<Tree>),
    Map(IndexMap<String, Tree>),
}

impl Tree {
    /// Parse a YAML document into a tree
    pub fn from_yaml_str(text: &str) -> Result<Self, DecodeError> {
        let value: serde_yaml::Value = serde_yaml::from_str(text)?;
        Self::from_yaml(value)
    }

    /// Convert a YAML value, rejecting mapping keys that are not strings
    pub fn from_yaml(value: serde_yaml::Value) -> Result<Self, DecodeError> {
        let mut path = Vec::new();
        convert_yaml(value, &mut path)
    }

    /// Convert a JSON value
    pub fn from_json(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Tree::Null,
            JsonValue::Bool(b) => Tree::Bool(b),
            JsonValue::Number(n) => Tree::Number(Number::from_json(&n)),
            JsonValue::String(s) => Tree::String(s),
            JsonValue::Array(items) => Tree::Seq(items.into_iter().map(Tree::from_json).collect()),
            JsonValue::Object(map) => Tree::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Tree::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert to JSON. Non-finite floats have no JSON form and become null.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Tree::Null => JsonValue::Null,
            Tree::Bool(b) => JsonValue::Bool(*b),
            Tree::Number(Number::Int(i)) => JsonValue::from(*i),
            Tree::Number(Number::UInt(u)) => JsonValue::from(*u),
            Tree::Number(Number::Float(f)) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Tree::String(s) => JsonValue::String(s.clone()),
            Tree::Seq(items) => JsonValue::Array(items.iter().map(Tree::to_json).collect()),
            Tree::Map(map) => JsonValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Look up a key of a map node
    pub fn get(&self, key: &str) -> Option<&Tree> {
        self.as_map()?.get(key)
    }

    /// Mutable lookup of a key of a map node
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Tree> {
        match self {
            Tree::Map(map) => map.get_mut(key),
            _ => None,
        }
    }

    /// Follow a path of map keys
    pub fn pointer(&self, path: &[&str]) -> Option<&Tree> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tree::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Tree>> {
        match self {
            Tree::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Short name of the node type, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Tree::Null => "null",
            Tree::Bool(_) => "boolean",
            Tree::Number(_) => "number",
            Tree::String(_) => "string",
            Tree::Seq(_) => "sequence",
            Tree::Map(_) => "mapping",
        }
    }
}

fn convert_yaml(value: serde_yaml::Value, path: &mut Vec<String>) -> Result<Tree, DecodeError> {
    use serde_yaml::Value;

    Ok(match value {
        Value::Null => Tree::Null,
        Value::Bool(b) => Tree::Bool(b),
        Value::Number(n) => Tree::Number(Number::from_yaml(&n)),
        Value::String(s) => Tree::String(s),
        Value::Sequence(items) => {
            let mut seq = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                path.push(i.to_string());
                seq.push(convert_yaml(item, path)?);
                path.pop();
            }
            Tree::Seq(seq)
        }
        Value::Mapping(mapping) => {
            let mut map = IndexMap::with_capacity(mapping.len());
            for (key, item) in mapping {
                let key = match key {
                    Value::String(s) => s,
                    other => {
                        return Err(DecodeError::NonStringKey {
                            key: format!("{other:?}"),
                            path: display_path(path),
                        });
                    }
                };
                path.push(key.clone());
                let item = convert_yaml(item, path)?;
                path.pop();
                map.insert(key, item);
            }
            Tree::Map(map)
        }
        // Tags carry no meaning for Kubernetes objects
        Value::Tagged(tagged) => convert_yaml(tagged.value, path)?,
    })
}

fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.join(".")
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Tree::Null => serializer.serialize_unit(),
            Tree::Bool(b) => serializer.serialize_bool(*b),
            Tree::Number(Number::Int(i)) => serializer.serialize_i64(*i),
            Tree::Number(Number::UInt(u)) => serializer.serialize_u64(*u),
            Tree::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Tree::String(s) => serializer.serialize_str(s),
            Tree::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Tree::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_key_order() {
        let tree = Tree::from_yaml_str("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
        let keys: Vec<_> = tree.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_number_kinds() {
        let tree = Tree::from_yaml_str("a: -3\nb: 18446744073709551615\nc: 1.5\nd: .inf\n").unwrap();
        assert_eq!(tree.get("a"), Some(&Tree::Number(Number::Int(-3))));
        assert_eq!(tree.get("b"), Some(&Tree::Number(Number::UInt(u64::MAX))));
        assert_eq!(tree.get("c"), Some(&Tree::Number(Number::Float(1.5))));
        assert_eq!(
            tree.get("d"),
            Some(&Tree::Number(Number::Float(f64::INFINITY)))
        );
    }

    #[test]
    fn test_non_string_key_rejected() {
        let err = Tree::from_yaml_str("metadata:\n  labels:\n    1: one\n").unwrap_err();
        match err {
            DecodeError::NonStringKey { path, .. } => assert_eq!(path, "metadata.labels"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_key_rejected() {
        assert!(Tree::from_yaml_str("a: 1\na: 2\n").is_err());
    }

    #[test]
    fn test_tags_are_unwrapped() {
        let tree = Tree::from_yaml_str("a: !custom value\n").unwrap();
        assert_eq!(tree.get("a").and_then(Tree::as_str), Some("value"));
    }

    #[test]
    fn test_json_round_trip_keeps_empty_containers() {
        let tree = Tree::from_yaml_str("a: {}\nb: []\nc: null\nd: ''\n").unwrap();
        assert_eq!(Tree::from_json(tree.to_json()), tree);
    }

    #[test]
    fn test_non_finite_float_to_json_is_null() {
        let tree = Tree::Number(Number::Float(f64::NAN));
        assert_eq!(tree.to_json(), JsonValue::Null);
    }

    #[test]
    fn test_pointer() {
        let tree = Tree::from_yaml_str("metadata:\n  name: web\n").unwrap();
        assert_eq!(
            tree.pointer(&["metadata", "name"]).and_then(Tree::as_str),
            Some("web")
        );
        assert!(tree.pointer(&["metadata", "namespace"]).is_none());
    }
}
