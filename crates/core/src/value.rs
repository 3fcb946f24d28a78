//! Untyped destination for maps whose values have no declared type.

use formbind_tree::Node;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::slot::{Hydrate, Kind, Scalar};

/// A decoded value of unknown shape: a string or a map of further values.
///
/// As a map value it takes the shape of the incoming node. Once an entry
/// holds a string, a later branch for the same key is an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Map(BTreeMap<String, Value>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Text(String::new())
    }
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text.as_str()),
            Value::Map(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            Value::Text(_) => None,
        }
    }

    /// Look up a child by key. Always `None` for text.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.get(key)
    }
}

impl Hydrate for Value {
    fn kind(&mut self) -> Kind<'_> {
        match self {
            Value::Text(text) => Kind::Scalar(Scalar::Text(text)),
            Value::Map(map) => Kind::Map(map),
        }
    }

    fn reset(&mut self) {
        *self = Value::default();
    }

    fn zero() -> Self {
        Value::default()
    }

    fn fresh(node: &Node) -> Self {
        match node {
            Node::Branch(_) => Value::Map(BTreeMap::new()),
            Node::Scalar(_) => Value::default(),
        }
    }

    fn type_name(&self) -> &'static str {
        "Value"
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Text(text) => serde_json::Value::String(text),
            Value::Map(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecoderConfig;
    use crate::engine::Hydrator;
    use crate::error::DecodeError;
    use serde_json::json;

    fn decode(dst: &mut BTreeMap<String, Value>, node: serde_json::Value) -> crate::Result<()> {
        Hydrator::new(&DecoderConfig::default()).hydrate(dst, &Node::from(node))
    }

    #[test]
    fn test_shape_follows_node() {
        let mut map = BTreeMap::new();
        decode(&mut map, json!({"a": "1", "b": {"c": "2", "d": {"e": "3"}}})).unwrap();

        assert_eq!(map["a"], Value::from("1"));
        assert_eq!(map["b"].get("c"), Some(&Value::from("2")));
        assert_eq!(
            map["b"].get("d").and_then(|d| d.get("e")).and_then(Value::as_text),
            Some("3")
        );
    }

    #[test]
    fn test_nested_maps_merge() {
        let mut map = BTreeMap::new();
        decode(&mut map, json!({"b": {"x": "1"}})).unwrap();
        decode(&mut map, json!({"b": {"y": "2"}})).unwrap();

        let b = map["b"].as_map().unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(b["x"], Value::from("1"));
        assert_eq!(b["y"], Value::from("2"));
    }

    #[test]
    fn test_text_entry_rejects_branch() {
        let mut map = BTreeMap::from([("a".to_string(), Value::from("1"))]);
        let err = decode(&mut map, json!({"a": {"b": "2"}})).unwrap_err();
        assert_eq!(err, DecodeError::ExpectedScalar { type_name: "Value" });
        assert_eq!(map["a"], Value::from("1"));
    }

    #[test]
    fn test_json_conversion() {
        let value = Value::Map(BTreeMap::from([
            ("a".to_string(), Value::from("1")),
            (
                "b".to_string(),
                Value::Map(BTreeMap::from([("c".to_string(), Value::from(""))])),
            ),
        ]));
        assert_eq!(
            serde_json::Value::from(value.clone()),
            json!({"a": "1", "b": {"c": ""}})
        );
        assert_eq!(serde_json::to_value(&value).unwrap(), json!({"a": "1", "b": {"c": ""}}));
    }

    #[test]
    fn test_deserialize_untagged() {
        let value: Value = serde_json::from_value(json!({"a": {"b": "x"}})).unwrap();
        assert_eq!(value.get("a").and_then(|a| a.get("b")), Some(&Value::from("x")));
    }
}
