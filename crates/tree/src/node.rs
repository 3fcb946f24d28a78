//! Node tree types.
//!
//! A [`Node`] is either a scalar text value or a [`Branch`] of named
//! children. Branch keys are field names, map keys or list indices;
//! which one is decided later by the destination type.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ──────────────────────────────────────────────
// Node
// ──────────────────────────────────────────────

/// One level of the intermediate tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Scalar(String),
    Branch(Branch),
}

impl Node {
    pub fn scalar(text: impl Into<String>) -> Node {
        Node::Scalar(text.into())
    }

    pub fn branch() -> Node {
        Node::Branch(Branch::new())
    }

    /// True for `Scalar("")`, which the decoder treats as "absent".
    pub fn is_empty_scalar(&self) -> bool {
        matches!(self, Node::Scalar(text) if text.is_empty())
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Node::Scalar(text) => Some(text),
            Node::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&Branch> {
        match self {
            Node::Branch(branch) => Some(branch),
            Node::Scalar(_) => None,
        }
    }

    /// Human-readable variant name for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Scalar(_) => "scalar",
            Node::Branch(_) => "branch",
        }
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Scalar(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Scalar(text)
    }
}

impl From<Branch> for Node {
    fn from(branch: Branch) -> Self {
        Node::Branch(branch)
    }
}

/// Converts a JSON document into a node tree.
///
/// Strings map to scalars verbatim, numbers and booleans to their textual
/// form and `null` to the empty scalar. Arrays become branches keyed by
/// position (`"0"`, `"1"`, ...).
impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Node::Scalar(String::new()),
            serde_json::Value::Bool(b) => Node::Scalar(b.to_string()),
            serde_json::Value::Number(n) => Node::Scalar(n.to_string()),
            serde_json::Value::String(s) => Node::Scalar(s),
            serde_json::Value::Array(items) => Node::Branch(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| (i.to_string(), Node::from(item)))
                    .collect(),
            ),
            serde_json::Value::Object(map) => Node::Branch(
                map.into_iter()
                    .map(|(key, item)| (key, Node::from(item)))
                    .collect(),
            ),
        }
    }
}

// ──────────────────────────────────────────────
// Branch
// ──────────────────────────────────────────────

/// Insertion-ordered children of a branch node. Keys are unique.
///
/// Equality compares keys and children, not insertion order.
#[derive(Debug, Clone, Default)]
pub struct Branch {
    entries: Vec<(String, Node)>,
}

impl PartialEq for Branch {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, node)| other.get(key).is_some_and(|theirs| theirs == node))
    }
}

impl Eq for Branch {}

impl Branch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a child, replacing and returning any previous child under `key`.
    pub fn insert(&mut self, key: impl Into<String>, node: Node) -> Option<Node> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, node)),
            None => {
                self.entries.push((key, node));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, n)| n)
    }

    /// Returns the child under `key`, inserting `default()` first if absent.
    pub fn get_or_insert_with(&mut self, key: &str, default: impl FnOnce() -> Node) -> &mut Node {
        let index = match self.entries.iter().position(|(k, _)| k == key) {
            Some(index) => index,
            None => {
                self.entries.push((key.to_string(), default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), n))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for Branch {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        let mut branch = Branch::new();
        for (key, node) in iter {
            branch.insert(key, node);
        }
        branch
    }
}

impl<'a> IntoIterator for &'a Branch {
    type Item = (&'a str, &'a Node);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a Node)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl Serialize for Branch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, node) in &self.entries {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Branch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BranchVisitor;

        impl<'de> Visitor<'de> for BranchVisitor {
            type Value = Branch;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of node keys to nodes")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Branch, A::Error> {
                let mut branch = Branch::new();
                while let Some((key, node)) = access.next_entry::<String, Node>()? {
                    branch.insert(key, node);
                }
                Ok(branch)
            }
        }

        deserializer.deserialize_map(BranchVisitor)
    }
}
