//! Building node trees from flat key/value pairs.

use percent_encoding::percent_decode_str;
use std::borrow::Cow;

use crate::error::TreeError;
use crate::node::{Branch, Node};
use crate::path::parse_path;

impl Node {
    /// Build a branch node from flat `(key, value)` pairs.
    ///
    /// Keys are split with [`parse_path`]. When the same path appears more
    /// than once the first value wins. A path that is used both as a value
    /// and as the parent of other keys is a [`TreeError::Conflict`].
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Node, TreeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut root = Branch::new();
        for (key, value) in pairs {
            let path = parse_path(key.as_ref())?;
            insert_path(&mut root, &path, value.into())?;
        }
        Ok(Node::Branch(root))
    }

    /// Build a branch node from a raw `application/x-www-form-urlencoded`
    /// payload.
    ///
    /// Percent escapes must be well formed and `;` is not accepted as a
    /// pair separator. `+` decodes to a space. Decoded keys and values must
    /// be valid UTF-8; they are never repaired with replacement characters.
    pub fn from_query(raw: &str) -> Result<Node, TreeError> {
        validate_query(raw)?;
        let pairs = raw
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                Ok((decode_component(key)?, decode_component(value)?))
            })
            .collect::<Result<Vec<_>, TreeError>>()?;
        Node::from_pairs(pairs)
    }
}

fn decode_component(text: &str) -> Result<String, TreeError> {
    let spaced = text.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| TreeError::MalformedQuery {
            reason: format!("invalid UTF-8 in {:?}", text),
        })
}

fn insert_path(root: &mut Branch, path: &[String], value: String) -> Result<(), TreeError> {
    let Some((leaf, parents)) = path.split_last() else {
        return Ok(());
    };

    let mut branch = root;
    for (depth, segment) in parents.iter().enumerate() {
        let child = branch.get_or_insert_with(segment, Node::branch);
        branch = match child {
            Node::Branch(inner) => inner,
            Node::Scalar(_) => {
                return Err(TreeError::Conflict {
                    path: path[..=depth].join("."),
                })
            }
        };
    }

    match branch.get(leaf) {
        None => {
            branch.insert(leaf.clone(), Node::Scalar(value));
        }
        Some(Node::Scalar(_)) => {}
        Some(Node::Branch(_)) => {
            return Err(TreeError::Conflict {
                path: path.join("."),
            })
        }
    }
    Ok(())
}

fn validate_query(raw: &str) -> Result<(), TreeError> {
    let bytes = raw.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        match b {
            b';' => {
                return Err(TreeError::MalformedQuery {
                    reason: "invalid semicolon separator".to_string(),
                })
            }
            b'%' => {
                let escape = bytes.get(i + 1..i + 3);
                if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                    let end = (i + 3).min(bytes.len());
                    return Err(TreeError::MalformedQuery {
                        reason: format!(
                            "invalid URL escape {:?}",
                            String::from_utf8_lossy(&bytes[i..end])
                        ),
                    });
                }
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_pairs_nested() {
        let node = Node::from_pairs([
            ("name", "Ada"),
            ("address[city]", "London"),
            ("tags.0", "x"),
            ("tags.1", "y"),
        ])
        .unwrap();

        assert_eq!(
            node,
            Node::from(json!({
                "name": "Ada",
                "address": {"city": "London"},
                "tags": {"0": "x", "1": "y"}
            }))
        );
    }

    #[test]
    fn test_first_value_wins() {
        let node = Node::from_pairs([("a", "1"), ("a", "2"), ("b[0]", "x"), ("b.0", "y")]).unwrap();
        let branch = node.as_branch().unwrap();
        assert_eq!(branch.get("a").and_then(Node::as_scalar), Some("1"));
        let b = branch.get("b").and_then(Node::as_branch).unwrap();
        assert_eq!(b.get("0").and_then(Node::as_scalar), Some("x"));
    }

    #[test]
    fn test_value_then_group_conflicts() {
        let err = Node::from_pairs([("a", "1"), ("a.b", "2")]).unwrap_err();
        assert_eq!(
            err,
            TreeError::Conflict {
                path: "a".to_string()
            }
        );
    }

    #[test]
    fn test_group_then_value_conflicts() {
        let err = Node::from_pairs([("a[b]", "1"), ("a", "2")]).unwrap_err();
        assert_eq!(
            err,
            TreeError::Conflict {
                path: "a".to_string()
            }
        );
    }

    #[test]
    fn test_from_query_decodes_percent_and_plus() {
        let node = Node::from_query("greeting=hello+world&a%5Bb%5D=caf%C3%A9").unwrap();
        let branch = node.as_branch().unwrap();
        assert_eq!(
            branch.get("greeting").and_then(Node::as_scalar),
            Some("hello world")
        );
        let a = branch.get("a").and_then(Node::as_branch).unwrap();
        assert_eq!(a.get("b").and_then(Node::as_scalar), Some("café"));
    }

    #[test]
    fn test_from_query_empty_payload() {
        let node = Node::from_query("").unwrap();
        assert!(node.as_branch().unwrap().is_empty());
    }

    #[test]
    fn test_from_query_rejects_bad_escape() {
        match Node::from_query("a=%zz") {
            Err(TreeError::MalformedQuery { reason }) => {
                assert!(reason.contains("%zz"), "reason: {}", reason)
            }
            other => panic!("expected MalformedQuery, got {:?}", other),
        }
        assert!(Node::from_query("a=%4").is_err());
    }

    #[test]
    fn test_from_query_rejects_invalid_utf8() {
        match Node::from_query("data=%FF%00") {
            Err(TreeError::MalformedQuery { reason }) => {
                assert_eq!(reason, r#"invalid UTF-8 in "%FF%00""#)
            }
            other => panic!("expected MalformedQuery, got {:?}", other),
        }
        assert!(Node::from_query("%C3=x").is_err());
    }

    #[test]
    fn test_from_query_keeps_encoded_plus_and_nul() {
        let node = Node::from_query("sum=1%2B1&raw=a%00b&k=%E2%82%AC").unwrap();
        let branch = node.as_branch().unwrap();
        assert_eq!(branch.get("sum").and_then(Node::as_scalar), Some("1+1"));
        assert_eq!(branch.get("raw").and_then(Node::as_scalar), Some("a\0b"));
        assert_eq!(branch.get("k").and_then(Node::as_scalar), Some("\u{20ac}"));
    }

    #[test]
    fn test_from_query_skips_empty_pairs() {
        let node = Node::from_query("&a=1&&b=2&").unwrap();
        assert_eq!(node, Node::from(json!({"a": "1", "b": "2"})));
    }

    #[test]
    fn test_from_query_rejects_semicolon() {
        assert!(matches!(
            Node::from_query("a=1;b=2"),
            Err(TreeError::MalformedQuery { .. })
        ));
    }
}
