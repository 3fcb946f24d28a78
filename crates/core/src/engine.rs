//! The hydration engine.
//!
//! [`Hydrator`] walks a destination and a node tree in lock-step. Each
//! visit asks the destination for its [`Kind`] and applies that kind's
//! rules; children are visited recursively, one tree level per nesting
//! level, up to the configured depth.

use formbind_tree::{Branch, Node};
use tracing::trace;

use crate::coerce;
use crate::config::DecoderConfig;
use crate::error::{DecodeError, Result};
use crate::slot::{Entries, GrowableSequence, Hydrate, Kind, Record, Sequence};
use crate::timestamp;

/// Recursive decoder state for a single decode call.
#[derive(Debug)]
pub struct Hydrator {
    depth: usize,
    max_depth: usize,
    max_index: usize,
}

impl Hydrator {
    pub fn new(config: &DecoderConfig) -> Self {
        Self {
            depth: 0,
            max_depth: config.max_depth,
            max_index: config.max_index,
        }
    }

    /// Populate `dst` from `node`.
    pub fn hydrate(&mut self, dst: &mut dyn Hydrate, node: &Node) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(DecodeError::TooDeep {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = self.dispatch(dst, node);
        self.depth -= 1;
        result
    }

    fn dispatch(&mut self, dst: &mut dyn Hydrate, node: &Node) -> Result<()> {
        let type_name = dst.type_name();
        let kind = dst.kind();
        trace!(ty = type_name, kind = kind.name(), depth = self.depth, "hydrate");
        match kind {
            Kind::Indirect(inner) => self.hydrate(inner, node),
            // The empty string means "absent" for every other kind, containers included.
            _ if node.is_empty_scalar() => {
                trace!(ty = type_name, "empty value, resetting to zero");
                dst.reset();
                Ok(())
            }
            Kind::Timestamp(slot) => {
                let text = expect_scalar(node, type_name)?;
                let (layout, at) =
                    timestamp::parse(text).ok_or_else(|| DecodeError::Timestamp {
                        text: text.to_string(),
                        type_name,
                    })?;
                trace!(ty = type_name, layout, "timestamp layout matched");
                slot.set(at);
                Ok(())
            }
            Kind::Record(record) => self.populate_record(record, type_name, node),
            Kind::List(list) => self.populate_list(list, type_name, node),
            Kind::Array(array) | Kind::Slice(array) => self.populate_fixed(array, type_name, node),
            Kind::Map(map) => {
                let branch = expect_branch(node, type_name)?;
                for (key, child) in branch.iter() {
                    map.hydrate_entry(self, key, child)?;
                }
                Ok(())
            }
            Kind::Scalar(scalar) => coerce::assign(scalar, expect_scalar(node, type_name)?),
            Kind::Unsupported(kind) => Err(DecodeError::UnsupportedKind { type_name, kind }),
        }
    }

    fn populate_record(
        &mut self,
        record: &mut dyn Record,
        type_name: &'static str,
        node: &Node,
    ) -> Result<()> {
        let branch = expect_branch(node, type_name)?;
        for (key, child) in branch.iter() {
            let field = record
                .fields()
                .iter()
                .find(|field| {
                    let info = field.info();
                    info.visible && info.key == key
                })
                .ok_or_else(|| DecodeError::UnknownField {
                    key: key.to_string(),
                    type_name,
                })?;
            let slot = record
                .field_mut(field.member)
                .ok_or_else(|| DecodeError::UnwritableField {
                    key: key.to_string(),
                    type_name,
                })?;
            self.hydrate(slot, child)?;
        }
        Ok(())
    }

    fn populate_list(
        &mut self,
        list: &mut dyn GrowableSequence,
        type_name: &'static str,
        node: &Node,
    ) -> Result<()> {
        // Byte sequences may also arrive as one opaque value.
        if let Node::Scalar(text) = node {
            if let Some(bytes) = list.bytes_mut() {
                bytes.clear();
                bytes.extend_from_slice(text.as_bytes());
                return Ok(());
            }
        }

        let branch = expect_branch(node, type_name)?;
        for (key, child) in branch.iter() {
            let index = parse_index(key, type_name)?;
            let mut len = list.len();
            if index >= len {
                if index > self.max_index {
                    return Err(DecodeError::IndexLimit {
                        index,
                        limit: self.max_index,
                        type_name,
                    });
                }
                let additional = index - len + 1;
                trace!(ty = type_name, len, additional, "growing list");
                list.grow(additional);
                len = list.len();
            }
            let element = list
                .element_mut(index)
                .ok_or(DecodeError::IndexOutOfBounds {
                    index,
                    len,
                    type_name,
                })?;
            self.hydrate(element, child)?;
        }
        Ok(())
    }

    fn populate_fixed(
        &mut self,
        array: &mut dyn Sequence,
        type_name: &'static str,
        node: &Node,
    ) -> Result<()> {
        let branch = expect_branch(node, type_name)?;
        for (key, child) in branch.iter() {
            let index = parse_index(key, type_name)?;
            let len = array.len();
            let element = array
                .element_mut(index)
                .ok_or(DecodeError::IndexOutOfBounds {
                    index,
                    len,
                    type_name,
                })?;
            self.hydrate(element, child)?;
        }
        Ok(())
    }

    /// Decode one map entry.
    ///
    /// The key is coerced as a scalar. An existing entry is cloned and
    /// decoded into, so repeated decodes merge instead of replacing; the
    /// live entry is only replaced once the clone decoded successfully.
    pub fn hydrate_entry<M>(&mut self, map: &mut M, key: &str, node: &Node) -> Result<()>
    where
        M: Entries + ?Sized,
    {
        let mut map_key = <M::Key as Hydrate>::zero();
        coerce::assign_text(&mut map_key, key)?;

        let mut value = match map.existing(&map_key) {
            Some(current) => current.clone(),
            None => <M::Value as Hydrate>::fresh(node),
        };
        self.hydrate(&mut value, node)?;
        map.put(map_key, value);
        Ok(())
    }
}

fn expect_branch<'n>(node: &'n Node, type_name: &'static str) -> Result<&'n Branch> {
    node.as_branch()
        .ok_or(DecodeError::ExpectedBranch { type_name })
}

fn expect_scalar<'n>(node: &'n Node, type_name: &'static str) -> Result<&'n str> {
    node.as_scalar()
        .ok_or(DecodeError::ExpectedScalar { type_name })
}

fn parse_index(key: &str, type_name: &'static str) -> Result<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::InvalidIndex {
            key: key.to_string(),
            type_name,
        });
    }
    key.parse().map_err(|_| DecodeError::InvalidIndex {
        key: key.to_string(),
        type_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn hydrate<T: Hydrate>(dst: &mut T, node: serde_json::Value) -> Result<()> {
        Hydrator::new(&DecoderConfig::default()).hydrate(dst, &Node::from(node))
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("0", "T").unwrap(), 0);
        assert_eq!(parse_index("007", "T").unwrap(), 7);
        for key in ["", "-1", "+1", "x", "1.0", "99999999999999999999999"] {
            assert!(
                matches!(parse_index(key, "T"), Err(DecodeError::InvalidIndex { .. })),
                "{:?}",
                key
            );
        }
    }

    #[test]
    fn test_indirection_is_allocated() {
        let mut slot: Option<Box<u32>> = None;
        hydrate(&mut slot, json!("12")).unwrap();
        assert_eq!(slot.as_deref(), Some(&12));
    }

    #[test]
    fn test_empty_value_through_indirection_zeroes_inner() {
        let mut slot: Option<u32> = None;
        hydrate(&mut slot, json!("")).unwrap();
        assert_eq!(slot, Some(0));
    }

    #[test]
    fn test_depth_limit() {
        let mut nested: Vec<Vec<Vec<u8>>> = Vec::new();
        let node = Node::from(json!({"0": {"0": {"0": "1"}}}));

        let mut shallow = Hydrator::new(&DecoderConfig {
            max_depth: 3,
            ..DecoderConfig::default()
        });
        assert_eq!(
            shallow.hydrate(&mut nested, &node),
            Err(DecodeError::TooDeep { limit: 3 })
        );

        let mut enough = Hydrator::new(&DecoderConfig {
            max_depth: 4,
            ..DecoderConfig::default()
        });
        enough.hydrate(&mut nested, &node).unwrap();
        assert_eq!(nested, vec![vec![vec![1]]]);
    }

    #[test]
    fn test_depth_is_released_between_siblings() {
        let mut lists: Vec<Vec<u8>> = Vec::new();
        let node = Node::from(json!({"0": {"0": "1"}, "1": {"0": "2"}, "2": {"0": "3"}}));
        let mut hydrator = Hydrator::new(&DecoderConfig {
            max_depth: 3,
            ..DecoderConfig::default()
        });
        hydrator.hydrate(&mut lists, &node).unwrap();
        assert_eq!(lists, vec![vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn test_index_limit() {
        let mut list: Vec<u8> = Vec::new();
        let mut hydrator = Hydrator::new(&DecoderConfig {
            max_index: 10,
            ..DecoderConfig::default()
        });
        let err = hydrator
            .hydrate(&mut list, &Node::from(json!({"11": "1"})))
            .unwrap_err();
        assert!(matches!(err, DecodeError::IndexLimit { index: 11, limit: 10, .. }));
        assert!(list.is_empty());
    }

    #[test]
    fn test_index_limit_only_bounds_growth() {
        let mut list = vec![0u8; 10];
        let mut hydrator = Hydrator::new(&DecoderConfig {
            max_index: 5,
            ..DecoderConfig::default()
        });
        hydrator
            .hydrate(&mut list, &Node::from(json!({"7": "1"})))
            .unwrap();
        assert_eq!(list.len(), 10);
        assert_eq!(list[7], 1);

        let err = hydrator
            .hydrate(&mut list, &Node::from(json!({"10": "1"})))
            .unwrap_err();
        assert!(matches!(err, DecodeError::IndexLimit { index: 10, limit: 5, .. }));
        assert_eq!(list.len(), 10);
    }

    #[test]
    fn test_empty_value_inside_box_resets_inner() {
        let mut boxed: Box<Vec<u8>> = Box::new(vec![1, 2]);
        hydrate(&mut boxed, json!("")).unwrap();
        assert!(boxed.is_empty());
    }

    #[test]
    fn test_scalar_into_list_is_structural_error() {
        let mut list: Vec<u32> = Vec::new();
        assert!(matches!(
            hydrate(&mut list, json!("1")),
            Err(DecodeError::ExpectedBranch { .. })
        ));
    }

    #[test]
    fn test_branch_into_scalar_is_structural_error() {
        let mut n = 0i32;
        assert!(matches!(
            hydrate(&mut n, json!({"a": "1"})),
            Err(DecodeError::ExpectedScalar { .. })
        ));
    }

    #[test]
    fn test_unsupported_kind() {
        let mut pointer: *const u8 = std::ptr::null();
        let err = hydrate(&mut pointer, json!("1")).unwrap_err();
        assert_eq!(err.to_string(), "*const u8 has unsupported kind raw pointer");
    }

    #[test]
    fn test_map_with_integer_keys() {
        let mut scores: BTreeMap<u16, i32> = BTreeMap::new();
        hydrate(&mut scores, json!({"1": "-5", "20": "7"})).unwrap();
        assert_eq!(scores, BTreeMap::from([(1, -5), (20, 7)]));
    }

    #[test]
    fn test_map_key_parse_failure() {
        let mut scores: BTreeMap<u16, i32> = BTreeMap::new();
        let err = hydrate(&mut scores, json!({"one": "1"})).unwrap_err();
        assert_eq!(err.to_string(), "could not parse uint from one");
    }

    #[test]
    fn test_failed_entry_keeps_previous_value() {
        let mut counts: BTreeMap<String, Vec<u8>> =
            BTreeMap::from([("a".to_string(), vec![1, 2])]);
        assert!(hydrate(&mut counts, json!({"a": {"0": "x"}})).is_err());
        assert_eq!(counts["a"], vec![1, 2]);
    }
}
