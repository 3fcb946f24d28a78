//! formbind-tree: the intermediate node tree consumed by the decoder.
//!
//! Flat form data (`a[b][0]=x&a.c=y`) is turned into a hierarchy of
//! [`Node`]s: each node is either a single text value or a branch of
//! named children. The tree carries no type information; the decoder in
//! `formbind-core` walks it against a typed destination.
//!
//! Trees come from three places:
//! - [`Node::from_query`] for a raw `application/x-www-form-urlencoded` payload,
//! - [`Node::from_pairs`] for already decoded key/value pairs,
//! - `Node::from(serde_json::Value)` for JSON-shaped fixtures.

pub mod build;
pub mod error;
pub mod node;
pub mod path;

pub use error::TreeError;
pub use node::{Branch, Node};
pub use path::parse_path;
