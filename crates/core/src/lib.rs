//! formbind-core: type-directed decoding of form data into Rust values.
//!
//! A [`Node`] tree (see `formbind-tree`) is walked against a destination
//! implementing [`Hydrate`]. The destination's [`Kind`] decides how each
//! node is consumed: records match keys to fields, lists grow to the
//! highest index seen, maps merge entries, scalars parse text and
//! timestamps try a fixed list of layouts. Decoding writes in place and
//! stops at the first error.
//!
//! # Public API
//!
//! - [`Decoder`] -- configurable entry point
//! - [`decode()`], [`decode_str()`], [`decode_pairs()`] -- default-config shorthands
//! - [`form_record!`] -- declare a struct usable as a record destination
//! - [`Value`] -- untyped map values
//! - [`DecodeError`] -- the single error type

pub mod coerce;
pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod impls;
pub mod slot;
pub mod timestamp;
pub mod value;

// ── Convenience re-exports ───────────────────────────────────────────

pub use config::DecoderConfig;
pub use engine::Hydrator;
pub use error::{DecodeError, Primitive, Result};
pub use field::{Field, FieldInfo};
pub use formbind_tree::{Branch, Node, TreeError};
pub use impls::ZERO_TIMESTAMP;
pub use slot::{
    Entries, GrowableSequence, Hydrate, Kind, Map, ParseText, Record, Scalar, Sequence, Timestamp,
};
pub use value::Value;

use tracing::debug_span;

/// Decodes node trees into destinations under a fixed configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn with_max_index(mut self, max_index: usize) -> Self {
        self.config.max_index = max_index;
        self
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Populate `dst` from `node`.
    ///
    /// Fields, entries and elements not mentioned by the tree keep their
    /// current values. On error `dst` may be partially updated.
    pub fn decode<D: Hydrate>(&self, dst: &mut D, node: &Node) -> Result<()> {
        let type_name = dst.type_name();
        let _span = debug_span!("decode", ty = type_name).entered();

        if let Kind::Slice(_) = dst.kind() {
            return Err(DecodeError::SequenceRoot { type_name });
        }
        Hydrator::new(&self.config).hydrate(dst, node)
    }

    /// Parse a raw urlencoded payload and decode it.
    pub fn decode_str<D: Hydrate>(&self, dst: &mut D, query: &str) -> Result<()> {
        let node = Node::from_query(query)?;
        self.decode(dst, &node)
    }

    /// Build a tree from decoded key/value pairs and decode it.
    pub fn decode_pairs<D, I, K, V>(&self, dst: &mut D, pairs: I) -> Result<()>
    where
        D: Hydrate,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let node = Node::from_pairs(pairs)?;
        self.decode(dst, &node)
    }
}

/// Decode `node` into `dst` with the default configuration.
pub fn decode<D: Hydrate>(dst: &mut D, node: &Node) -> Result<()> {
    Decoder::default().decode(dst, node)
}

/// Decode a raw urlencoded payload into `dst` with the default configuration.
pub fn decode_str<D: Hydrate>(dst: &mut D, query: &str) -> Result<()> {
    Decoder::default().decode_str(dst, query)
}

/// Decode key/value pairs into `dst` with the default configuration.
pub fn decode_pairs<D, I, K, V>(dst: &mut D, pairs: I) -> Result<()>
where
    D: Hydrate,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    Decoder::default().decode_pairs(dst, pairs)
}
