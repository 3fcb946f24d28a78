use formbind_tree::TreeError;
use std::fmt;

/// Primitive families a scalar can be coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Bool,
    Int,
    Uint,
    Float,
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Primitive::Bool => "bool",
            Primitive::Int => "int",
            Primitive::Uint => "uint",
            Primitive::Float => "float",
        })
    }
}

/// The first failure of a decode. Every variant aborts the whole decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The destination has no text representation (raw pointers, or a
    /// non-scalar type used as a map key).
    #[error("{type_name} has unsupported kind {kind}")]
    UnsupportedKind {
        type_name: &'static str,
        kind: &'static str,
    },

    /// A branch key matches no visible field of the record.
    #[error("{key} doesn't exist in {type_name}")]
    UnknownField { key: String, type_name: &'static str },

    /// A branch key names a field that refuses assignment.
    #[error("{key} cannot be set in {type_name}")]
    UnwritableField { key: String, type_name: &'static str },

    /// A list key is not a non-negative base-10 integer.
    #[error("{key} is not a valid index for type {type_name}")]
    InvalidIndex { key: String, type_name: &'static str },

    /// A fixed-size list was addressed past its end.
    #[error("index is above array size: {index} >= {len} for type {type_name}")]
    IndexOutOfBounds {
        index: usize,
        len: usize,
        type_name: &'static str,
    },

    /// A growable list was addressed past the configured index limit.
    #[error("index {index} exceeds the limit of {limit} for type {type_name}")]
    IndexLimit {
        index: usize,
        limit: usize,
        type_name: &'static str,
    },

    /// Text did not parse as the destination primitive.
    #[error("could not parse {primitive} from {text}")]
    Parse { primitive: Primitive, text: String },

    /// Text matched none of the accepted timestamp layouts.
    #[error("cannot decode string `{text}` as {type_name}")]
    Timestamp { text: String, type_name: &'static str },

    /// The destination needs keyed children but the node is a single value.
    #[error("{type_name} expects keyed values, got a single value")]
    ExpectedBranch { type_name: &'static str },

    /// The destination needs a single value but the node has keyed children.
    #[error("{type_name} expects a single value, got keyed values")]
    ExpectedScalar { type_name: &'static str },

    /// The node tree nests deeper than the decoder allows.
    #[error("input too deeply nested: limit is {limit}")]
    TooDeep { limit: usize },

    /// A borrowed slice was passed as the decode root.
    #[error("could not decode directly into slice {type_name}; use a Vec or an array")]
    SequenceRoot { type_name: &'static str },

    /// The raw input could not be turned into a node tree.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
