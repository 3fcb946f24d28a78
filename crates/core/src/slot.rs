//! Destination slots: the capability traits the decoder dispatches on.
//!
//! Every type the decoder can populate implements [`Hydrate`]. A slot
//! answers [`Hydrate::kind`] once per visit with one of a closed set of
//! [`Kind`]s, and the decoder applies that kind's population rules.
//! Containers expose their children through the object-safe traits
//! below so the decoder never needs to know concrete element types.

use formbind_tree::Node;
use std::str::FromStr;
use time::OffsetDateTime;

use crate::engine::Hydrator;
use crate::error::Result;
use crate::field::Field;

// ──────────────────────────────────────────────
// Hydrate
// ──────────────────────────────────────────────

/// A writable destination the decoder can fill in place.
pub trait Hydrate {
    /// Report how this slot is populated.
    ///
    /// Indirections may allocate here: `Option<T>` becomes `Some` before
    /// handing out its contents.
    fn kind(&mut self) -> Kind<'_>;

    /// Overwrite the slot with its zero value.
    fn reset(&mut self);

    /// The zero value: what an empty input produces and what new list
    /// elements start as.
    fn zero() -> Self
    where
        Self: Sized;

    /// A fresh value to decode `node` into when a map has no entry yet.
    ///
    /// Concrete types start from [`Hydrate::zero`]. Untyped destinations
    /// override this to pick a shape from the node.
    fn fresh(_node: &Node) -> Self
    where
        Self: Sized,
    {
        Self::zero()
    }

    /// Type name used in error messages.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// The closed set of destination kinds.
pub enum Kind<'a> {
    /// A pointer-like wrapper, already allocated, to decode through.
    Indirect(&'a mut dyn Hydrate),
    Timestamp(&'a mut dyn Timestamp),
    Record(&'a mut dyn Record),
    /// A growable list.
    List(&'a mut dyn GrowableSequence),
    /// A fixed-capacity list.
    Array(&'a mut dyn Sequence),
    /// A borrowed, fixed-capacity view. Behaves like `Array` but is
    /// rejected as a decode root.
    Slice(&'a mut dyn Sequence),
    Map(&'a mut dyn Map),
    Scalar(Scalar<'a>),
    /// No text representation; decoding into it is an error.
    Unsupported(&'static str),
}

impl Kind<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Indirect(_) => "indirect",
            Kind::Timestamp(_) => "timestamp",
            Kind::Record(_) => "record",
            Kind::List(_) => "list",
            Kind::Array(_) => "array",
            Kind::Slice(_) => "slice",
            Kind::Map(_) => "map",
            Kind::Scalar(scalar) => scalar.name(),
            Kind::Unsupported(name) => *name,
        }
    }
}

// ──────────────────────────────────────────────
// Scalars
// ──────────────────────────────────────────────

/// Primitive leaf destinations.
pub enum Scalar<'a> {
    Bool(&'a mut bool),
    Int(&'a mut dyn ParseText),
    Uint(&'a mut dyn ParseText),
    Float(&'a mut dyn ParseText),
    Text(&'a mut String),
}

impl Scalar<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::Uint(_) => "uint",
            Scalar::Float(_) => "float",
            Scalar::Text(_) => "string",
        }
    }
}

/// Width-aware numeric assignment from text.
pub trait ParseText {
    /// Parse `text` at this type's width and store it. Returns false and
    /// leaves the value untouched on failure.
    fn parse_assign(&mut self, text: &str) -> bool;
}

impl<T: FromStr> ParseText for T {
    fn parse_assign(&mut self, text: &str) -> bool {
        match text.parse() {
            Ok(value) => {
                *self = value;
                true
            }
            Err(_) => false,
        }
    }
}

// ──────────────────────────────────────────────
// Containers
// ──────────────────────────────────────────────

/// A record with a fixed set of named members.
pub trait Record {
    /// Member descriptors, in declaration order.
    fn fields(&self) -> &'static [Field];

    /// The slot for a member, by its declared (not external) name.
    /// `None` marks a member that exists but cannot be assigned.
    fn field_mut(&mut self, member: &str) -> Option<&mut dyn Hydrate>;
}

/// An indexed sequence.
pub trait Sequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Hydrate>;
}

/// A sequence that can be extended with zero-valued elements.
pub trait GrowableSequence: Sequence {
    /// Append `additional` zero values.
    fn grow(&mut self, additional: usize);

    /// The underlying bytes, when this is a byte sequence.
    fn bytes_mut(&mut self) -> Option<&mut Vec<u8>> {
        None
    }
}

/// Typed view of an associative container used by [`Hydrator`] to merge
/// entries.
pub trait Entries {
    type Key: Hydrate;
    type Value: Hydrate + Clone;

    fn existing(&self, key: &Self::Key) -> Option<&Self::Value>;

    fn put(&mut self, key: Self::Key, value: Self::Value);
}

/// Object-safe map capability handed out by [`Kind::Map`].
pub trait Map {
    /// Decode `node` into the entry named by `key`.
    fn hydrate_entry(&mut self, hydrator: &mut Hydrator, key: &str, node: &Node) -> Result<()>;
}

impl<M: Entries> Map for M {
    fn hydrate_entry(&mut self, hydrator: &mut Hydrator, key: &str, node: &Node) -> Result<()> {
        hydrator.hydrate_entry(self, key, node)
    }
}

// ──────────────────────────────────────────────
// Timestamps
// ──────────────────────────────────────────────

/// A destination convertible from the canonical timestamp representation.
pub trait Timestamp {
    fn set(&mut self, at: OffsetDateTime);
}
