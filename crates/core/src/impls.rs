//! [`Hydrate`] for standard library and `time` types.

use formbind_tree::Node;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use time::macros::{date, datetime};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

use crate::slot::{
    Entries, GrowableSequence, Hydrate, Kind, Scalar, Sequence, Timestamp,
};

// ──────────────────────────────────────────────
// Scalars
// ──────────────────────────────────────────────

macro_rules! numeric_slot {
    ($variant:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl Hydrate for $ty {
                fn kind(&mut self) -> Kind<'_> {
                    Kind::Scalar(Scalar::$variant(self))
                }

                fn reset(&mut self) {
                    *self = <$ty>::default();
                }

                fn zero() -> Self {
                    <$ty>::default()
                }
            }
        )+
    };
}

numeric_slot!(Int => i8, i16, i32, i64, i128, isize);
numeric_slot!(Uint => u8, u16, u32, u64, u128, usize);
numeric_slot!(Float => f32, f64);

impl Hydrate for bool {
    fn kind(&mut self) -> Kind<'_> {
        Kind::Scalar(Scalar::Bool(self))
    }

    fn reset(&mut self) {
        *self = false;
    }

    fn zero() -> Self {
        false
    }
}

impl Hydrate for String {
    fn kind(&mut self) -> Kind<'_> {
        Kind::Scalar(Scalar::Text(self))
    }

    fn reset(&mut self) {
        self.clear();
    }

    fn zero() -> Self {
        String::new()
    }
}

// ──────────────────────────────────────────────
// Indirections
// ──────────────────────────────────────────────

impl<T: Hydrate> Hydrate for Option<T> {
    fn kind(&mut self) -> Kind<'_> {
        Kind::Indirect(self.get_or_insert_with(T::zero))
    }

    fn reset(&mut self) {
        *self = None;
    }

    fn zero() -> Self {
        None
    }

    fn fresh(node: &Node) -> Self {
        Some(T::fresh(node))
    }
}

impl<T: Hydrate> Hydrate for Box<T> {
    fn kind(&mut self) -> Kind<'_> {
        Kind::Indirect(&mut **self)
    }

    fn reset(&mut self) {
        **self = T::zero();
    }

    fn zero() -> Self {
        Box::new(T::zero())
    }

    fn fresh(node: &Node) -> Self {
        Box::new(T::fresh(node))
    }
}

// ──────────────────────────────────────────────
// Sequences
// ──────────────────────────────────────────────

impl<T: Hydrate + 'static> Hydrate for Vec<T> {
    fn kind(&mut self) -> Kind<'_> {
        Kind::List(self)
    }

    fn reset(&mut self) {
        self.clear();
    }

    fn zero() -> Self {
        Vec::new()
    }
}

impl<T: Hydrate + 'static> Sequence for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Hydrate> {
        self.get_mut(index).map(|element| element as &mut dyn Hydrate)
    }
}

impl<T: Hydrate + 'static> GrowableSequence for Vec<T> {
    fn grow(&mut self, additional: usize) {
        self.extend(std::iter::repeat_with(T::zero).take(additional));
    }

    fn bytes_mut(&mut self) -> Option<&mut Vec<u8>> {
        (self as &mut dyn Any).downcast_mut::<Vec<u8>>()
    }
}

impl<T: Hydrate, const N: usize> Hydrate for [T; N] {
    fn kind(&mut self) -> Kind<'_> {
        Kind::Array(self)
    }

    fn reset(&mut self) {
        self.iter_mut().for_each(|element| element.reset());
    }

    fn zero() -> Self {
        std::array::from_fn(|_| T::zero())
    }
}

impl<T: Hydrate, const N: usize> Sequence for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Hydrate> {
        self.get_mut(index).map(|element| element as &mut dyn Hydrate)
    }
}

/// A borrowed slice has a fixed length. It is accepted as a nested field
/// but not as the root of a decode.
impl<T: Hydrate> Hydrate for &mut [T] {
    fn kind(&mut self) -> Kind<'_> {
        Kind::Slice(self)
    }

    fn reset(&mut self) {
        self.iter_mut().for_each(|element| element.reset());
    }

    fn zero() -> Self {
        &mut []
    }
}

impl<T: Hydrate> Sequence for &mut [T] {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Hydrate> {
        self.get_mut(index).map(|element| element as &mut dyn Hydrate)
    }
}

// ──────────────────────────────────────────────
// Maps
// ──────────────────────────────────────────────

impl<K, V, S> Hydrate for HashMap<K, V, S>
where
    K: Hydrate + Eq + Hash,
    V: Hydrate + Clone,
    S: BuildHasher + Default,
{
    fn kind(&mut self) -> Kind<'_> {
        Kind::Map(self)
    }

    fn reset(&mut self) {
        self.clear();
    }

    fn zero() -> Self {
        HashMap::default()
    }
}

impl<K, V, S> Entries for HashMap<K, V, S>
where
    K: Hydrate + Eq + Hash,
    V: Hydrate + Clone,
    S: BuildHasher + Default,
{
    type Key = K;
    type Value = V;

    fn existing(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn put(&mut self, key: K, value: V) {
        self.insert(key, value);
    }
}

impl<K, V> Hydrate for BTreeMap<K, V>
where
    K: Hydrate + Ord,
    V: Hydrate + Clone,
{
    fn kind(&mut self) -> Kind<'_> {
        Kind::Map(self)
    }

    fn reset(&mut self) {
        self.clear();
    }

    fn zero() -> Self {
        BTreeMap::new()
    }
}

impl<K, V> Entries for BTreeMap<K, V>
where
    K: Hydrate + Ord,
    V: Hydrate + Clone,
{
    type Key = K;
    type Value = V;

    fn existing(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn put(&mut self, key: K, value: V) {
        self.insert(key, value);
    }
}

// ──────────────────────────────────────────────
// Timestamps
// ──────────────────────────────────────────────

/// Zero timestamp: midnight UTC on January 1st of year 1.
pub const ZERO_TIMESTAMP: OffsetDateTime = datetime!(0001-01-01 0:00 UTC);

macro_rules! timestamp_slot {
    ($ty:ty, $zero:expr, |$at:ident| $convert:expr) => {
        impl Timestamp for $ty {
            fn set(&mut self, $at: OffsetDateTime) {
                *self = $convert;
            }
        }

        impl Hydrate for $ty {
            fn kind(&mut self) -> Kind<'_> {
                Kind::Timestamp(self)
            }

            fn reset(&mut self) {
                *self = $zero;
            }

            fn zero() -> Self {
                $zero
            }
        }
    };
}

timestamp_slot!(OffsetDateTime, ZERO_TIMESTAMP, |at| at);
timestamp_slot!(
    PrimitiveDateTime,
    datetime!(0001-01-01 0:00),
    |at| PrimitiveDateTime::new(at.date(), at.time())
);
timestamp_slot!(Date, date!(0001-01-01), |at| at.date());
timestamp_slot!(Time, Time::MIDNIGHT, |at| at.time());

// ──────────────────────────────────────────────
// Unsupported
// ──────────────────────────────────────────────

impl<T> Hydrate for *mut T {
    fn kind(&mut self) -> Kind<'_> {
        Kind::Unsupported("raw pointer")
    }

    fn reset(&mut self) {
        *self = std::ptr::null_mut();
    }

    fn zero() -> Self {
        std::ptr::null_mut()
    }
}

impl<T> Hydrate for *const T {
    fn kind(&mut self) -> Kind<'_> {
        Kind::Unsupported("raw pointer")
    }

    fn reset(&mut self) {
        *self = std::ptr::null();
    }

    fn zero() -> Self {
        std::ptr::null()
    }
}
