//! Record field metadata and the `form_record!` declaration macro.

/// A declared record member and its optional `form` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// The member's declared name.
    pub member: &'static str,
    /// Raw tag text: `name`, `name,omitempty`, `,omitempty` or `-`.
    pub tag: Option<&'static str>,
}

/// A field's external key and flags after tag resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub key: &'static str,
    pub visible: bool,
    pub omit_empty: bool,
}

impl Field {
    pub const fn new(member: &'static str, tag: Option<&'static str>) -> Self {
        Self { member, tag }
    }

    /// Resolve the external key.
    ///
    /// A tag name of `-` hides the field. An empty tag name keeps the
    /// member name. `omitempty` after the comma sets `omit_empty`, which
    /// only matters when encoding.
    pub fn info(&self) -> FieldInfo {
        let Some(tag) = self.tag.filter(|tag| !tag.is_empty()) else {
            return FieldInfo {
                key: self.member,
                visible: true,
                omit_empty: false,
            };
        };

        let (name, options) = match tag.split_once(',') {
            Some((name, options)) => (name, Some(options)),
            None => (tag, None),
        };
        let omit_empty = options == Some("omitempty");

        if name == "-" {
            return FieldInfo {
                key: name,
                visible: false,
                omit_empty,
            };
        }

        FieldInfo {
            key: if name.is_empty() { self.member } else { name },
            visible: true,
            omit_empty,
        }
    }
}

/// Declare a struct and implement [`Record`](crate::Record) and
/// [`Hydrate`](crate::Hydrate) for it.
///
/// A field's tag follows its type after `=>`. Fields without a tag use
/// their own name as the external key.
///
/// ```
/// formbind_core::form_record! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct Signup {
///         pub email: String,
///         pub age: Option<u32> => "age,omitempty",
///         pub session: String => "-",
///         /// Opt-in checkbox.
///         pub newsletter: bool => "news",
///     }
/// }
///
/// let mut signup = <Signup as formbind_core::Hydrate>::zero();
/// formbind_core::decode_str(&mut signup, "email=a%40b.c&age=30&news=t").unwrap();
/// assert_eq!(signup.email, "a@b.c");
/// assert_eq!(signup.age, Some(30));
/// assert!(signup.newsletter);
/// ```
#[macro_export]
macro_rules! form_record {
    (@tag) => {
        ::core::option::Option::None
    };
    (@tag $tag:literal) => {
        ::core::option::Option::Some($tag)
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty $(=> $tag:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Record for $name {
            fn fields(&self) -> &'static [$crate::Field] {
                const FIELDS: &[$crate::Field] = &[
                    $( $crate::Field::new(stringify!($field), $crate::form_record!(@tag $($tag)?)), )*
                ];
                FIELDS
            }

            fn field_mut(&mut self, member: &str) -> ::core::option::Option<&mut dyn $crate::Hydrate> {
                $(
                    if member == stringify!($field) {
                        return ::core::option::Option::Some(&mut self.$field);
                    }
                )*
                ::core::option::Option::None
            }
        }

        impl $crate::Hydrate for $name {
            fn kind(&mut self) -> $crate::Kind<'_> {
                $crate::Kind::Record(self)
            }

            fn reset(&mut self) {
                *self = <Self as $crate::Hydrate>::zero();
            }

            fn zero() -> Self {
                Self {
                    $( $field: <$ty as $crate::Hydrate>::zero(), )*
                }
            }
        }
    };
}
