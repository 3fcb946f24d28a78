//! Text to primitive coercion.

use crate::error::{DecodeError, Primitive, Result};
use crate::slot::{Hydrate, Kind, Scalar};

/// Store `text` into a scalar slot.
///
/// Numbers are parsed at the destination's own width, so `300` into a
/// `u8` fails instead of wrapping. On failure the slot keeps its value.
pub fn assign(scalar: Scalar<'_>, text: &str) -> Result<()> {
    let parse_error = |primitive| DecodeError::Parse {
        primitive,
        text: text.to_string(),
    };

    match scalar {
        Scalar::Bool(slot) => *slot = parse_bool(text).ok_or_else(|| parse_error(Primitive::Bool))?,
        Scalar::Int(slot) => {
            if !slot.parse_assign(text) {
                return Err(parse_error(Primitive::Int));
            }
        }
        Scalar::Uint(slot) => {
            if !slot.parse_assign(text) {
                return Err(parse_error(Primitive::Uint));
            }
        }
        Scalar::Float(slot) => {
            if !slot.parse_assign(text) {
                return Err(parse_error(Primitive::Float));
            }
        }
        Scalar::Text(slot) => {
            slot.clear();
            slot.push_str(text);
        }
    }
    Ok(())
}

/// Coerce `text` into any slot that must be a scalar, such as a map key.
///
/// Empty text resets the slot. Non-scalar slots are rejected.
pub fn assign_text(slot: &mut dyn Hydrate, text: &str) -> Result<()> {
    let type_name = slot.type_name();
    if text.is_empty() {
        slot.reset();
        return Ok(());
    }
    match slot.kind() {
        Kind::Scalar(scalar) => assign(scalar, text),
        other => Err(DecodeError::UnsupportedKind {
            type_name,
            kind: other.name(),
        }),
    }
}

/// Accepts `1`, `0`, `t`, `f`, `true` and `false` in any letter case.
fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" => Some(true),
        "0" => Some(false),
        _ if text.eq_ignore_ascii_case("t") || text.eq_ignore_ascii_case("true") => Some(true),
        _ if text.eq_ignore_ascii_case("f") || text.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coerce<T: Hydrate>(mut value: T, text: &str) -> Result<T> {
        assign_text(&mut value, text)?;
        Ok(value)
    }

    #[test]
    fn test_bool_literals() {
        for text in ["1", "t", "T", "true", "TRUE", "True"] {
            assert!(coerce(false, text).unwrap(), "{}", text);
        }
        for text in ["0", "f", "F", "false", "FALSE", "False"] {
            assert!(!coerce(true, text).unwrap(), "{}", text);
        }
    }

    #[test]
    fn test_bool_rejects_other_words() {
        let err = coerce(false, "yes").unwrap_err();
        assert_eq!(err.to_string(), "could not parse bool from yes");
    }

    #[test]
    fn test_signed_integers() {
        assert_eq!(coerce(0i32, "-42").unwrap(), -42);
        assert_eq!(coerce(0i64, "+7").unwrap(), 7);
        assert_eq!(coerce(0i8, "-128").unwrap(), -128);
    }

    #[test]
    fn test_integer_overflow_is_width_aware() {
        let err = coerce(0i8, "128").unwrap_err();
        assert_eq!(
            err,
            DecodeError::Parse {
                primitive: Primitive::Int,
                text: "128".to_string()
            }
        );
        assert!(coerce(0u8, "256").is_err());
        assert_eq!(coerce(0u16, "65535").unwrap(), u16::MAX);
    }

    #[test]
    fn test_unsigned_rejects_negative() {
        let err = coerce(0u32, "-1").unwrap_err();
        assert_eq!(err.to_string(), "could not parse uint from -1");
    }

    #[test]
    fn test_non_decimal_integer_rejected() {
        assert!(coerce(0i32, "0x10").is_err());
        assert!(coerce(0i32, "1.5").is_err());
    }

    #[test]
    fn test_floats() {
        assert_eq!(coerce(0f64, "3.25").unwrap(), 3.25);
        assert_eq!(coerce(0f64, "-1e3").unwrap(), -1000.0);
        assert_eq!(coerce(0f32, "0.5").unwrap(), 0.5f32);
        let err = coerce(0f64, "1.2.3").unwrap_err();
        assert_eq!(err.to_string(), "could not parse float from 1.2.3");
    }

    #[test]
    fn test_text_is_verbatim() {
        assert_eq!(
            coerce(String::from("old"), "  spaced & odd  ").unwrap(),
            "  spaced & odd  "
        );
    }

    #[test]
    fn test_failure_keeps_previous_value() {
        let mut value = 9u8;
        assert!(assign_text(&mut value, "nine").is_err());
        assert_eq!(value, 9);
    }

    #[test]
    fn test_empty_text_resets() {
        assert_eq!(coerce(5u64, "").unwrap(), 0);
        assert_eq!(coerce(String::from("x"), "").unwrap(), "");
    }

    #[test]
    fn test_non_scalar_slot_is_unsupported() {
        let err = coerce(vec![1u8], "x").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnsupportedKind { kind: "list", .. }
        ));
    }
}
