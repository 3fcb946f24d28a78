//! Splitting flat form keys into path segments.
//!
//! Dotted (`a.b.0`) and bracketed (`a[b][0]`) forms may be mixed freely.
//! A backslash makes the next character literal, so `a\.b` is the single
//! segment `a.b`. Inside brackets only `]` and `\` are special.

use crate::error::TreeError;

/// Parse a flat key into its path segments.
///
/// The empty key is a single empty segment. Every other segment must be
/// non-empty.
pub fn parse_path(key: &str) -> Result<Vec<String>, TreeError> {
    let invalid = |reason: &str| TreeError::InvalidPath {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = key.chars();
    let mut in_bracket = false;
    // Set right after a `]`: the next character must start a new segment.
    let mut closed = false;

    while let Some(c) = chars.next() {
        if closed && c != '[' && c != '.' {
            return Err(invalid("expected '[' or '.' after ']'"));
        }
        let was_closed = std::mem::replace(&mut closed, false);

        match c {
            '\\' => {
                let escaped = chars.next().ok_or_else(|| invalid("trailing backslash"))?;
                current.push(escaped);
            }
            ']' if in_bracket => {
                if current.is_empty() {
                    return Err(invalid("empty brackets"));
                }
                segments.push(std::mem::take(&mut current));
                in_bracket = false;
                closed = true;
            }
            ']' => return Err(invalid("unmatched ']'")),
            '[' if in_bracket => return Err(invalid("nested '['")),
            _ if in_bracket => current.push(c),
            '[' => {
                if !was_closed {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    } else if !segments.is_empty() {
                        return Err(invalid("empty segment"));
                    }
                }
                in_bracket = true;
            }
            '.' => {
                if !was_closed {
                    if current.is_empty() {
                        return Err(invalid("empty segment"));
                    }
                    segments.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if in_bracket {
        return Err(invalid("unterminated '['"));
    }
    if !closed {
        if current.is_empty() && !segments.is_empty() {
            return Err(invalid("empty segment"));
        }
        segments.push(current);
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(key: &str) -> Vec<String> {
        parse_path(key).unwrap()
    }

    #[test]
    fn test_plain_key() {
        assert_eq!(segments("name"), vec!["name"]);
    }

    #[test]
    fn test_empty_key() {
        assert_eq!(segments(""), vec![""]);
    }

    #[test]
    fn test_dotted_path() {
        assert_eq!(segments("a.b.0"), vec!["a", "b", "0"]);
    }

    #[test]
    fn test_bracketed_path() {
        assert_eq!(segments("a[b][0]"), vec!["a", "b", "0"]);
    }

    #[test]
    fn test_mixed_path() {
        assert_eq!(segments("a[b].c[1]"), vec!["a", "b", "c", "1"]);
    }

    #[test]
    fn test_leading_bracket() {
        assert_eq!(segments("[0].name"), vec!["0", "name"]);
    }

    #[test]
    fn test_dot_inside_brackets_is_literal() {
        assert_eq!(segments("hosts[example.com]"), vec!["hosts", "example.com"]);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(segments(r"a\.b.c"), vec!["a.b", "c"]);
        assert_eq!(segments(r"a\[0\]"), vec!["a[0]"]);
        assert_eq!(segments(r"a\\b"), vec![r"a\b"]);
    }

    #[test]
    fn test_invalid_paths() {
        for key in [
            "a[",
            "a]",
            "a[]",
            "a..b",
            "a.",
            ".a",
            "a[b]c",
            "a.[b]",
            "a[b[c]]",
            "a\\",
        ] {
            match parse_path(key) {
                Err(TreeError::InvalidPath { key: k, .. }) => assert_eq!(k, key),
                other => panic!("expected InvalidPath for {:?}, got {:?}", key, other),
            }
        }
    }
}
