/// Errors raised while turning flat form data into a node tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// A key could not be split into path segments.
    #[error("invalid key {key:?}: {reason}")]
    InvalidPath { key: String, reason: String },

    /// The same path is used both as a single value and as a group of keys.
    #[error("conflicting values at {path}: a key cannot hold both a value and nested keys")]
    Conflict { path: String },

    /// The raw payload is not a well-formed query string.
    #[error("malformed query string: {reason}")]
    MalformedQuery { reason: String },
}
