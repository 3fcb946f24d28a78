//! Decoder limits.

use serde::{Deserialize, Serialize};

/// Default nesting limit. Indirections (`Option`, `Box`) count as a level.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default highest index a growable list may be extended to.
pub const DEFAULT_MAX_INDEX: usize = 10_000;

/// Limits applied while walking a node tree.
///
/// Embeddable in a host's own configuration file; missing keys fall back
/// to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Deepest destination nesting the decoder will follow.
    pub max_depth: usize,
    /// Highest list index accepted when growing a `Vec`.
    pub max_index: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_index: DEFAULT_MAX_INDEX,
        }
    }
}
