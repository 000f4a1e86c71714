use serde::{Deserialize, Serialize};

/// Path marker of the comparison root.
pub const ROOT_PATH: &str = "$";

/// Default bound on operand nesting depth.
///
/// Comparison and canonicalization recurse once per nesting level, so this
/// bounds stack usage.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options for a [`Comparator`](crate::Comparator).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparatorConfig {
    /// Reorder list-like containers by content fingerprint before comparing,
    /// so element order does not produce differences.
    pub ignore_array_sorting: bool,
    /// Maximum nesting depth accepted in either operand. The root is depth 0.
    pub max_depth: usize,
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self {
            ignore_array_sorting: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ComparatorConfig {
    /// Configuration that ignores the order of list elements.
    pub fn unordered() -> Self {
        Self {
            ignore_array_sorting: true,
            ..Default::default()
        }
    }
}
