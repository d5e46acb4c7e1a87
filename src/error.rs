//! Error types for the flattener.

use thiserror::Error;

/// Convenience type alias for Results using [`FlattenError`].
pub type Result<T, E = FlattenError> = std::result::Result<T, E>;

/// Failures raised while flattening a tree.
///
/// The depth guard is the only way a flatten call can fail. Malformed or
/// unexpected root values never error, they flatten to an empty map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlattenError {
    /// The depth budget ran out while there was still structure to descend into.
    #[error("maximum depth exceeded at '{}', possible circular reference", display_path(.path))]
    DepthExceeded {
        /// Flat key of the container that could not be entered.
        path: String,
    },
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}
