//! Error types for navigation state transitions

use crate::route::RouteKey;

/// Navigation state contract violations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// A route with this key is already present among the siblings
    #[error("route key '{key}' already exists at index {existing_index}")]
    DuplicateKey {
        /// Conflicting key
        key: RouteKey,
        /// Position of the route already holding the key
        existing_index: usize,
    },

    /// Index outside the route list
    #[error("index {index} out of range for {len} routes")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of routes
        len: usize,
    },

    /// No route has this key
    #[error("no route with key '{0}'")]
    UnknownKey(RouteKey),

    /// A navigation state needs at least one route
    #[error("navigation state requires at least one route")]
    Empty,
}
