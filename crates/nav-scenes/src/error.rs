//! Error types for scene reconciliation

use crate::scene::SceneKey;

/// Reconciliation contract violations
///
/// These point at a malformed navigation state built by the caller. They are
/// never recovered from inside the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// Two sibling routes derive the same scene key
    #[error("routes[{index}] key \"{key}\" conflicts with routes[{first_index}]")]
    DuplicateSiblingKey {
        /// Conflicting scene key
        key: SceneKey,
        /// Position of the second route with this key
        index: usize,
        /// Position of the first route with this key
        first_index: usize,
    },
}
