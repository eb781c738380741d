//! Error types for hosting, simulation and replay

use nav_route::StateError;
use nav_scenes::ReconcileError;
use std::path::PathBuf;

/// Simulator and replay errors
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Navigation state transition rejected
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// Reconciliation rejected a navigation state
    #[error("reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// Script file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Script path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Script is not valid JSON for the expected shape
    #[error("invalid script: {0}")]
    Json(#[from] serde_json::Error),

    /// Script has no steps
    #[error("script has no steps")]
    EmptyScript,
}
