//! Scene Host and Navigation Simulator
//!
//! Drives [`nav_scenes`] reconciliation the way a UI host would.
//!
//! # Overview
//!
//! - [`SceneHost`]: Holds the current state and scenes across navigation
//!   updates and retires stale scenes when a transition completes
//! - [`run_simulator`]: Seeded random navigation with invariant checks
//! - [`Script`] / [`replay`]: Replays a JSON sequence of navigation states

#![warn(missing_docs)]

pub mod error;
pub mod host;
pub mod script;
pub mod simulator;

// Re-exports
pub use error::SimError;
pub use host::{SceneHost, TransitionSummary};
pub use script::{replay, ReplayFrame, SceneSnapshot, Script, ScriptStep};
pub use simulator::{
    run_simulator, NavAction, SimulatorConfig, SimulatorReport, SimulatorStats, Violation,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
