//! Navigation Scene Reconciliation
//!
//! Turns successive navigation states into an ordered list of renderable
//! scenes, keeping just-removed routes around as stale scenes so exit
//! transitions can play, and reusing scene handles that did not change.
//!
//! # Core Concepts
//!
//! - [`Scene`]: A route plus its position and staleness
//! - [`SceneList`]: Shared, ordered list of scene handles
//! - [`SceneReconciler`]: The fresh/stale/revived classification and merge
//! - [`compare_scene_keys`] / [`compare_scenes`]: Output ordering
//! - [`are_scenes_shallow_equal`]: When a previous scene handle is reused
//!
//! # Example
//!
//! ```rust
//! use nav_route::{BasicRoute, NavigationState};
//! use nav_scenes::{reconcile, SceneList};
//! use std::sync::Arc;
//!
//! let a = Arc::new(BasicRoute::keyed("a"));
//! let b = Arc::new(BasicRoute::keyed("b"));
//!
//! let first = NavigationState::from_routes(vec![a.clone(), b.clone()]);
//! let scenes = reconcile(&SceneList::empty(), &first, None).unwrap();
//! assert_eq!(scenes.len(), 2);
//!
//! let second = first.pop();
//! let scenes = reconcile(&scenes, &second, Some(&first)).unwrap();
//! assert!(scenes.find("scene_b").unwrap().is_stale());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod compare;
mod error;
mod query;
mod reconciler;
mod scene;

// Re-exports
pub use compare::{are_scenes_shallow_equal, compare_scene_keys, compare_scenes};
pub use error::ReconcileError;
pub use query::{active_scene, retire_stale_scenes};
pub use reconciler::{reconcile, ReconcilerConfig, SceneReconciler};
pub use scene::{Scene, SceneKey, SceneList, SceneRef, SCENE_KEY_PREFIX};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
