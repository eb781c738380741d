//! Navigation scripts
//!
//! A script is a JSON list of navigation states. Replaying it reconciles each
//! state against the previous one and records the resulting scenes.
//!
//! ```json
//! { "steps": [
//!     { "routes": [{ "key": "home" }] },
//!     { "routes": [{ "key": "home" }, { "key": "detail", "params": { "id": 1 } }] },
//!     { "routes": [{ "key": "home" }], "complete": true }
//! ] }
//! ```
//!
//! A route that reappears with the same key and payload is treated as the
//! same route instance, so unchanged scenes show up as reused.

use crate::error::SimError;
use crate::host::{SceneHost, TransitionSummary};
use nav_route::{BasicRoute, NavigationState, Route, RouteKey};
use nav_scenes::{SceneList, SceneReconciler};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// A sequence of navigation states
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    /// States in the order they are delivered
    pub steps: Vec<ScriptStep>,
}

/// One navigation state in a script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Child routes
    pub routes: Vec<BasicRoute>,
    /// Active index; defaults to the last route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Retire stale scenes after this step
    #[serde(default)]
    pub complete: bool,
}

impl Script {
    /// Parse a script from JSON
    ///
    /// # Errors
    /// `SimError::Json` for malformed input, `SimError::EmptyScript` when
    /// there are no steps.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let script: Self = serde_json::from_str(json)?;
        if script.steps.is_empty() {
            return Err(SimError::EmptyScript);
        }
        Ok(script)
    }

    /// Load a script file
    ///
    /// # Errors
    /// `SimError::Io` if the file cannot be read, otherwise as
    /// [`Script::from_json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// Scene as recorded in a replay frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneSnapshot {
    /// Scene key
    pub key: String,
    /// Route position
    pub index: usize,
    /// Whether the route has left the state
    pub is_stale: bool,
    /// Handle carried over from the previous frame
    pub reused: bool,
}

/// Scenes after one script step
#[derive(Debug, Clone, Serialize)]
pub struct ReplayFrame {
    /// Step number, starting at 1
    pub step: usize,
    /// Active route key
    pub active: Option<String>,
    /// Scenes in render order
    pub scenes: Vec<SceneSnapshot>,
    /// Changes relative to the previous frame
    pub summary: TransitionSummary,
}

/// Route handles by key, reused while their payload stays equal
#[derive(Default)]
struct RouteInterner {
    routes: HashMap<RouteKey, Arc<BasicRoute>>,
}

impl RouteInterner {
    fn intern(&mut self, route: &BasicRoute) -> Arc<BasicRoute> {
        match self.routes.get(route.key()) {
            Some(existing) if **existing == *route => Arc::clone(existing),
            _ => {
                let handle = Arc::new(route.clone());
                self.routes.insert(route.key().clone(), Arc::clone(&handle));
                handle
            }
        }
    }

    fn state(&mut self, step: &ScriptStep) -> Result<NavigationState, SimError> {
        let routes: Vec<_> = step.routes.iter().map(|r| self.intern(r)).collect();
        let state = match step.index {
            Some(index) => NavigationState::new(routes, index)?,
            None => NavigationState::from_routes(routes),
        };
        Ok(state)
    }
}

fn snapshot(scenes: &SceneList<BasicRoute>, previous: &SceneList<BasicRoute>) -> Vec<SceneSnapshot> {
    scenes
        .iter()
        .map(|s| SceneSnapshot {
            key: s.key().to_string(),
            index: s.index(),
            is_stale: s.is_stale(),
            reused: previous.iter().any(|p| Arc::ptr_eq(p, s)),
        })
        .collect()
}

/// Replay a script, returning one frame per step
///
/// # Errors
/// The first `SimError` hit: an out-of-range index or a state with
/// duplicate route keys.
pub fn replay(script: &Script, reconciler: &SceneReconciler) -> Result<Vec<ReplayFrame>, SimError> {
    let mut steps = script.steps.iter();
    let first = steps.next().ok_or(SimError::EmptyScript)?;

    let mut interner = RouteInterner::default();
    let mut host = SceneHost::with_reconciler(reconciler.clone(), interner.state(first)?)?;
    let mut frames = Vec::with_capacity(script.steps.len());

    let initial = TransitionSummary::between(&SceneList::empty(), host.scenes());
    frames.push(frame(1, &host, &SceneList::empty(), initial));
    if first.complete {
        host.complete_transition();
    }

    for (offset, step) in steps.enumerate() {
        let previous = host.scenes().clone();
        let summary = host.navigate(interner.state(step)?)?;
        frames.push(frame(offset + 2, &host, &previous, summary));

        if step.complete {
            let retired = host.complete_transition();
            tracing::debug!("Step {} retired {} stale scenes", offset + 2, retired);
        }
    }

    Ok(frames)
}

fn frame(
    step: usize,
    host: &SceneHost<BasicRoute>,
    previous: &SceneList<BasicRoute>,
    summary: TransitionSummary,
) -> ReplayFrame {
    ReplayFrame {
        step,
        active: host.active_scene().map(|s| s.route().key().to_string()),
        scenes: snapshot(host.scenes(), previous),
        summary,
    }
}
