//! Scene list reconciliation
//!
//! Given the previous scenes, the next navigation state and optionally the
//! previous state, [`SceneReconciler::reconcile`] classifies every route as
//! fresh, stale or revived, reuses unchanged scene handles and returns the
//! scenes sorted for rendering.

use crate::compare::{are_scenes_shallow_equal, compare_scenes};
use crate::error::ReconcileError;
use crate::scene::{Scene, SceneKey, SceneList, SceneRef, SCENE_KEY_PREFIX};
use nav_route::{NavigationState, Route, RouteKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Reconciler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Prefix prepended to route keys to form scene keys
    pub scene_key_prefix: String,
    /// Return the previous scene list untouched when the previous and next
    /// state are the same instance
    pub identity_fast_path: bool,
}

impl ReconcilerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With scene key prefix
    #[inline]
    #[must_use]
    pub fn with_scene_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.scene_key_prefix = prefix.into();
        self
    }

    /// With identity fast path enabled or disabled
    #[inline]
    #[must_use]
    pub fn with_identity_fast_path(mut self, enabled: bool) -> Self {
        self.identity_fast_path = enabled;
        self
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            scene_key_prefix: SCENE_KEY_PREFIX.to_string(),
            identity_fast_path: true,
        }
    }
}

/// Stateless scene list reconciler
///
/// # Example
/// ```
/// use nav_route::{BasicRoute, NavigationState};
/// use nav_scenes::{ReconcilerConfig, SceneList, SceneReconciler};
/// use std::sync::Arc;
///
/// let reconciler = SceneReconciler::new(ReconcilerConfig::new().with_scene_key_prefix("card_"));
/// let state = NavigationState::from_routes(vec![Arc::new(BasicRoute::keyed("home"))]);
///
/// let scenes = reconciler.reconcile(&SceneList::empty(), &state, None).unwrap();
/// assert_eq!(scenes[0].key().as_str(), "card_home");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SceneReconciler {
    config: ReconcilerConfig,
}

impl SceneReconciler {
    /// Create reconciler with configuration
    #[inline]
    #[must_use]
    pub fn new(config: ReconcilerConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Scene key for a route key under this configuration
    #[inline]
    #[must_use]
    pub fn scene_key(&self, route_key: &RouteKey) -> SceneKey {
        SceneKey::with_prefix(&self.config.scene_key_prefix, route_key)
    }

    /// Compute the next scene list
    ///
    /// # Returns
    /// - `Ok(SceneList)` sorted by index, then key
    /// - `Err(ReconcileError::DuplicateSiblingKey)` if two routes of
    ///   `next_state` derive the same scene key
    ///
    /// # Identity
    /// - Same `previous_state` and `next_state` instance: `previous_scenes`
    ///   itself is returned
    /// - A candidate shallow-equal to the previous scene with its key: the
    ///   previous handle is returned in its place
    ///
    /// # Errors
    /// See above; no partial output is produced.
    pub fn reconcile<R: Route>(
        &self,
        previous_scenes: &SceneList<R>,
        next_state: &NavigationState<R>,
        previous_state: Option<&NavigationState<R>>,
    ) -> Result<SceneList<R>, ReconcileError> {
        if self.config.identity_fast_path
            && previous_state.is_some_and(|prev| std::ptr::eq(prev, next_state))
        {
            tracing::trace!(
                "Navigation state unchanged, keeping {} scenes",
                previous_scenes.len()
            );
            return Ok(previous_scenes.clone());
        }

        let mut prev_by_key: HashMap<&SceneKey, &SceneRef<R>> =
            HashMap::with_capacity(previous_scenes.len());
        let mut stale: HashMap<SceneKey, SceneRef<R>> = HashMap::new();

        for scene in previous_scenes {
            if scene.is_stale() {
                stale.insert(scene.key().clone(), Arc::clone(scene));
            }
            prev_by_key.insert(scene.key(), scene);
        }

        let fresh = self.fresh_scenes(next_state)?;

        // Revive: a carried-over stale scene whose route came back
        let carried = stale.len();
        stale.retain(|key, _| !fresh.positions.contains_key(key));
        let revived = carried - stale.len();

        if let Some(prev_state) = previous_state {
            for (index, route) in prev_state.routes().iter().enumerate() {
                let key = self.scene_key(route.key());
                if fresh.positions.contains_key(&key) {
                    continue;
                }
                let scene = Scene::new(key.clone(), index, true, Arc::clone(route));
                stale.insert(key, Arc::new(scene));
            }
        }

        let stale_count = stale.len();
        let mut reused = 0usize;
        let mut merged: Vec<SceneRef<R>> = Vec::with_capacity(stale_count + fresh.scenes.len());

        for candidate in stale.into_values().chain(fresh.scenes) {
            match prev_by_key.get(candidate.key()) {
                Some(prev) if are_scenes_shallow_equal(prev, &candidate) => {
                    tracing::trace!("Reusing scene {}", prev.key());
                    reused += 1;
                    merged.push(Arc::clone(*prev));
                }
                _ => merged.push(candidate),
            }
        }

        merged.sort_by(|one, two| compare_scenes(one, two));

        tracing::debug!(
            "Reconciled {} scenes ({} stale, {} revived, {} reused)",
            merged.len(),
            stale_count,
            revived,
            reused
        );

        Ok(SceneList::new(merged))
    }

    /// Build fresh scenes for every route, rejecting duplicate keys
    fn fresh_scenes<R: Route>(
        &self,
        next_state: &NavigationState<R>,
    ) -> Result<FreshScenes<R>, ReconcileError> {
        let mut positions: HashMap<SceneKey, usize> = HashMap::with_capacity(next_state.len());
        let mut scenes = Vec::with_capacity(next_state.len());

        for (index, route) in next_state.routes().iter().enumerate() {
            let key = self.scene_key(route.key());

            if let Some(&first_index) = positions.get(&key) {
                tracing::error!(
                    "Navigation state routes[{}] key \"{}\" conflicts with routes[{}]",
                    index,
                    key,
                    first_index
                );
                return Err(ReconcileError::DuplicateSiblingKey {
                    key,
                    index,
                    first_index,
                });
            }

            positions.insert(key.clone(), index);
            scenes.push(Arc::new(Scene::new(key, index, false, Arc::clone(route))));
        }

        Ok(FreshScenes { positions, scenes })
    }
}

/// Fresh scenes in route order plus their key positions
struct FreshScenes<R> {
    positions: HashMap<SceneKey, usize>,
    scenes: Vec<SceneRef<R>>,
}

/// Reconcile with the default configuration
///
/// # Errors
/// `ReconcileError::DuplicateSiblingKey` if two routes of `next_state` share a
/// key.
pub fn reconcile<R: Route>(
    previous_scenes: &SceneList<R>,
    next_state: &NavigationState<R>,
    previous_state: Option<&NavigationState<R>>,
) -> Result<SceneList<R>, ReconcileError> {
    SceneReconciler::default().reconcile(previous_scenes, next_state, previous_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nav_route::BasicRoute;
    use pretty_assertions::assert_eq;

    fn route(key: &str) -> Arc<BasicRoute> {
        Arc::new(BasicRoute::keyed(key))
    }

    fn summary(scenes: &SceneList<BasicRoute>) -> Vec<(String, usize, bool)> {
        scenes
            .iter()
            .map(|s| (s.key().to_string(), s.index(), s.is_stale()))
            .collect()
    }

    #[test]
    fn first_reconciliation_builds_fresh_scenes() {
        let state = NavigationState::from_routes(vec![route("a"), route("b")]);
        let scenes = reconcile(&SceneList::empty(), &state, None).unwrap();

        assert_eq!(
            summary(&scenes),
            vec![
                ("scene_a".to_string(), 0, false),
                ("scene_b".to_string(), 1, false),
            ]
        );
        assert!(Arc::ptr_eq(scenes[0].route(), &state.routes()[0]));
    }

    #[test]
    fn same_state_instance_returns_same_list() {
        let state = NavigationState::from_routes(vec![route("a")]);
        let scenes = reconcile(&SceneList::empty(), &state, None).unwrap();

        let again = reconcile(&scenes, &state, Some(&state)).unwrap();
        assert!(again.ptr_eq(&scenes));
    }

    #[test]
    fn disabled_fast_path_still_reuses_scene_handles() {
        let reconciler =
            SceneReconciler::new(ReconcilerConfig::new().with_identity_fast_path(false));
        let state = NavigationState::from_routes(vec![route("a")]);
        let scenes = reconciler.reconcile(&SceneList::empty(), &state, None).unwrap();

        let again = reconciler.reconcile(&scenes, &state, Some(&state)).unwrap();
        assert!(!again.ptr_eq(&scenes));
        assert!(Arc::ptr_eq(&again[0], &scenes[0]));
    }

    #[test]
    fn duplicate_route_key_is_rejected() {
        let state = NavigationState::new(vec![route("a"), route("b"), route("a")], 0).unwrap();
        let err = reconcile(&SceneList::empty(), &state, None).unwrap_err();

        assert_eq!(
            err,
            ReconcileError::DuplicateSiblingKey {
                key: SceneKey::for_route(&RouteKey::new("a")),
                index: 2,
                first_index: 0,
            }
        );
    }

    #[test]
    fn custom_prefix_flows_into_stale_scenes() {
        let reconciler = SceneReconciler::new(ReconcilerConfig::new().with_scene_key_prefix("s:"));
        let first = NavigationState::from_routes(vec![route("a"), route("b")]);
        let initial = reconciler.reconcile(&SceneList::empty(), &first, None).unwrap();

        let second = first.pop();
        let scenes = reconciler.reconcile(&initial, &second, Some(&first)).unwrap();
        assert_eq!(
            summary(&scenes),
            vec![("s:a".to_string(), 0, false), ("s:b".to_string(), 1, true)]
        );
        assert!(Arc::ptr_eq(&scenes[0], &initial[0]));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: ReconcilerConfig = serde_json::from_str(r#"{ "identity_fast_path": false }"#).unwrap();
        assert_eq!(config.scene_key_prefix, SCENE_KEY_PREFIX);
        assert!(!config.identity_fast_path);
    }
}
