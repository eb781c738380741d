//! Testing utilities for the scene transitions workspace
//!
//! Shared route, state and scene fixtures plus list assertions.

#![allow(missing_docs)]

use nav_route::{BasicRoute, NavigationState};
use nav_scenes::{compare_scenes, reconcile, SceneList};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

pub type TestState = NavigationState<BasicRoute>;
pub type TestScenes = SceneList<BasicRoute>;

pub fn route(key: &str) -> Arc<BasicRoute> {
    Arc::new(BasicRoute::keyed(key))
}

pub fn route_with_params(key: &str, params: serde_json::Value) -> Arc<BasicRoute> {
    Arc::new(BasicRoute::keyed(key).with_params(params))
}

pub fn routes(keys: &[&str]) -> Vec<Arc<BasicRoute>> {
    keys.iter().map(|k| route(k)).collect()
}

/// State over fresh route handles, last route active
pub fn stack(keys: &[&str]) -> TestState {
    NavigationState::from_routes(routes(keys))
}

/// State over existing route handles, last route active
pub fn stack_of(routes: &[Arc<BasicRoute>]) -> TestState {
    NavigationState::from_routes(routes.to_vec())
}

/// First reconciliation of `state` with no history
pub fn initial_scenes(state: &TestState) -> TestScenes {
    reconcile(&SceneList::empty(), state, None).unwrap()
}

/// `(key, index, is_stale)` per scene, in list order
pub fn scene_summary(scenes: &TestScenes) -> Vec<(String, usize, bool)> {
    scenes
        .iter()
        .map(|s| (s.key().to_string(), s.index(), s.is_stale()))
        .collect()
}

pub fn expected(rows: &[(&str, usize, bool)]) -> Vec<(String, usize, bool)> {
    rows.iter()
        .map(|(key, index, stale)| ((*key).to_string(), *index, *stale))
        .collect()
}

pub fn assert_sorted(scenes: &TestScenes) {
    for pair in scenes.windows(2) {
        assert_ne!(
            compare_scenes(&pair[0], &pair[1]),
            Ordering::Greater,
            "scenes out of order: {} then {}",
            pair[0].key(),
            pair[1].key()
        );
    }
}

pub fn assert_unique_keys(scenes: &TestScenes) {
    let mut seen = HashSet::new();
    for scene in scenes {
        assert!(seen.insert(scene.key().clone()), "duplicate scene key {}", scene.key());
    }
}
