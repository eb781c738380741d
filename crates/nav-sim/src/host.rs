//! Scene host
//!
//! Keeps the navigation state and scene list between updates, the part of a
//! UI transitioner that is not animation.

use nav_route::{NavigationState, Route};
use nav_scenes::{
    active_scene, retire_stale_scenes, ReconcileError, SceneList, SceneReconciler, SceneRef,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// What one navigation update did to the scene list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransitionSummary {
    /// Fresh scenes that were not fresh before
    pub entering: usize,
    /// Stale scenes that were not stale before
    pub exiting: usize,
    /// Fresh scenes that were stale before
    pub revived: usize,
    /// Scene handles carried over unchanged
    pub reused: usize,
}

impl TransitionSummary {
    /// Compare two consecutive scene lists
    #[must_use]
    pub fn between<R>(previous: &SceneList<R>, next: &SceneList<R>) -> Self {
        let before: HashMap<_, _> = previous.iter().map(|s| (s.key(), s)).collect();
        let mut summary = Self::default();

        for scene in next {
            match before.get(scene.key()) {
                Some(prev) if Arc::ptr_eq(*prev, scene) => summary.reused += 1,
                Some(prev) if prev.is_stale() && !scene.is_stale() => summary.revived += 1,
                Some(prev) if prev.is_stale() == scene.is_stale() => {}
                _ if scene.is_stale() => summary.exiting += 1,
                _ => summary.entering += 1,
            }
        }

        summary
    }

    /// True when nothing entered, exited or revived
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.entering == 0 && self.exiting == 0 && self.revived == 0
    }
}

/// Owns the current navigation state and its scenes
///
/// # Example
/// ```
/// use nav_route::{BasicRoute, NavigationState};
/// use nav_sim::SceneHost;
/// use std::sync::Arc;
///
/// let state = NavigationState::from_routes(vec![Arc::new(BasicRoute::keyed("home"))]);
/// let mut host = SceneHost::new(state).unwrap();
///
/// let next = host.state().push(Arc::new(BasicRoute::keyed("details"))).unwrap();
/// let summary = host.navigate(next).unwrap();
/// assert_eq!(summary.entering, 1);
/// assert_eq!(summary.reused, 1);
/// ```
#[derive(Debug)]
pub struct SceneHost<R> {
    reconciler: SceneReconciler,
    state: Arc<NavigationState<R>>,
    scenes: SceneList<R>,
}

impl<R: Route> SceneHost<R> {
    /// Create host with the default reconciler
    ///
    /// # Errors
    /// `ReconcileError` if `state` has duplicate route keys.
    pub fn new(state: NavigationState<R>) -> Result<Self, ReconcileError> {
        Self::with_reconciler(SceneReconciler::default(), state)
    }

    /// Create host with a configured reconciler
    ///
    /// # Errors
    /// `ReconcileError` if `state` has duplicate route keys.
    pub fn with_reconciler(
        reconciler: SceneReconciler,
        state: NavigationState<R>,
    ) -> Result<Self, ReconcileError> {
        let scenes = reconciler.reconcile(&SceneList::empty(), &state, None)?;
        Ok(Self {
            reconciler,
            state: Arc::new(state),
            scenes,
        })
    }

    /// Move to `next`, keeping exiting routes as stale scenes
    ///
    /// The host is left untouched on error.
    ///
    /// # Errors
    /// `ReconcileError` if `next` has duplicate route keys.
    pub fn navigate(
        &mut self,
        next: impl Into<Arc<NavigationState<R>>>,
    ) -> Result<TransitionSummary, ReconcileError> {
        let next = next.into();
        let scenes = self
            .reconciler
            .reconcile(&self.scenes, &next, Some(self.state.as_ref()))?;

        let summary = TransitionSummary::between(&self.scenes, &scenes);
        tracing::debug!(
            "Navigated to {} routes: {} entering, {} exiting, {} revived",
            next.len(),
            summary.entering,
            summary.exiting,
            summary.revived
        );

        self.state = next;
        self.scenes = scenes;
        Ok(summary)
    }

    /// Drop stale scenes after exit transitions finish
    ///
    /// Returns how many scenes were retired.
    pub fn complete_transition(&mut self) -> usize {
        let before = self.scenes.len();
        self.scenes = retire_stale_scenes(&self.scenes);
        before - self.scenes.len()
    }

    /// Current navigation state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &Arc<NavigationState<R>> {
        &self.state
    }

    /// Current scenes
    #[inline]
    #[must_use]
    pub fn scenes(&self) -> &SceneList<R> {
        &self.scenes
    }

    /// Scene of the active route
    #[must_use]
    pub fn active_scene(&self) -> Option<&SceneRef<R>> {
        active_scene(&self.scenes, &self.state)
    }

    /// True while stale scenes are waiting to be retired
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.scenes.stale_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nav_route::BasicRoute;
    use nav_scenes::ReconcilerConfig;

    fn route(key: &str) -> Arc<BasicRoute> {
        Arc::new(BasicRoute::keyed(key))
    }

    fn host(keys: &[&str]) -> SceneHost<BasicRoute> {
        let state = NavigationState::from_routes(keys.iter().map(|k| route(k)).collect());
        SceneHost::new(state).unwrap()
    }

    #[test]
    fn new_host_has_fresh_scenes() {
        let host = host(&["a", "b"]);
        assert_eq!(host.scenes().len(), 2);
        assert!(!host.is_transitioning());
        assert_eq!(host.active_scene().unwrap().key().as_str(), "scene_b");
    }

    #[test]
    fn pop_then_complete_retires_exiting_scene() {
        let mut host = host(&["a", "b"]);
        let next = host.state().pop();

        let summary = host.navigate(next).unwrap();
        assert_eq!(summary.exiting, 1);
        assert_eq!(summary.reused, 1);
        assert!(host.is_transitioning());

        assert_eq!(host.complete_transition(), 1);
        assert!(!host.is_transitioning());
        assert_eq!(host.scenes().len(), 1);
    }

    #[test]
    fn navigating_to_same_state_is_settled() {
        let mut host = host(&["a"]);
        let before = host.scenes().clone();
        let same = Arc::clone(host.state());

        let summary = host.navigate(same).unwrap();
        assert!(summary.is_settled());
        assert!(host.scenes().ptr_eq(&before));
    }

    #[test]
    fn revival_is_reported() {
        let a = route("a");
        let b = route("b");
        let mut host =
            SceneHost::new(NavigationState::from_routes(vec![a.clone(), b.clone()])).unwrap();

        host.navigate(NavigationState::from_routes(vec![a.clone()])).unwrap();
        let summary = host
            .navigate(NavigationState::from_routes(vec![a, b]))
            .unwrap();

        assert_eq!(summary.revived, 1);
        assert_eq!(summary.reused, 1);
    }

    #[test]
    fn failed_navigation_leaves_host_untouched() {
        let mut host = host(&["a"]);
        let before = host.scenes().clone();
        let bad = NavigationState::new(vec![route("x"), route("x")], 0).unwrap();

        assert!(host.navigate(bad).is_err());
        assert!(host.scenes().ptr_eq(&before));
        assert_eq!(host.state().len(), 1);
    }

    #[test]
    fn custom_reconciler_is_used() {
        let reconciler =
            SceneReconciler::new(ReconcilerConfig::new().with_scene_key_prefix("screen-"));
        let state = NavigationState::from_routes(vec![route("a")]);
        let host = SceneHost::with_reconciler(reconciler, state).unwrap();
        assert_eq!(host.scenes()[0].key().as_str(), "screen-a");
    }
}
