//! Queries over reconciled scene lists

use crate::scene::{SceneList, SceneRef};
use nav_route::{NavigationState, Route};
use std::sync::Arc;

/// The fresh scene for the active route of `state`
#[must_use]
pub fn active_scene<'a, R: Route>(
    scenes: &'a SceneList<R>,
    state: &NavigationState<R>,
) -> Option<&'a SceneRef<R>> {
    let route = state.active_route()?;
    scenes
        .iter()
        .find(|s| !s.is_stale() && s.index() == state.index() && Arc::ptr_eq(s.route(), route))
}

/// Drop stale scenes once their exit transitions are done
///
/// Remaining scenes keep their handles. When nothing is stale the same list
/// instance is returned.
#[must_use]
pub fn retire_stale_scenes<R>(scenes: &SceneList<R>) -> SceneList<R> {
    if scenes.stale_count() == 0 {
        return scenes.clone();
    }

    let retired = scenes.stale_count();
    let kept: SceneList<R> = scenes
        .iter()
        .filter(|s| !s.is_stale())
        .map(Arc::clone)
        .collect();

    tracing::debug!("Retired {} stale scenes, {} remain", retired, kept.len());
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciler::reconcile;
    use nav_route::BasicRoute;

    fn route(key: &str) -> Arc<BasicRoute> {
        Arc::new(BasicRoute::keyed(key))
    }

    #[test]
    fn active_scene_follows_state_index() {
        let state = NavigationState::new(vec![route("a"), route("b")], 0).unwrap();
        let scenes = reconcile(&SceneList::empty(), &state, None).unwrap();

        let active = active_scene(&scenes, &state).unwrap();
        assert_eq!(active.key().as_str(), "scene_a");
    }

    #[test]
    fn active_scene_skips_stale_scene_at_same_index() {
        let first = NavigationState::from_routes(vec![route("a")]);
        let scenes = reconcile(&SceneList::empty(), &first, None).unwrap();

        let second = NavigationState::reset(vec![route("b")], None).unwrap();
        let scenes = reconcile(&scenes, &second, Some(&first)).unwrap();

        assert_eq!(scenes.len(), 2);
        let active = active_scene(&scenes, &second).unwrap();
        assert_eq!(active.key().as_str(), "scene_b");
    }

    #[test]
    fn active_scene_none_for_empty_state() {
        let state: NavigationState = NavigationState::empty();
        let scenes = reconcile(&SceneList::empty(), &state, None).unwrap();
        assert!(active_scene(&scenes, &state).is_none());
    }

    #[test]
    fn retire_removes_only_stale() {
        let first = NavigationState::from_routes(vec![route("a"), route("b")]);
        let scenes = reconcile(&SceneList::empty(), &first, None).unwrap();
        let second = first.pop();
        let scenes = reconcile(&scenes, &second, Some(&first)).unwrap();

        let retired = retire_stale_scenes(&scenes);
        assert_eq!(retired.len(), 1);
        assert!(Arc::ptr_eq(&retired[0], &scenes[0]));
    }

    #[test]
    fn retire_without_stale_returns_same_list() {
        let state = NavigationState::from_routes(vec![route("a")]);
        let scenes = reconcile(&SceneList::empty(), &state, None).unwrap();
        assert!(retire_stale_scenes(&scenes).ptr_eq(&scenes));
    }
}
