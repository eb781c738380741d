//! Navigation state and its immutable transitions
//!
//! Every transition returns a new [`NavigationState`]; route handles are
//! shared between the old and the new state, so routes that were not touched
//! keep their `Arc` identity.

use crate::error::StateError;
use crate::route::{BasicRoute, Route, RouteKey};
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered routes plus the index of the active one
///
/// Construction does not check sibling key uniqueness. Uniqueness is a caller
/// contract that consumers (such as scene reconciliation) enforce themselves;
/// the transitions on this type never introduce a duplicate.
#[derive(Debug)]
pub struct NavigationState<R = BasicRoute> {
    routes: Vec<Arc<R>>,
    index: usize,
}

impl<R> Clone for NavigationState<R> {
    fn clone(&self) -> Self {
        Self {
            routes: self.routes.clone(),
            index: self.index,
        }
    }
}

impl<R: Route> NavigationState<R> {
    /// Create state from routes and active index
    ///
    /// # Errors
    /// `IndexOutOfRange` if `routes` is non-empty and `index >= routes.len()`.
    pub fn new(routes: Vec<Arc<R>>, index: usize) -> Result<Self, StateError> {
        if !routes.is_empty() && index >= routes.len() {
            return Err(StateError::IndexOutOfRange {
                index,
                len: routes.len(),
            });
        }
        Ok(Self { routes, index })
    }

    /// Create state activating the last route
    #[must_use]
    pub fn from_routes(routes: Vec<Arc<R>>) -> Self {
        let index = routes.len().saturating_sub(1);
        Self { routes, index }
    }

    /// State with no routes
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self {
            routes: Vec::new(),
            index: 0,
        }
    }

    /// Child routes in order
    #[inline]
    #[must_use]
    pub fn routes(&self) -> &[Arc<R>] {
        &self.routes
    }

    /// Active route index
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of routes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when there are no routes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Currently active route
    #[must_use]
    pub fn active_route(&self) -> Option<&Arc<R>> {
        self.routes.get(self.index)
    }

    /// Position of the first route with `key`
    #[must_use]
    pub fn index_of_key(&self, key: &RouteKey) -> Option<usize> {
        self.routes.iter().position(|r| r.key() == key)
    }

    /// Check whether any route has `key`
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &RouteKey) -> bool {
        self.index_of_key(key).is_some()
    }

    /// Route keys in order
    pub fn route_keys(&self) -> impl Iterator<Item = &RouteKey> + '_ {
        self.routes.iter().map(|r| r.key())
    }

    /// Append a route and make it active
    ///
    /// # Errors
    /// `DuplicateKey` if a sibling already uses the route's key.
    pub fn push(&self, route: Arc<R>) -> Result<Self, StateError> {
        if let Some(existing_index) = self.index_of_key(route.key()) {
            return Err(StateError::DuplicateKey {
                key: route.key().clone(),
                existing_index,
            });
        }

        let mut routes = self.routes.clone();
        routes.push(route);
        Ok(Self::from_routes(routes))
    }

    /// Remove the last route and activate the new last one
    ///
    /// A state with one route or fewer is returned as is.
    #[must_use]
    pub fn pop(&self) -> Self {
        if self.routes.len() <= 1 {
            return self.clone();
        }

        let mut routes = self.routes.clone();
        routes.pop();
        Self::from_routes(routes)
    }

    /// Activate the route at `index`
    ///
    /// # Errors
    /// `IndexOutOfRange` if no route sits at `index`.
    pub fn jump_to_index(&self, index: usize) -> Result<Self, StateError> {
        if index >= self.routes.len() {
            return Err(StateError::IndexOutOfRange {
                index,
                len: self.routes.len(),
            });
        }

        Ok(Self {
            routes: self.routes.clone(),
            index,
        })
    }

    /// Activate the route with `key`
    ///
    /// # Errors
    /// `UnknownKey` if no route has `key`.
    pub fn jump_to(&self, key: &RouteKey) -> Result<Self, StateError> {
        let index = self
            .index_of_key(key)
            .ok_or_else(|| StateError::UnknownKey(key.clone()))?;
        self.jump_to_index(index)
    }

    /// Activate the previous route, if any
    #[must_use]
    pub fn back(&self) -> Self {
        match self.index.checked_sub(1) {
            Some(index) => Self {
                routes: self.routes.clone(),
                index,
            },
            None => self.clone(),
        }
    }

    /// Activate the next route, if any
    #[must_use]
    pub fn forward(&self) -> Self {
        if self.index + 1 < self.routes.len() {
            Self {
                routes: self.routes.clone(),
                index: self.index + 1,
            }
        } else {
            self.clone()
        }
    }

    /// Replace the route with `key`, keeping the active index
    ///
    /// # Errors
    /// `UnknownKey` if no route has `key`, `DuplicateKey` if the replacement's
    /// key collides with a different sibling.
    pub fn replace_at(&self, key: &RouteKey, route: Arc<R>) -> Result<Self, StateError> {
        let index = self
            .index_of_key(key)
            .ok_or_else(|| StateError::UnknownKey(key.clone()))?;
        self.replace_at_index(index, route)
    }

    /// Replace the route at `index`, keeping the active index
    ///
    /// # Errors
    /// `IndexOutOfRange` if no route sits at `index`, `DuplicateKey` if the
    /// replacement's key collides with a different sibling.
    pub fn replace_at_index(&self, index: usize, route: Arc<R>) -> Result<Self, StateError> {
        if index >= self.routes.len() {
            return Err(StateError::IndexOutOfRange {
                index,
                len: self.routes.len(),
            });
        }

        if let Some(existing_index) = self.index_of_key(route.key()) {
            if existing_index != index {
                return Err(StateError::DuplicateKey {
                    key: route.key().clone(),
                    existing_index,
                });
            }
        }

        let mut routes = self.routes.clone();
        routes[index] = route;
        Ok(Self {
            routes,
            index: self.index,
        })
    }

    /// Replace every route
    ///
    /// `index` defaults to the last route.
    ///
    /// # Errors
    /// `Empty` for an empty route list, `DuplicateKey` if two routes share a
    /// key, `IndexOutOfRange` for a bad index.
    pub fn reset(routes: Vec<Arc<R>>, index: Option<usize>) -> Result<Self, StateError> {
        if routes.is_empty() {
            return Err(StateError::Empty);
        }

        let mut seen: HashMap<&RouteKey, usize> = HashMap::with_capacity(routes.len());
        for (position, route) in routes.iter().enumerate() {
            if let Some(&existing_index) = seen.get(route.key()) {
                return Err(StateError::DuplicateKey {
                    key: route.key().clone(),
                    existing_index,
                });
            }
            seen.insert(route.key(), position);
        }

        let index = index.unwrap_or(routes.len() - 1);
        Self::new(routes, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn route(key: &str) -> Arc<BasicRoute> {
        Arc::new(BasicRoute::keyed(key))
    }

    fn keys(state: &NavigationState) -> Vec<&str> {
        state.route_keys().map(RouteKey::as_str).collect()
    }

    fn stack(keys: &[&str]) -> NavigationState {
        NavigationState::from_routes(keys.iter().map(|k| route(k)).collect())
    }

    #[test]
    fn new_rejects_index_past_end() {
        let result = NavigationState::new(vec![route("a")], 1);
        assert_eq!(
            result.unwrap_err(),
            StateError::IndexOutOfRange { index: 1, len: 1 }
        );
    }

    #[test]
    fn new_allows_duplicate_keys() {
        let state = NavigationState::new(vec![route("a"), route("a")], 0).unwrap();
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn empty_state_has_no_active_route() {
        let state: NavigationState = NavigationState::empty();
        assert!(state.is_empty());
        assert!(state.active_route().is_none());
    }

    #[test]
    fn push_appends_and_activates() {
        let state = stack(&["a"]).push(route("b")).unwrap();
        assert_eq!(keys(&state), vec!["a", "b"]);
        assert_eq!(state.index(), 1);
    }

    #[test]
    fn push_rejects_existing_key() {
        let result = stack(&["a", "b"]).push(route("a"));
        assert!(matches!(
            result,
            Err(StateError::DuplicateKey { existing_index: 0, .. })
        ));
    }

    #[test]
    fn push_shares_untouched_routes() {
        let before = stack(&["a"]);
        let after = before.push(route("b")).unwrap();
        assert!(Arc::ptr_eq(&before.routes()[0], &after.routes()[0]));
    }

    #[test]
    fn pop_removes_last() {
        let state = stack(&["a", "b", "c"]).pop();
        assert_eq!(keys(&state), vec!["a", "b"]);
        assert_eq!(state.index(), 1);
    }

    #[test]
    fn pop_keeps_single_route() {
        let state = stack(&["a"]).pop();
        assert_eq!(keys(&state), vec!["a"]);
    }

    #[test]
    fn jump_to_changes_index_only() {
        let state = stack(&["a", "b", "c"]);
        let jumped = state.jump_to(&RouteKey::new("a")).unwrap();
        assert_eq!(jumped.index(), 0);
        assert_eq!(keys(&jumped), keys(&state));
    }

    #[test]
    fn jump_to_unknown_key_fails() {
        let result = stack(&["a"]).jump_to(&RouteKey::new("zz"));
        assert_eq!(result.unwrap_err(), StateError::UnknownKey(RouteKey::new("zz")));
    }

    #[test]
    fn back_and_forward_stay_in_bounds() {
        let state = stack(&["a", "b"]);
        assert_eq!(state.forward().index(), 1);
        assert_eq!(state.back().index(), 0);
        assert_eq!(state.back().back().index(), 0);
        assert_eq!(state.back().forward().index(), 1);
    }

    #[test]
    fn replace_at_swaps_route_in_place() {
        let state = stack(&["a", "b", "c"]);
        let replaced = state.replace_at(&RouteKey::new("b"), route("x")).unwrap();
        assert_eq!(keys(&replaced), vec!["a", "x", "c"]);
        assert_eq!(replaced.index(), 2);
    }

    #[test]
    fn replace_at_index_rejects_sibling_collision() {
        let result = stack(&["a", "b"]).replace_at_index(0, route("b"));
        assert!(matches!(result, Err(StateError::DuplicateKey { .. })));
    }

    #[test]
    fn replace_at_index_allows_same_key() {
        let state = stack(&["a", "b"]);
        let replaced = state.replace_at_index(1, route("b")).unwrap();
        assert!(!Arc::ptr_eq(&state.routes()[1], &replaced.routes()[1]));
    }

    #[test]
    fn reset_defaults_to_last_index() {
        let state = NavigationState::reset(vec![route("x"), route("y")], None).unwrap();
        assert_eq!(state.index(), 1);
    }

    #[test]
    fn reset_rejects_empty() {
        let result = NavigationState::<BasicRoute>::reset(Vec::new(), None);
        assert_eq!(result.unwrap_err(), StateError::Empty);
    }

    #[test]
    fn reset_rejects_duplicate_keys() {
        let result = NavigationState::reset(vec![route("a"), route("b"), route("a")], None);
        assert_eq!(
            result.unwrap_err(),
            StateError::DuplicateKey {
                key: RouteKey::new("a"),
                existing_index: 0,
            }
        );
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn route(key: &str) -> Arc<BasicRoute> {
        Arc::new(BasicRoute::keyed(key))
    }

    fn has_unique_keys(state: &NavigationState) -> bool {
        let mut seen = HashSet::new();
        state.route_keys().all(|k| seen.insert(k.clone()))
    }

    fn index_in_bounds(state: &NavigationState) -> bool {
        state.is_empty() || state.index() < state.len()
    }

    #[derive(Debug, Clone)]
    enum Op {
        Push(String),
        Pop,
        Back,
        Forward,
        Jump(usize),
        Replace(usize, String),
        Reset(Vec<String>),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            "[a-f]".prop_map(Op::Push),
            Just(Op::Pop),
            Just(Op::Back),
            Just(Op::Forward),
            (0..8usize).prop_map(Op::Jump),
            (0..8usize, "[a-f]").prop_map(|(i, k)| Op::Replace(i, k)),
            proptest::collection::vec("[a-f]", 0..4).prop_map(Op::Reset),
        ]
    }

    fn apply(state: &NavigationState, op: &Op) -> Result<NavigationState, StateError> {
        match op {
            Op::Push(key) => state.push(route(key)),
            Op::Pop => Ok(state.pop()),
            Op::Back => Ok(state.back()),
            Op::Forward => Ok(state.forward()),
            Op::Jump(index) => state.jump_to_index(*index),
            Op::Replace(index, key) => state.replace_at_index(*index, route(key)),
            Op::Reset(keys) => NavigationState::reset(keys.iter().map(|k| route(k)).collect(), None),
        }
    }

    proptest! {
        #[test]
        fn prop_transitions_keep_keys_unique_and_index_in_bounds(
            ops in proptest::collection::vec(op(), 1..40),
        ) {
            let mut state = NavigationState::from_routes(vec![route("root")]);

            for op in &ops {
                match apply(&state, op) {
                    Ok(next) => {
                        prop_assert!(has_unique_keys(&next), "{:?} produced duplicate keys", op);
                        prop_assert!(index_in_bounds(&next), "{:?} moved index out of range", op);
                        state = next;
                    }
                    Err(_) => {
                        // Rejected transitions leave the input usable as is
                        prop_assert!(has_unique_keys(&state));
                    }
                }
            }
        }

        #[test]
        fn prop_push_fails_exactly_on_existing_key(
            keys in proptest::collection::btree_set("[a-f]", 1..6),
            pushed in "[a-f]",
        ) {
            let state = NavigationState::from_routes(keys.iter().map(|k| route(k)).collect());
            let exists = keys.contains(&pushed);
            prop_assert_eq!(state.push(route(&pushed)).is_err(), exists);
        }
    }
}
