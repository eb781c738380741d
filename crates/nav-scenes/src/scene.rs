//! Scene records and scene lists

use crate::compare::compare_scene_keys;
use nav_route::{Route, RouteKey};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::ops::Deref;
use std::sync::Arc;

/// Prefix prepended to a route key to form its scene key
pub const SCENE_KEY_PREFIX: &str = "scene_";

/// Scene identifier derived from a route key
///
/// Ordered by length first, then lexicographically, so `scene_9` sorts
/// before `scene_11`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneKey(String);

impl SceneKey {
    /// Derive the scene key for a route key using [`SCENE_KEY_PREFIX`]
    #[inline]
    #[must_use]
    pub fn for_route(route_key: &RouteKey) -> Self {
        Self::with_prefix(SCENE_KEY_PREFIX, route_key)
    }

    /// Derive the scene key for a route key with a custom prefix
    #[must_use]
    pub fn with_prefix(prefix: &str, route_key: &RouteKey) -> Self {
        let mut key = String::with_capacity(prefix.len() + route_key.as_str().len());
        key.push_str(prefix);
        key.push_str(route_key.as_str());
        Self(key)
    }

    /// Key as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SceneKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialOrd for SceneKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SceneKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_scene_keys(&self.0, &other.0)
    }
}

impl PartialEq<str> for SceneKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SceneKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A route positioned for rendering
///
/// # Structure
/// - `key`: Derived from the route key
/// - `index`: Position of the route in the state it was last seen in
/// - `is_stale`: Route is gone from the current state and kept for its exit
/// - `route`: Shared handle to the originating route
#[derive(Debug)]
pub struct Scene<R> {
    key: SceneKey,
    index: usize,
    is_stale: bool,
    route: Arc<R>,
}

/// Shared scene handle; `Arc::ptr_eq` is scene identity
pub type SceneRef<R> = Arc<Scene<R>>;

impl<R: Route> Scene<R> {
    /// Create new scene
    #[inline]
    #[must_use]
    pub fn new(key: SceneKey, index: usize, is_stale: bool, route: Arc<R>) -> Self {
        Self {
            key,
            index,
            is_stale,
            route,
        }
    }

    /// Scene for a route present in the current state
    #[must_use]
    pub fn fresh(index: usize, route: Arc<R>) -> Self {
        let key = SceneKey::for_route(route.key());
        Self::new(key, index, false, route)
    }

    /// Scene for a route removed from the current state
    #[must_use]
    pub fn stale(index: usize, route: Arc<R>) -> Self {
        let key = SceneKey::for_route(route.key());
        Self::new(key, index, true, route)
    }
}

impl<R> Scene<R> {
    /// Scene key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &SceneKey {
        &self.key
    }

    /// Route position
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the route has left the navigation state
    #[inline]
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.is_stale
    }

    /// Originating route
    #[inline]
    #[must_use]
    pub fn route(&self) -> &Arc<R> {
        &self.route
    }
}

/// Ordered, immutable list of scene handles
///
/// Cloning copies the handle, not the scenes. [`SceneList::ptr_eq`] tells
/// whether two lists are the same instance.
#[derive(Debug)]
pub struct SceneList<R> {
    scenes: Arc<[SceneRef<R>]>,
}

impl<R> Clone for SceneList<R> {
    fn clone(&self) -> Self {
        Self {
            scenes: Arc::clone(&self.scenes),
        }
    }
}

impl<R> Default for SceneList<R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<R> SceneList<R> {
    /// Create list from scene handles, keeping their order
    #[inline]
    #[must_use]
    pub fn new(scenes: Vec<SceneRef<R>>) -> Self {
        Self {
            scenes: scenes.into(),
        }
    }

    /// List with no scenes
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Check whether both lists are the same instance
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.scenes, &other.scenes)
    }

    /// Scenes as a slice
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[SceneRef<R>] {
        &self.scenes
    }

    /// Scene with `key`, if present
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&SceneRef<R>> {
        self.scenes.iter().find(|s| s.key() == key)
    }

    /// Scene keys in list order
    pub fn keys(&self) -> impl Iterator<Item = &SceneKey> + '_ {
        self.scenes.iter().map(|s| s.key())
    }

    /// Number of stale scenes
    #[must_use]
    pub fn stale_count(&self) -> usize {
        self.scenes.iter().filter(|s| s.is_stale()).count()
    }
}

impl<R> Deref for SceneList<R> {
    type Target = [SceneRef<R>];

    fn deref(&self) -> &Self::Target {
        &self.scenes
    }
}

impl<R> FromIterator<SceneRef<R>> for SceneList<R> {
    fn from_iter<I: IntoIterator<Item = SceneRef<R>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, R> IntoIterator for &'a SceneList<R> {
    type Item = &'a SceneRef<R>;
    type IntoIter = std::slice::Iter<'a, SceneRef<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenes.iter()
    }
}
