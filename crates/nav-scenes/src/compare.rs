//! Scene ordering and shallow equality

use crate::scene::Scene;
use nav_route::Route;
use std::cmp::Ordering;
use std::sync::Arc;

/// Compare scene keys by length, then lexicographically
///
/// Keys with numeric tails sort numerically as long as they share a prefix
/// (`"scene_9"` before `"scene_11"`). Non-numeric keys follow the same rule
/// literally: the shorter key always sorts first. Length is measured in bytes.
///
/// # Example
/// ```
/// use nav_scenes::compare_scene_keys;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_scene_keys("scene_9", "scene_11"), Ordering::Less);
/// assert_eq!(compare_scene_keys("scene_b", "scene_a"), Ordering::Greater);
/// assert_eq!(compare_scene_keys("scene_zz", "scene_aaa"), Ordering::Less);
/// ```
#[inline]
#[must_use]
pub fn compare_scene_keys(one: &str, two: &str) -> Ordering {
    one.len().cmp(&two.len()).then_with(|| one.cmp(two))
}

/// Compare scenes by index, then by key
#[inline]
#[must_use]
pub fn compare_scenes<R>(one: &Scene<R>, two: &Scene<R>) -> Ordering {
    one.index()
        .cmp(&two.index())
        .then_with(|| compare_scene_keys(one.key().as_str(), two.key().as_str()))
}

/// Check whether a previous scene can stand in for a new candidate
///
/// Equal key, index and staleness, and the very same route handle whose key
/// still matches.
#[must_use]
pub fn are_scenes_shallow_equal<R: Route>(one: &Scene<R>, two: &Scene<R>) -> bool {
    one.key() == two.key()
        && one.index() == two.index()
        && one.is_stale() == two.is_stale()
        && Arc::ptr_eq(one.route(), two.route())
        && one.route().key() == two.route().key()
}
