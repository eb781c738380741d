//! Route identity and payload
//!
//! Provides the [`Route`] trait consumed by scene reconciliation and the
//! [`BasicRoute`] payload used by hosts, scripts and tests.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Sibling-unique route identifier
///
/// Two routes under the same navigation state must never share a key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteKey(String);

impl RouteKey {
    /// Create new route key
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RouteKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RouteKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for RouteKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl AsRef<str> for RouteKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A navigable unit identified by its key
///
/// Everything else a route carries is opaque to scene reconciliation.
/// Routes are shared through `Arc`, and handle identity (not value
/// equality) is what a renderer sees as "the same route".
pub trait Route: fmt::Debug {
    /// Sibling-unique key
    fn key(&self) -> &RouteKey;
}

impl<T: Route + ?Sized> Route for Box<T> {
    fn key(&self) -> &RouteKey {
        (**self).key()
    }
}

/// Route with a screen name and arbitrary JSON params
///
/// # Example
/// ```
/// use nav_route::{BasicRoute, Route};
/// use serde_json::json;
///
/// let route = BasicRoute::new("profile-7", "Profile").with_params(json!({ "user": 7 }));
/// assert_eq!(route.key().as_str(), "profile-7");
/// assert_eq!(route.params()["user"], 7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicRoute {
    key: RouteKey,

    /// Screen name; defaults to the key when absent in serialized form
    #[serde(default)]
    name: String,

    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    params: serde_json::Value,
}

impl BasicRoute {
    /// Create route with key and screen name
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<RouteKey>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            params: serde_json::Value::Null,
        }
    }

    /// Create route whose name equals its key
    #[must_use]
    pub fn keyed(key: impl Into<RouteKey>) -> Self {
        let key = key.into();
        let name = key.as_str().to_string();
        Self {
            key,
            name,
            params: serde_json::Value::Null,
        }
    }

    /// Attach params
    #[inline]
    #[must_use]
    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }

    /// Screen name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        if self.name.is_empty() {
            self.key.as_str()
        } else {
            &self.name
        }
    }

    /// Route params (`Null` when none)
    #[inline]
    #[must_use]
    pub fn params(&self) -> &serde_json::Value {
        &self.params
    }
}

impl Route for BasicRoute {
    fn key(&self) -> &RouteKey {
        &self.key
    }
}
