//! Navigation Route Model
//!
//! Routes and the navigation state that orders them.
//!
//! # Overview
//!
//! - **Route**: Trait for anything identified by a sibling-unique [`RouteKey`]
//! - **BasicRoute**: Concrete route with a name and JSON params
//! - **NavigationState**: Ordered routes plus the active index, with immutable
//!   transitions (push, pop, jump, replace, reset)
//!
//! # Example
//!
//! ```rust
//! use nav_route::{BasicRoute, NavigationState};
//! use std::sync::Arc;
//!
//! let home = Arc::new(BasicRoute::new("home", "Home"));
//! let state = NavigationState::new(vec![home], 0).unwrap();
//!
//! let next = state.push(Arc::new(BasicRoute::new("details", "Details"))).unwrap();
//! assert_eq!(next.len(), 2);
//! assert_eq!(next.index(), 1);
//! assert_eq!(state.len(), 1);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod route;
pub mod state;

// Re-exports
pub use error::StateError;
pub use route::{BasicRoute, Route, RouteKey};
pub use state::NavigationState;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for route operations
    pub use crate::{BasicRoute, NavigationState, Route, RouteKey, StateError};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
