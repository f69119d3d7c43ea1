//! Shortest-path index over a fixed graph.
//!
//! The router runs Dijkstra from every vertex once, at construction, and
//! keeps the resulting weight/predecessor table. A query expands the path
//! for one (source, target) pair into a route cache entry that lives until
//! it is released, either explicitly via [`Router::release_route`] or by
//! dropping the [`ScopedRoute`] guard returned from [`Router::route`].
//!
//! All weights must be non-negative. Ties between equal-weight paths are
//! broken deterministically: vertices are settled in `(weight, vertex id)`
//! order, incident edges are relaxed in insertion order, and a recorded
//! predecessor is only replaced by a strictly cheaper one.

mod error;
mod index;
mod scoped;

pub use error::RouterError;
pub use index::{RouteHandle, RouteId, RouteInternalData, Router, RouterSnapshot};
pub use scoped::ScopedRoute;
