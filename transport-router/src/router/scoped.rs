//! Route guard that releases its cache entry on drop.

use crate::graph::{EdgeId, Weight};

use super::{RouteHandle, RouteId, Router, RouterError};

/// A cached route tied to the lifetime of a borrow of its [`Router`].
///
/// Dropping the guard releases the route, including on early returns and
/// unwinding.
#[derive(Debug)]
pub struct ScopedRoute<'a> {
    router: &'a Router,
    handle: RouteHandle,
}

impl<'a> ScopedRoute<'a> {
    pub(super) fn new(router: &'a Router, handle: RouteHandle) -> Self {
        Self { router, handle }
    }

    /// Returns the route's cache id.
    pub fn id(&self) -> RouteId {
        self.handle.id
    }

    /// Returns the total weight of the route.
    pub fn weight(&self) -> Weight {
        self.handle.weight
    }

    /// Returns the number of edges on the route.
    pub fn edge_count(&self) -> usize {
        self.handle.edge_count
    }

    /// Returns the `index`-th edge in travel order.
    pub fn edge(&self, index: usize) -> Result<EdgeId, RouterError> {
        self.router.route_edge(self.handle.id, index)
    }

    /// Returns all edges in travel order.
    pub fn edges(&self) -> Result<Vec<EdgeId>, RouterError> {
        self.router.route_edges(self.handle.id)
    }
}

impl Drop for ScopedRoute<'_> {
    fn drop(&mut self) {
        self.router.release_route(self.handle.id);
    }
}
