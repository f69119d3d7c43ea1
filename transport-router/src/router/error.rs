//! Router error types.

use crate::graph::{EdgeId, VertexId};

use super::RouteId;

/// Errors from building or querying a [`Router`](super::Router).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouterError {
    /// Query vertex is not part of the graph
    #[error("vertex {vertex} out of range (vertex count {vertex_count})")]
    VertexOutOfRange {
        vertex: VertexId,
        vertex_count: usize,
    },

    /// Edge weight is negative or NaN
    #[error("edge {edge} has invalid weight {weight}")]
    InvalidWeight { edge: EdgeId, weight: f64 },

    /// Route was never built or has already been released
    #[error("unknown route {0}")]
    UnknownRoute(RouteId),

    /// Position along a route is past its last edge
    #[error("edge index {index} out of range for route {route} with {edge_count} edges")]
    EdgeIndexOutOfRange {
        route: RouteId,
        index: usize,
        edge_count: usize,
    },

    /// Precomputed table does not match the graph
    #[error("inconsistent router snapshot: {0}")]
    InconsistentSnapshot(String),
}
