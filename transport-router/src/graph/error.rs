//! Graph error types.

use super::{EdgeId, VertexId};

/// Errors from graph construction and lookup.
///
/// A correct caller never sees these: they signal an index computed
/// against the wrong graph, or a corrupted snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Vertex id is not below the vertex count
    #[error("vertex {vertex} out of range (vertex count {vertex_count})")]
    VertexOutOfRange {
        vertex: VertexId,
        vertex_count: usize,
    },

    /// Edge id is not below the edge count
    #[error("edge {edge} out of range (edge count {edge_count})")]
    EdgeOutOfRange { edge: EdgeId, edge_count: usize },

    /// Snapshot edges and incidence lists disagree
    #[error("inconsistent graph snapshot: {0}")]
    InconsistentSnapshot(String),
}
