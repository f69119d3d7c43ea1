//! Directed weighted graph.
//!
//! A build-once, query-many multigraph. Vertices and edges are dense
//! integer ids into flat arrays; edges can be appended but never removed.

mod directed;
mod error;

pub use directed::{DirectedWeightedGraph, Edge, EdgeId, GraphSnapshot, VertexId, Weight};
pub use error::GraphError;
