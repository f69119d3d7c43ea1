//! Adjacency-list graph keyed by dense ids.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::GraphError;

/// Edge weight (minutes, for the transport graph).
pub type Weight = f64;

/// Index of a vertex in a [`DirectedWeightedGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub usize);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of an edge in a [`DirectedWeightedGraph`], in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub usize);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
    pub weight: Weight,
}

/// Serializable form of a graph: the edge list and the per-vertex
/// incidence lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub edges: Vec<Edge>,
    pub incidence_lists: Vec<Vec<EdgeId>>,
}

/// A directed weighted multigraph with a fixed vertex count.
///
/// # Invariants
///
/// - Edge ids are `0..edge_count()` in insertion order
/// - Every edge id appears exactly once, in the incidence list of its `from`
/// - Both endpoints of every edge are below `vertex_count()`
#[derive(Debug, Clone, Default)]
pub struct DirectedWeightedGraph {
    edges: Vec<Edge>,
    incidence_lists: Vec<Vec<EdgeId>>,
}

impl DirectedWeightedGraph {
    /// Creates a graph with `vertex_count` vertices and no edges.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            edges: Vec::new(),
            incidence_lists: vec![Vec::new(); vertex_count],
        }
    }

    /// Appends an edge and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `Err` if either endpoint is not a vertex of this graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use transport_router::graph::{DirectedWeightedGraph, Edge, EdgeId, VertexId};
    ///
    /// let mut graph = DirectedWeightedGraph::new(2);
    /// let id = graph
    ///     .add_edge(Edge { from: VertexId(0), to: VertexId(1), weight: 2.5 })
    ///     .unwrap();
    /// assert_eq!(id, EdgeId(0));
    /// assert_eq!(graph.incident_edges(VertexId(0)).unwrap(), &[EdgeId(0)]);
    ///
    /// // Vertex 2 does not exist
    /// assert!(graph
    ///     .add_edge(Edge { from: VertexId(0), to: VertexId(2), weight: 1.0 })
    ///     .is_err());
    /// ```
    pub fn add_edge(&mut self, edge: Edge) -> Result<EdgeId, GraphError> {
        self.check_vertex(edge.from)?;
        self.check_vertex(edge.to)?;

        let id = EdgeId(self.edges.len());
        self.edges.push(edge);
        self.incidence_lists[edge.from.0].push(id);
        Ok(id)
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.incidence_lists.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Looks up an edge by id.
    pub fn edge(&self, id: EdgeId) -> Result<&Edge, GraphError> {
        self.edges.get(id.0).ok_or(GraphError::EdgeOutOfRange {
            edge: id,
            edge_count: self.edges.len(),
        })
    }

    /// Returns the ids of edges leaving `vertex`, in insertion order.
    pub fn incident_edges(&self, vertex: VertexId) -> Result<&[EdgeId], GraphError> {
        self.incidence_lists
            .get(vertex.0)
            .map(Vec::as_slice)
            .ok_or(GraphError::VertexOutOfRange {
                vertex,
                vertex_count: self.incidence_lists.len(),
            })
    }

    /// Iterates over all edges with their ids.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i), e))
    }

    /// Captures the edge list and incidence lists.
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            edges: self.edges.clone(),
            incidence_lists: self.incidence_lists.clone(),
        }
    }

    /// Rebuilds a graph from a snapshot, checking every structural invariant.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self, GraphError> {
        let GraphSnapshot {
            edges,
            incidence_lists,
        } = snapshot;
        let vertex_count = incidence_lists.len();

        for (i, edge) in edges.iter().enumerate() {
            if edge.from.0 >= vertex_count || edge.to.0 >= vertex_count {
                return Err(GraphError::InconsistentSnapshot(format!(
                    "edge {i} ({} -> {}) leaves the {vertex_count} vertices",
                    edge.from, edge.to
                )));
            }
        }

        let mut seen = vec![false; edges.len()];
        for (vertex, list) in incidence_lists.iter().enumerate() {
            for &id in list {
                let edge = edges.get(id.0).ok_or_else(|| {
                    GraphError::InconsistentSnapshot(format!(
                        "vertex {vertex} lists missing edge {id}"
                    ))
                })?;
                if edge.from.0 != vertex {
                    return Err(GraphError::InconsistentSnapshot(format!(
                        "edge {id} listed under vertex {vertex} but starts at {}",
                        edge.from
                    )));
                }
                if std::mem::replace(&mut seen[id.0], true) {
                    return Err(GraphError::InconsistentSnapshot(format!(
                        "edge {id} listed twice"
                    )));
                }
            }
        }

        if let Some(missing) = seen.iter().position(|s| !s) {
            return Err(GraphError::InconsistentSnapshot(format!(
                "edge {missing} missing from incidence lists"
            )));
        }

        Ok(Self {
            edges,
            incidence_lists,
        })
    }

    fn check_vertex(&self, vertex: VertexId) -> Result<(), GraphError> {
        if vertex.0 < self.incidence_lists.len() {
            Ok(())
        } else {
            Err(GraphError::VertexOutOfRange {
                vertex,
                vertex_count: self.incidence_lists.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: usize, to: usize, weight: Weight) -> Edge {
        Edge {
            from: VertexId(from),
            to: VertexId(to),
            weight,
        }
    }

    #[test]
    fn new_graph_is_empty() {
        let graph = DirectedWeightedGraph::new(3);
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 0);
        for v in 0..3 {
            assert!(graph.incident_edges(VertexId(v)).unwrap().is_empty());
        }
    }

    #[test]
    fn edge_ids_follow_insertion_order() {
        let mut graph = DirectedWeightedGraph::new(3);
        assert_eq!(graph.add_edge(edge(0, 1, 1.0)).unwrap(), EdgeId(0));
        assert_eq!(graph.add_edge(edge(1, 2, 2.0)).unwrap(), EdgeId(1));
        assert_eq!(graph.add_edge(edge(0, 2, 3.0)).unwrap(), EdgeId(2));

        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edge(EdgeId(1)).unwrap(), &edge(1, 2, 2.0));
        assert_eq!(
            graph.incident_edges(VertexId(0)).unwrap(),
            &[EdgeId(0), EdgeId(2)]
        );
        assert_eq!(graph.incident_edges(VertexId(1)).unwrap(), &[EdgeId(1)]);
        assert!(graph.incident_edges(VertexId(2)).unwrap().is_empty());
    }

    #[test]
    fn parallel_edges_and_self_loops_allowed() {
        let mut graph = DirectedWeightedGraph::new(2);
        graph.add_edge(edge(0, 1, 1.0)).unwrap();
        graph.add_edge(edge(0, 1, 0.5)).unwrap();
        graph.add_edge(edge(1, 1, 0.0)).unwrap();

        assert_eq!(graph.incident_edges(VertexId(0)).unwrap().len(), 2);
        assert_eq!(graph.incident_edges(VertexId(1)).unwrap(), &[EdgeId(2)]);
    }

    #[test]
    fn add_edge_rejects_unknown_vertices() {
        let mut graph = DirectedWeightedGraph::new(2);

        let err = graph.add_edge(edge(2, 0, 1.0)).unwrap_err();
        assert_eq!(
            err,
            GraphError::VertexOutOfRange {
                vertex: VertexId(2),
                vertex_count: 2
            }
        );
        assert!(graph.add_edge(edge(0, 5, 1.0)).is_err());

        // Failed inserts leave the graph untouched
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.incident_edges(VertexId(0)).unwrap().is_empty());
    }

    #[test]
    fn lookups_out_of_range() {
        let mut graph = DirectedWeightedGraph::new(1);
        graph.add_edge(edge(0, 0, 1.0)).unwrap();

        assert!(matches!(
            graph.edge(EdgeId(1)),
            Err(GraphError::EdgeOutOfRange { edge_count: 1, .. })
        ));
        assert!(matches!(
            graph.incident_edges(VertexId(1)),
            Err(GraphError::VertexOutOfRange { vertex_count: 1, .. })
        ));
    }

    #[test]
    fn edges_iterator() {
        let mut graph = DirectedWeightedGraph::new(2);
        graph.add_edge(edge(0, 1, 4.0)).unwrap();
        graph.add_edge(edge(1, 0, 5.0)).unwrap();

        let weights: Vec<_> = graph.edges().map(|(id, e)| (id, e.weight)).collect();
        assert_eq!(weights, vec![(EdgeId(0), 4.0), (EdgeId(1), 5.0)]);
    }

    #[test]
    fn snapshot_roundtrip() {
        let mut graph = DirectedWeightedGraph::new(3);
        graph.add_edge(edge(0, 1, 1.5)).unwrap();
        graph.add_edge(edge(2, 0, 0.1)).unwrap();
        graph.add_edge(edge(0, 2, 7.0)).unwrap();

        let snapshot = graph.to_snapshot();
        let restored = DirectedWeightedGraph::from_snapshot(snapshot.clone()).unwrap();

        assert_eq!(restored.to_snapshot(), snapshot);
        assert_eq!(restored.vertex_count(), 3);
        assert_eq!(
            restored.incident_edges(VertexId(0)).unwrap(),
            &[EdgeId(0), EdgeId(2)]
        );
    }

    #[test]
    fn snapshot_rejects_misplaced_edge() {
        let snapshot = GraphSnapshot {
            edges: vec![edge(0, 1, 1.0)],
            incidence_lists: vec![vec![], vec![EdgeId(0)]],
        };
        assert!(matches!(
            DirectedWeightedGraph::from_snapshot(snapshot),
            Err(GraphError::InconsistentSnapshot(_))
        ));
    }

    #[test]
    fn snapshot_rejects_missing_and_duplicate_edges() {
        let missing = GraphSnapshot {
            edges: vec![edge(0, 1, 1.0), edge(1, 0, 1.0)],
            incidence_lists: vec![vec![EdgeId(0)], vec![]],
        };
        assert!(DirectedWeightedGraph::from_snapshot(missing).is_err());

        let duplicate = GraphSnapshot {
            edges: vec![edge(0, 1, 1.0)],
            incidence_lists: vec![vec![EdgeId(0), EdgeId(0)], vec![]],
        };
        assert!(DirectedWeightedGraph::from_snapshot(duplicate).is_err());

        let dangling = GraphSnapshot {
            edges: vec![],
            incidence_lists: vec![vec![EdgeId(0)]],
        };
        assert!(DirectedWeightedGraph::from_snapshot(dangling).is_err());
    }

    #[test]
    fn snapshot_rejects_endpoint_out_of_range() {
        let snapshot = GraphSnapshot {
            edges: vec![edge(0, 3, 1.0)],
            incidence_lists: vec![vec![EdgeId(0)], vec![]],
        };
        assert!(DirectedWeightedGraph::from_snapshot(snapshot).is_err());
    }
}
