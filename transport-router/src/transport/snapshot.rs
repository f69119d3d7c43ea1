//! Serializable form of a built [`TransportRouter`].

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::graph::{DirectedWeightedGraph, GraphSnapshot, VertexId};
use crate::router::{Router, RouterSnapshot};

use super::{EdgeInfo, RoutingSettings, StopVertexIds, TransportError, TransportRouter, VertexInfo};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopVertexIdsEntry {
    pub stop_name: String,
    pub boarding: VertexId,
    pub arrival: VertexId,
}

/// Everything needed to answer queries without rebuilding.
///
/// Restoring a snapshot reproduces vertex ids, edge ids and the
/// precomputed table exactly, so answers are bit-identical to the router
/// that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportRouterSnapshot {
    pub routing_settings: RoutingSettings,
    pub graph: GraphSnapshot,
    pub stops_vertex_ids: Vec<StopVertexIdsEntry>,
    pub vertices_info: Vec<VertexInfo>,
    pub edges_info: Vec<EdgeInfo>,
    pub router: RouterSnapshot,
}

impl TransportRouter {
    /// Captures the router's state.
    pub fn to_snapshot(&self) -> TransportRouterSnapshot {
        TransportRouterSnapshot {
            routing_settings: *self.settings(),
            graph: self.graph().to_snapshot(),
            stops_vertex_ids: self
                .stops_vertex_ids()
                .map(|(stop_name, ids)| StopVertexIdsEntry {
                    stop_name: stop_name.to_string(),
                    boarding: ids.boarding,
                    arrival: ids.arrival,
                })
                .collect(),
            vertices_info: self.vertices_info().to_vec(),
            edges_info: self.edges_info().to_vec(),
            router: self.router().to_snapshot(),
        }
    }

    /// Restores a router from a snapshot without recomputing anything.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the snapshot's tables disagree with each other.
    pub fn from_snapshot(snapshot: TransportRouterSnapshot) -> Result<Self, TransportError> {
        let TransportRouterSnapshot {
            routing_settings,
            graph,
            stops_vertex_ids,
            vertices_info,
            edges_info,
            router,
        } = snapshot;

        routing_settings.validate()?;
        let graph = DirectedWeightedGraph::from_snapshot(graph)?;

        if vertices_info.len() != graph.vertex_count() {
            return Err(TransportError::InvalidSnapshot(format!(
                "{} vertex records for {} vertices",
                vertices_info.len(),
                graph.vertex_count()
            )));
        }
        if edges_info.len() != graph.edge_count() {
            return Err(TransportError::InvalidSnapshot(format!(
                "{} edge records for {} edges",
                edges_info.len(),
                graph.edge_count()
            )));
        }
        if stops_vertex_ids.len() * 2 != graph.vertex_count() {
            return Err(TransportError::InvalidSnapshot(format!(
                "{} stops for {} vertices",
                stops_vertex_ids.len(),
                graph.vertex_count()
            )));
        }

        let mut stops = BTreeMap::new();
        for entry in stops_vertex_ids {
            for vertex in [entry.boarding, entry.arrival] {
                let owner = vertices_info.get(vertex.0).map(|info| &info.stop_name);
                if owner != Some(&entry.stop_name) {
                    return Err(TransportError::InvalidSnapshot(format!(
                        "vertex {vertex} does not belong to stop {}",
                        entry.stop_name
                    )));
                }
            }
            if entry.boarding == entry.arrival {
                return Err(TransportError::InvalidSnapshot(format!(
                    "stop {} boards and arrives at vertex {}",
                    entry.stop_name, entry.boarding
                )));
            }
            let ids = StopVertexIds {
                boarding: entry.boarding,
                arrival: entry.arrival,
            };
            if stops.insert(entry.stop_name.clone(), ids).is_some() {
                return Err(TransportError::InvalidSnapshot(format!(
                    "stop {} listed twice",
                    entry.stop_name
                )));
            }
        }

        check_edge_records(&graph, &stops, &edges_info)?;

        let router = Router::from_snapshot(Arc::new(graph), router)?;

        Ok(TransportRouter::from_parts(
            routing_settings,
            router,
            stops,
            vertices_info,
            edges_info,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VertexRole<'a> {
    Boarding(&'a str),
    Arrival(&'a str),
}

/// Checks that every edge record describes the edge it sits next to:
/// waits run from a stop's arrival vertex to its own boarding vertex, rides
/// run from a boarding vertex to an arrival vertex over a positive span.
fn check_edge_records(
    graph: &DirectedWeightedGraph,
    stops: &BTreeMap<String, StopVertexIds>,
    edges_info: &[EdgeInfo],
) -> Result<(), TransportError> {
    let mut roles = vec![None; graph.vertex_count()];
    for (stop_name, ids) in stops {
        for (vertex, role) in [
            (ids.boarding, VertexRole::Boarding(stop_name.as_str())),
            (ids.arrival, VertexRole::Arrival(stop_name.as_str())),
        ] {
            if let Some(slot) = roles.get_mut(vertex.0) {
                *slot = Some(role);
            }
        }
    }

    for ((id, edge), info) in graph.edges().zip(edges_info) {
        let from = roles.get(edge.from.0).copied().flatten();
        let to = roles.get(edge.to.0).copied().flatten();
        let matches = match info {
            EdgeInfo::Wait => matches!(
                (from, to),
                (Some(VertexRole::Arrival(a)), Some(VertexRole::Boarding(b))) if a == b
            ),
            EdgeInfo::Bus {
                span_count,
                start_stop_idx,
                finish_stop_idx,
                ..
            } => {
                let ends = matches!(
                    (from, to),
                    (Some(VertexRole::Boarding(_)), Some(VertexRole::Arrival(_)))
                );
                let span = finish_stop_idx.checked_sub(*start_stop_idx);
                ends && *span_count > 0 && span == Some(*span_count)
            }
        };
        if !matches {
            return Err(TransportError::InvalidSnapshot(format!(
                "edge {id} from {} to {} does not match its record {info:?}",
                edge.from, edge.to
            )));
        }
    }
    Ok(())
}
