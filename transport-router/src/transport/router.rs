//! Transport graph construction and itinerary reconstruction.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::descriptions::{Bus, BusesDict, StopsDict, compute_stops_distance};
use crate::graph::{DirectedWeightedGraph, Edge, EdgeId, GraphError, VertexId};
use crate::router::Router;

use super::{BusItem, RouteInfo, RouteItem, RoutingSettings, TransportError, WaitItem};

/// The two vertices owned by a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopVertexIds {
    /// Ready to board; bus edges leave from here.
    pub boarding: VertexId,
    /// Arrived at the stop; bus edges end here, journeys start and end here.
    pub arrival: VertexId,
}

/// Per-vertex information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexInfo {
    pub stop_name: String,
}

/// What a graph edge means, stored in lockstep with the graph's edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EdgeInfo {
    /// `arrival(stop) -> boarding(stop)`
    Wait,
    /// `boarding(stops[start_stop_idx]) -> arrival(stops[finish_stop_idx])`
    Bus {
        bus_name: String,
        span_count: usize,
        start_stop_idx: usize,
        finish_stop_idx: usize,
    },
}

/// Fastest-route index over a set of stops and buses.
///
/// Built once from complete descriptions; immutable afterwards. Queries
/// take `&self` and may run concurrently.
#[derive(Debug)]
pub struct TransportRouter {
    settings: RoutingSettings,
    router: Router,
    stops_vertex_ids: BTreeMap<String, StopVertexIds>,
    vertices_info: Vec<VertexInfo>,
    edges_info: Vec<EdgeInfo>,
}

impl TransportRouter {
    /// Builds the transport graph and its shortest-path index.
    ///
    /// Stops get vertex pairs in ascending name order: the `k`-th stop owns
    /// boarding vertex `2k` and arrival vertex `2k + 1`. Wait edges come
    /// first (one per stop, same order), then bus edges for buses in
    /// ascending name order.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the settings are invalid or a bus calls at a stop
    /// missing from `stops`.
    ///
    /// # Examples
    ///
    /// ```
    /// use transport_router::descriptions::{Bus, BusesDict, Point, Stop, StopsDict};
    /// use transport_router::transport::{RouteItem, RoutingSettings, TransportRouter};
    ///
    /// let mut stops = StopsDict::new();
    /// stops.insert(
    ///     "A".into(),
    ///     Stop::new("A", Point::new(0.0, 0.0)).with_road_distance("B", 2000),
    /// );
    /// stops.insert("B".into(), Stop::new("B", Point::new(0.0, 0.0)));
    ///
    /// let mut buses = BusesDict::new();
    /// buses.insert("1".into(), Bus::new("1", ["A", "B"], false));
    ///
    /// // Wait 6 minutes, ride at 60 km/h (1 km per minute)
    /// let settings = RoutingSettings::new(6, 60.0).unwrap();
    /// let router = TransportRouter::new(&stops, &buses, settings).unwrap();
    ///
    /// let route = router.find_route("A", "B").unwrap().unwrap();
    /// assert_eq!(route.total_time, 8.0);
    /// assert!(matches!(&route.items[0], RouteItem::Wait(w) if w.stop_name == "A"));
    /// assert!(matches!(&route.items[1], RouteItem::Bus(b) if b.span_count == 1));
    ///
    /// // Unknown stops are errors; unreachable ones are `None`
    /// assert!(router.find_route("A", "Z").is_err());
    /// ```
    pub fn new(
        stops: &StopsDict,
        buses: &BusesDict,
        settings: RoutingSettings,
    ) -> Result<Self, TransportError> {
        settings.validate()?;

        let vertex_count = stops.len() * 2;
        let mut builder = GraphBuilder {
            settings,
            graph: DirectedWeightedGraph::new(vertex_count),
            stops_vertex_ids: BTreeMap::new(),
            vertices_info: Vec::with_capacity(vertex_count),
            edges_info: Vec::new(),
        };

        builder.add_stops(stops)?;
        for bus in buses.values() {
            builder.add_bus(stops, bus)?;
        }

        let GraphBuilder {
            graph,
            stops_vertex_ids,
            vertices_info,
            edges_info,
            ..
        } = builder;
        debug_assert_eq!(graph.edge_count(), edges_info.len());

        debug!(
            stops = stops.len(),
            buses = buses.len(),
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "Transport graph built"
        );

        let router = Router::new(Arc::new(graph))?;

        Ok(Self {
            settings,
            router,
            stops_vertex_ids,
            vertices_info,
            edges_info,
        })
    }

    /// Assembles a router from already-validated parts.
    pub(super) fn from_parts(
        settings: RoutingSettings,
        router: Router,
        stops_vertex_ids: BTreeMap<String, StopVertexIds>,
        vertices_info: Vec<VertexInfo>,
        edges_info: Vec<EdgeInfo>,
    ) -> Self {
        Self {
            settings,
            router,
            stops_vertex_ids,
            vertices_info,
            edges_info,
        }
    }

    /// Finds the fastest itinerary from `stop_from` to `stop_to`.
    ///
    /// Returns `Ok(None)` if `stop_to` cannot be reached. A journey from a
    /// stop to itself is an empty itinerary taking no time.
    ///
    /// # Errors
    ///
    /// Returns `Err` if either stop is unknown.
    pub fn find_route(
        &self,
        stop_from: &str,
        stop_to: &str,
    ) -> Result<Option<RouteInfo>, TransportError> {
        let vertex_from = self.stop_vertex_ids(stop_from)?.arrival;
        let vertex_to = self.stop_vertex_ids(stop_to)?.arrival;

        let Some(route) = self.router.route(vertex_from, vertex_to)? else {
            trace!(from = stop_from, to = stop_to, "No route between stops");
            return Ok(None);
        };

        let mut items = Vec::with_capacity(route.edge_count());
        let mut total_time = 0.0;
        let mut at = vertex_from;

        for (position, edge_id) in route.edges()?.into_iter().enumerate() {
            let edge = self.graph().edge(edge_id)?;
            let info = self.edge_info(edge_id)?;
            debug_assert_eq!(edge.from, at, "route edges do not connect");
            at = edge.to;

            let item = match info {
                EdgeInfo::Wait => {
                    debug_assert!(position % 2 == 0, "wait leg out of turn");
                    RouteItem::Wait(WaitItem {
                        stop_name: self.vertices_info[edge.from.0].stop_name.clone(),
                        time: edge.weight,
                    })
                }
                EdgeInfo::Bus {
                    bus_name,
                    span_count,
                    start_stop_idx,
                    finish_stop_idx,
                } => {
                    debug_assert!(position % 2 == 1, "ride leg out of turn");
                    RouteItem::Bus(BusItem {
                        bus_name: bus_name.clone(),
                        time: edge.weight,
                        span_count: *span_count,
                        start_stop_idx: *start_stop_idx,
                        finish_stop_idx: *finish_stop_idx,
                    })
                }
            };
            total_time += item.time();
            items.push(item);
        }

        debug_assert_eq!(at, vertex_to, "route ends at the wrong vertex");
        debug_assert_eq!(total_time, route.weight(), "itinerary time drifted");

        trace!(
            from = stop_from,
            to = stop_to,
            total_time,
            legs = items.len(),
            "Route found"
        );

        Ok(Some(RouteInfo { total_time, items }))
    }

    /// Returns the routing settings.
    pub fn settings(&self) -> &RoutingSettings {
        &self.settings
    }

    /// Returns the transport graph.
    pub fn graph(&self) -> &DirectedWeightedGraph {
        self.router.graph()
    }

    /// Returns the shortest-path index.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Returns the number of stops.
    pub fn stop_count(&self) -> usize {
        self.stops_vertex_ids.len()
    }

    /// Looks up the vertices of a stop.
    pub fn stop_vertex_ids(&self, stop_name: &str) -> Result<StopVertexIds, TransportError> {
        self.stops_vertex_ids
            .get(stop_name)
            .copied()
            .ok_or_else(|| TransportError::StopNotFound(stop_name.to_string()))
    }

    /// Iterates over stops and their vertices, in name order.
    pub fn stops_vertex_ids(&self) -> impl Iterator<Item = (&str, StopVertexIds)> {
        self.stops_vertex_ids
            .iter()
            .map(|(name, ids)| (name.as_str(), *ids))
    }

    /// Returns the name of the stop owning `vertex`.
    pub fn vertex_stop_name(&self, vertex: VertexId) -> Option<&str> {
        self.vertices_info
            .get(vertex.0)
            .map(|info| info.stop_name.as_str())
    }

    /// Returns what an edge means.
    pub fn edge_info(&self, edge: EdgeId) -> Result<&EdgeInfo, TransportError> {
        self.edges_info
            .get(edge.0)
            .ok_or_else(|| {
                GraphError::EdgeOutOfRange {
                    edge,
                    edge_count: self.edges_info.len(),
                }
                .into()
            })
    }

    pub(super) fn vertices_info(&self) -> &[VertexInfo] {
        &self.vertices_info
    }

    pub(super) fn edges_info(&self) -> &[EdgeInfo] {
        &self.edges_info
    }
}

/// Mutable state while the graph is being filled.
struct GraphBuilder {
    settings: RoutingSettings,
    graph: DirectedWeightedGraph,
    stops_vertex_ids: BTreeMap<String, StopVertexIds>,
    vertices_info: Vec<VertexInfo>,
    edges_info: Vec<EdgeInfo>,
}

impl GraphBuilder {
    fn add_stops(&mut self, stops: &StopsDict) -> Result<(), TransportError> {
        for (k, stop_name) in stops.keys().enumerate() {
            let ids = StopVertexIds {
                boarding: VertexId(2 * k),
                arrival: VertexId(2 * k + 1),
            };
            self.stops_vertex_ids.insert(stop_name.clone(), ids);
            for _ in 0..2 {
                self.vertices_info.push(VertexInfo {
                    stop_name: stop_name.clone(),
                });
            }

            self.add_edge(
                Edge {
                    from: ids.arrival,
                    to: ids.boarding,
                    weight: self.settings.wait_weight(),
                },
                EdgeInfo::Wait,
            )?;
        }
        Ok(())
    }

    fn add_bus(&mut self, stops: &StopsDict, bus: &Bus) -> Result<(), TransportError> {
        let lookup = |stop_name: &String| {
            stops
                .get(stop_name)
                .zip(self.stops_vertex_ids.get(stop_name).copied())
                .ok_or_else(|| TransportError::UnknownStop {
                    bus: bus.name.clone(),
                    stop: stop_name.clone(),
                })
        };
        let route: Vec<_> = bus.stops.iter().map(lookup).collect::<Result<_, _>>()?;

        if route.len() <= 1 {
            return Ok(());
        }

        for start_stop_idx in 0..route.len() - 1 {
            let start_vertex = route[start_stop_idx].1.boarding;
            let mut total_distance = 0.0;

            for finish_stop_idx in start_stop_idx + 1..route.len() {
                let (prev_stop, _) = route[finish_stop_idx - 1];
                let (finish_stop, finish_ids) = route[finish_stop_idx];
                total_distance += compute_stops_distance(prev_stop, finish_stop);

                self.add_edge(
                    Edge {
                        from: start_vertex,
                        to: finish_ids.arrival,
                        weight: self.settings.ride_minutes(total_distance),
                    },
                    EdgeInfo::Bus {
                        bus_name: bus.name.clone(),
                        span_count: finish_stop_idx - start_stop_idx,
                        start_stop_idx,
                        finish_stop_idx,
                    },
                )?;
            }
        }
        Ok(())
    }

    fn add_edge(&mut self, edge: Edge, info: EdgeInfo) -> Result<EdgeId, TransportError> {
        let id = self.graph.add_edge(edge)?;
        self.edges_info.push(info);
        debug_assert_eq!(id.0 + 1, self.edges_info.len());
        Ok(id)
    }
}
