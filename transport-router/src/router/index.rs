//! All-pairs shortest-path table and route cache.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::graph::{DirectedWeightedGraph, EdgeId, VertexId, Weight};

use super::{RouterError, ScopedRoute};

/// Opaque identifier of a route held in the router's cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteId(pub u64);

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A route materialized in the cache.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteHandle {
    pub id: RouteId,
    pub weight: Weight,
    pub edge_count: usize,
}

/// Best known path from one source to one target.
///
/// `prev_edge` is the last edge of the path, `None` only for the source
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteInternalData {
    pub weight: Weight,
    pub prev_edge: Option<EdgeId>,
}

/// Serializable form of the precomputed table, indexed `[source][target]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterSnapshot {
    pub routes_internal_data: Vec<Vec<Option<RouteInternalData>>>,
}

#[derive(Debug, Default)]
struct RouteCache {
    next_id: u64,
    routes: HashMap<RouteId, Vec<EdgeId>>,
}

/// Shortest-path index over a shared graph.
///
/// Queries take `&self`; the route cache is behind a mutex, so a router
/// can be shared between threads.
#[derive(Debug)]
pub struct Router {
    graph: Arc<DirectedWeightedGraph>,
    routes_internal_data: Vec<Vec<Option<RouteInternalData>>>,
    cache: Mutex<RouteCache>,
}

/// Heap entry ordered so that `BinaryHeap` pops the lightest weight first,
/// then the lowest vertex id.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    weight: Weight,
    vertex: VertexId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl Router {
    /// Precomputes shortest paths between every pair of vertices.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any edge weight is negative or NaN.
    pub fn new(graph: Arc<DirectedWeightedGraph>) -> Result<Self, RouterError> {
        for (id, edge) in graph.edges() {
            if edge.weight.is_nan() || edge.weight < 0.0 {
                return Err(RouterError::InvalidWeight {
                    edge: id,
                    weight: edge.weight,
                });
            }
        }

        let routes_internal_data = (0..graph.vertex_count())
            .map(|source| shortest_paths_from(&graph, VertexId(source)))
            .collect();

        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "Router index built"
        );

        Ok(Self {
            graph,
            routes_internal_data,
            cache: Mutex::new(RouteCache::default()),
        })
    }

    /// Restores a router from a previously computed table.
    ///
    /// The table must have one row and one column per graph vertex, and
    /// every predecessor edge must exist and end at its column's vertex.
    pub fn from_snapshot(
        graph: Arc<DirectedWeightedGraph>,
        snapshot: RouterSnapshot,
    ) -> Result<Self, RouterError> {
        let vertex_count = graph.vertex_count();
        let table = snapshot.routes_internal_data;

        if table.len() != vertex_count {
            return Err(RouterError::InconsistentSnapshot(format!(
                "{} rows for {vertex_count} vertices",
                table.len()
            )));
        }

        for (source, row) in table.iter().enumerate() {
            if row.len() != vertex_count {
                return Err(RouterError::InconsistentSnapshot(format!(
                    "row {source} has {} entries for {vertex_count} vertices",
                    row.len()
                )));
            }
            for (target, data) in row.iter().enumerate() {
                let Some(RouteInternalData {
                    prev_edge: Some(prev_edge),
                    ..
                }) = data
                else {
                    continue;
                };
                let ends_here = graph
                    .edge(*prev_edge)
                    .is_ok_and(|edge| edge.to == VertexId(target));
                if !ends_here {
                    return Err(RouterError::InconsistentSnapshot(format!(
                        "entry {source} -> {target} has predecessor edge {prev_edge} \
                         which does not end at {target}"
                    )));
                }
            }
        }

        Ok(Self {
            graph,
            routes_internal_data: table,
            cache: Mutex::new(RouteCache::default()),
        })
    }

    /// Captures the precomputed table.
    pub fn to_snapshot(&self) -> RouterSnapshot {
        RouterSnapshot {
            routes_internal_data: self.routes_internal_data.clone(),
        }
    }

    /// Returns the graph this router indexes.
    pub fn graph(&self) -> &Arc<DirectedWeightedGraph> {
        &self.graph
    }

    /// Materializes the cheapest path from `from` to `to`.
    ///
    /// Returns `Ok(None)` when `to` is unreachable. Every returned handle
    /// must eventually be passed to [`release_route`](Self::release_route);
    /// prefer [`route`](Self::route), which does that automatically.
    pub fn build_route(
        &self,
        from: VertexId,
        to: VertexId,
    ) -> Result<Option<RouteHandle>, RouterError> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;

        let row = &self.routes_internal_data[from.0];
        let Some(data) = row[to.0] else {
            trace!(from = from.0, to = to.0, "No route");
            return Ok(None);
        };

        let mut edges = Vec::new();
        let mut prev_edge = data.prev_edge;
        while let Some(edge_id) = prev_edge {
            if edges.len() == self.graph.edge_count() {
                return Err(RouterError::InconsistentSnapshot(format!(
                    "predecessor chain {from} -> {to} does not terminate"
                )));
            }
            edges.push(edge_id);
            let edge = self
                .graph
                .edge(edge_id)
                .map_err(|e| RouterError::InconsistentSnapshot(e.to_string()))?;
            prev_edge = row[edge.from.0].and_then(|d| d.prev_edge);
        }
        edges.reverse();

        let edge_count = edges.len();
        let mut cache = self.lock_cache();
        let id = RouteId(cache.next_id);
        cache.next_id += 1;
        cache.routes.insert(id, edges);

        trace!(
            from = from.0,
            to = to.0,
            route = id.0,
            weight = data.weight,
            edge_count,
            "Route built"
        );

        Ok(Some(RouteHandle {
            id,
            weight: data.weight,
            edge_count,
        }))
    }

    /// Returns the `index`-th edge (0-based, in travel order) of a cached route.
    pub fn route_edge(&self, route: RouteId, index: usize) -> Result<EdgeId, RouterError> {
        let cache = self.lock_cache();
        let edges = cache
            .routes
            .get(&route)
            .ok_or(RouterError::UnknownRoute(route))?;
        edges
            .get(index)
            .copied()
            .ok_or(RouterError::EdgeIndexOutOfRange {
                route,
                index,
                edge_count: edges.len(),
            })
    }

    /// Returns every edge of a cached route, in travel order.
    pub fn route_edges(&self, route: RouteId) -> Result<Vec<EdgeId>, RouterError> {
        self.lock_cache()
            .routes
            .get(&route)
            .cloned()
            .ok_or(RouterError::UnknownRoute(route))
    }

    /// Drops a cached route. Releasing an unknown route is a no-op.
    pub fn release_route(&self, route: RouteId) {
        self.lock_cache().routes.remove(&route);
    }

    /// Builds a route whose cache entry is released when the guard drops.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use transport_router::graph::{DirectedWeightedGraph, Edge, EdgeId, VertexId};
    /// use transport_router::router::Router;
    ///
    /// let mut graph = DirectedWeightedGraph::new(3);
    /// graph.add_edge(Edge { from: VertexId(0), to: VertexId(1), weight: 1.0 }).unwrap();
    /// graph.add_edge(Edge { from: VertexId(1), to: VertexId(2), weight: 2.0 }).unwrap();
    /// let router = Router::new(Arc::new(graph)).unwrap();
    ///
    /// {
    ///     let route = router.route(VertexId(0), VertexId(2)).unwrap().unwrap();
    ///     assert_eq!(route.weight(), 3.0);
    ///     assert_eq!(route.edges().unwrap(), vec![EdgeId(0), EdgeId(1)]);
    ///     assert_eq!(router.cached_route_count(), 1);
    /// }
    /// assert_eq!(router.cached_route_count(), 0);
    ///
    /// // Nothing leads back to vertex 0
    /// assert!(router.route(VertexId(2), VertexId(0)).unwrap().is_none());
    /// ```
    pub fn route(
        &self,
        from: VertexId,
        to: VertexId,
    ) -> Result<Option<ScopedRoute<'_>>, RouterError> {
        Ok(self
            .build_route(from, to)?
            .map(|handle| ScopedRoute::new(self, handle)))
    }

    /// Number of routes currently held in the cache.
    pub fn cached_route_count(&self) -> usize {
        self.lock_cache().routes.len()
    }

    fn check_vertex(&self, vertex: VertexId) -> Result<(), RouterError> {
        if vertex.0 < self.routes_internal_data.len() {
            Ok(())
        } else {
            Err(RouterError::VertexOutOfRange {
                vertex,
                vertex_count: self.routes_internal_data.len(),
            })
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, RouteCache> {
        // The cache holds no invariant a panicking holder could break.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Single-source Dijkstra producing one row of the table.
fn shortest_paths_from(
    graph: &DirectedWeightedGraph,
    source: VertexId,
) -> Vec<Option<RouteInternalData>> {
    let mut row: Vec<Option<RouteInternalData>> = vec![None; graph.vertex_count()];
    let mut settled = vec![false; graph.vertex_count()];
    let mut heap = BinaryHeap::new();

    row[source.0] = Some(RouteInternalData {
        weight: 0.0,
        prev_edge: None,
    });
    heap.push(QueueEntry {
        weight: 0.0,
        vertex: source,
    });

    while let Some(QueueEntry { weight, vertex }) = heap.pop() {
        if std::mem::replace(&mut settled[vertex.0], true) {
            continue;
        }

        for &edge_id in graph.incident_edges(vertex).unwrap_or(&[]) {
            let Ok(edge) = graph.edge(edge_id) else {
                continue;
            };
            let candidate = weight + edge.weight;
            let improves = match row[edge.to.0] {
                None => true,
                Some(known) => candidate < known.weight,
            };
            if improves && !settled[edge.to.0] {
                row[edge.to.0] = Some(RouteInternalData {
                    weight: candidate,
                    prev_edge: Some(edge_id),
                });
                heap.push(QueueEntry {
                    weight: candidate,
                    vertex: edge.to,
                });
            }
        }
    }

    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;

    fn graph(vertex_count: usize, edges: &[(usize, usize, f64)]) -> Arc<DirectedWeightedGraph> {
        let mut graph = DirectedWeightedGraph::new(vertex_count);
        for &(from, to, weight) in edges {
            graph
                .add_edge(Edge {
                    from: VertexId(from),
                    to: VertexId(to),
                    weight,
                })
                .unwrap();
        }
        Arc::new(graph)
    }

    fn path(router: &Router, from: usize, to: usize) -> Option<(f64, Vec<EdgeId>)> {
        let route = router.route(VertexId(from), VertexId(to)).unwrap()?;
        Some((route.weight(), route.edges().unwrap()))
    }

    #[test]
    fn picks_cheapest_path() {
        // 0 -> 1 -> 3 costs 3, 0 -> 2 -> 3 costs 2, 0 -> 3 costs 10
        let router = Router::new(graph(
            4,
            &[
                (0, 1, 1.0),
                (1, 3, 2.0),
                (0, 2, 1.5),
                (2, 3, 0.5),
                (0, 3, 10.0),
            ],
        ))
        .unwrap();

        assert_eq!(
            path(&router, 0, 3),
            Some((2.0, vec![EdgeId(2), EdgeId(3)]))
        );
        assert_eq!(path(&router, 1, 3), Some((2.0, vec![EdgeId(1)])));
    }

    #[test]
    fn same_vertex_is_empty_route() {
        let router = Router::new(graph(2, &[(0, 1, 1.0), (1, 0, 1.0)])).unwrap();

        let handle = router.build_route(VertexId(1), VertexId(1)).unwrap().unwrap();
        assert_eq!(handle.weight, 0.0);
        assert_eq!(handle.edge_count, 0);
        router.release_route(handle.id);
    }

    #[test]
    fn unreachable_is_none() {
        let router = Router::new(graph(3, &[(0, 1, 1.0)])).unwrap();

        assert!(router.build_route(VertexId(1), VertexId(0)).unwrap().is_none());
        assert!(router.build_route(VertexId(0), VertexId(2)).unwrap().is_none());
        assert_eq!(router.cached_route_count(), 0);
    }

    #[test]
    fn ties_prefer_first_inserted_edge() {
        // Two parallel edges of equal weight: the first inserted wins
        let router = Router::new(graph(2, &[(0, 1, 1.0), (0, 1, 1.0)])).unwrap();
        assert_eq!(path(&router, 0, 1), Some((1.0, vec![EdgeId(0)])));

        // Equal-weight paths through 1 and 2: vertex 1 settles first and
        // claims vertex 3 before vertex 2 is expanded
        let router = Router::new(graph(
            4,
            &[(0, 2, 1.0), (0, 1, 1.0), (2, 3, 1.0), (1, 3, 1.0)],
        ))
        .unwrap();
        assert_eq!(
            path(&router, 0, 3),
            Some((2.0, vec![EdgeId(1), EdgeId(3)]))
        );
    }

    #[test]
    fn zero_weight_cycle_terminates() {
        let router = Router::new(graph(
            3,
            &[(0, 1, 0.0), (1, 0, 0.0), (1, 2, 0.0), (2, 2, 0.0)],
        ))
        .unwrap();

        assert_eq!(
            path(&router, 0, 2),
            Some((0.0, vec![EdgeId(0), EdgeId(2)]))
        );
        assert_eq!(path(&router, 0, 0), Some((0.0, vec![])));
    }

    #[test]
    fn rejects_invalid_weights() {
        let err = Router::new(graph(2, &[(0, 1, 1.0), (1, 0, -0.5)])).unwrap_err();
        assert_eq!(
            err,
            RouterError::InvalidWeight {
                edge: EdgeId(1),
                weight: -0.5
            }
        );

        assert!(Router::new(graph(2, &[(0, 1, f64::NAN)])).is_err());
    }

    #[test]
    fn rejects_unknown_vertices() {
        let router = Router::new(graph(2, &[(0, 1, 1.0)])).unwrap();
        assert!(matches!(
            router.build_route(VertexId(0), VertexId(2)),
            Err(RouterError::VertexOutOfRange { vertex_count: 2, .. })
        ));
        assert!(router.build_route(VertexId(9), VertexId(0)).is_err());
    }

    #[test]
    fn manual_handles_are_distinct_and_released() {
        let router = Router::new(graph(3, &[(0, 1, 1.0), (1, 2, 1.0)])).unwrap();

        let first = router.build_route(VertexId(0), VertexId(2)).unwrap().unwrap();
        let second = router.build_route(VertexId(0), VertexId(1)).unwrap().unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(router.cached_route_count(), 2);

        assert_eq!(router.route_edge(first.id, 0).unwrap(), EdgeId(0));
        assert_eq!(router.route_edge(first.id, 1).unwrap(), EdgeId(1));
        assert_eq!(
            router.route_edge(first.id, 2),
            Err(RouterError::EdgeIndexOutOfRange {
                route: first.id,
                index: 2,
                edge_count: 2
            })
        );

        router.release_route(first.id);
        assert_eq!(
            router.route_edge(first.id, 0),
            Err(RouterError::UnknownRoute(first.id))
        );
        assert_eq!(router.route_edge(second.id, 0).unwrap(), EdgeId(0));

        router.release_route(second.id);
        router.release_route(second.id);
        assert_eq!(router.cached_route_count(), 0);
    }

    #[test]
    fn route_ids_are_not_reused() {
        let router = Router::new(graph(2, &[(0, 1, 1.0)])).unwrap();

        let first = router.build_route(VertexId(0), VertexId(1)).unwrap().unwrap();
        router.release_route(first.id);
        let second = router.build_route(VertexId(0), VertexId(1)).unwrap().unwrap();
        assert_ne!(first.id, second.id);
        router.release_route(second.id);
    }

    #[test]
    fn snapshot_roundtrip() {
        let graph = graph(3, &[(0, 1, 1.0), (1, 2, 2.0), (2, 0, 4.0)]);
        let router = Router::new(graph.clone()).unwrap();

        let restored = Router::from_snapshot(graph, router.to_snapshot()).unwrap();

        assert_eq!(restored.to_snapshot(), router.to_snapshot());
        for from in 0..3 {
            for to in 0..3 {
                assert_eq!(path(&restored, from, to), path(&router, from, to));
            }
        }
    }

    #[test]
    fn snapshot_rejects_wrong_shape() {
        let graph = graph(2, &[(0, 1, 1.0)]);
        let router = Router::new(graph.clone()).unwrap();

        let mut short = router.to_snapshot();
        short.routes_internal_data.pop();
        assert!(matches!(
            Router::from_snapshot(graph.clone(), short),
            Err(RouterError::InconsistentSnapshot(_))
        ));

        let mut narrow = router.to_snapshot();
        narrow.routes_internal_data[1].pop();
        assert!(Router::from_snapshot(graph.clone(), narrow).is_err());

        let mut wrong_edge = router.to_snapshot();
        wrong_edge.routes_internal_data[0][0] = Some(RouteInternalData {
            weight: 0.0,
            prev_edge: Some(EdgeId(0)),
        });
        assert!(Router::from_snapshot(graph, wrong_edge).is_err());
    }

    #[test]
    fn router_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Router>();
    }
}
