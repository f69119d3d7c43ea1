//! Fastest-route planning over a bus network.
//!
//! Stops and buses are turned into a weighted directed graph whose edges are
//! either waiting at a stop or riding one bus between two of its stops.
//! Shortest paths between every pair of vertices are computed once, so a
//! built [`TransportRouter`](transport::TransportRouter) answers each query
//! by walking a precomputed predecessor chain. A built router can be saved
//! to disk and reloaded without recomputation.
//!
//! Alongside the router, a [`TransportCatalog`](catalog::TransportCatalog)
//! keeps per-bus and per-stop statistics for `Bus` and `Stop` requests.

pub mod catalog;
pub mod descriptions;
pub mod graph;
pub mod requests;
pub mod router;
pub mod snapshot;
pub mod transport;
