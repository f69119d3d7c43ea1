//! Transport routing over stops and buses.
//!
//! Every stop becomes two graph vertices:
//!
//! - *boarding*: waited at the stop, ready to get on a bus
//! - *arrival*: just arrived at the stop (or starting a journey there)
//!
//! A wait edge `arrival -> boarding` costs the configured wait time. For
//! every bus and every pair of its stops `i < j`, a bus edge
//! `boarding(stop[i]) -> arrival(stop[j])` costs the riding time between
//! them. Journeys run from the origin's arrival vertex to the destination's
//! arrival vertex, so itineraries alternate wait and ride legs, starting
//! with a wait and ending with a ride.

mod error;
mod itinerary;
mod router;
mod settings;
mod snapshot;

pub use error::TransportError;
pub use itinerary::{BusItem, RouteInfo, RouteItem, WaitItem};
pub use router::{EdgeInfo, StopVertexIds, TransportRouter, VertexInfo};
pub use settings::RoutingSettings;
pub use snapshot::{StopVertexIdsEntry, TransportRouterSnapshot};
