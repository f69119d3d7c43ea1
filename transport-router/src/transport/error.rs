//! Transport router error types.
//!
//! Settings and bus/stop inconsistencies are caught at construction, so a
//! partially built router is never handed out. Unknown stop names in a
//! query are reported per query. An unreachable destination is not an
//! error: `find_route` returns `Ok(None)`.

use crate::graph::GraphError;
use crate::router::RouterError;

/// Errors from building or querying a [`TransportRouter`](super::TransportRouter).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// Wait time is negative
    #[error("invalid bus_wait_time {0}: must not be negative")]
    InvalidBusWaitTime(i32),

    /// Velocity is zero, negative or not finite
    #[error("invalid bus_velocity {0}: must be positive and finite")]
    InvalidBusVelocity(f64),

    /// A bus calls at a stop missing from the stop descriptions
    #[error("bus {bus} calls at unknown stop {stop}")]
    UnknownStop { bus: String, stop: String },

    /// A query names a stop that is not in the catalog
    #[error("stop not found: {0}")]
    StopNotFound(String),

    /// A snapshot's tables disagree with each other
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Router(#[from] RouterError),
}
