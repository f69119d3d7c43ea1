//! On-disk storage of built bases.
//!
//! `make_base` builds a [`TransportBase`](crate::catalog::TransportBase)
//! once and saves it here; `process_requests` loads it and answers queries
//! without recomputing shortest paths.

mod error;
mod store;

pub use error::SnapshotError;
pub use store::{SerializationSettings, SnapshotStore};
