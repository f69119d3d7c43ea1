//! Per-bus and per-stop statistics, and the saved base that pairs them with
//! a built router.
//!
//! Statistics are computed once when the base is built, so answering a
//! `Bus` or `Stop` request needs no stop positions or road distances.

mod base;
mod error;
mod stats;

pub use base::{TransportBase, TransportBaseSnapshot};
pub use error::CatalogError;
pub use stats::{BusStats, StopStats, TransportCatalog};
