//! Catalog error types.

use crate::transport::TransportError;

/// Errors from building a [`TransportBase`](super::TransportBase).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    /// A bus calls at a stop missing from the stop descriptions
    #[error("bus {bus} calls at unknown stop {stop}")]
    UnknownStop { bus: String, stop: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}
