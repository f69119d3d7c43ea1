//! Everything `process_requests` needs, built by `make_base`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CatalogError, TransportCatalog};
use crate::descriptions::{BusesDict, StopsDict};
use crate::transport::{RoutingSettings, TransportError, TransportRouter, TransportRouterSnapshot};

/// Statistics and routing index built from the same descriptions.
#[derive(Debug)]
pub struct TransportBase {
    pub catalog: TransportCatalog,
    pub router: TransportRouter,
}

/// Serializable form of a [`TransportBase`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportBaseSnapshot {
    pub catalog: TransportCatalog,
    pub router: TransportRouterSnapshot,
}

impl TransportBase {
    /// Computes statistics and builds the router.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a bus calls at an unknown stop or the settings are
    /// invalid.
    pub fn new(
        stops: &StopsDict,
        buses: &BusesDict,
        settings: RoutingSettings,
    ) -> Result<Self, CatalogError> {
        let catalog = TransportCatalog::new(stops, buses)?;
        let router = TransportRouter::new(stops, buses, settings)?;

        debug!(stops = stops.len(), buses = buses.len(), "Transport base built");
        Ok(Self { catalog, router })
    }

    /// Captures the base.
    pub fn to_snapshot(&self) -> TransportBaseSnapshot {
        TransportBaseSnapshot {
            catalog: self.catalog.clone(),
            router: self.router.to_snapshot(),
        }
    }

    /// Restores a base, checking that the catalog and router describe the
    /// same stops.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the router snapshot is inconsistent or the two
    /// halves disagree.
    pub fn from_snapshot(snapshot: TransportBaseSnapshot) -> Result<Self, TransportError> {
        let TransportBaseSnapshot { catalog, router } = snapshot;
        let router = TransportRouter::from_snapshot(router)?;

        let router_stops = router.stops_vertex_ids().map(|(name, _)| name);
        if !catalog.stop_names().eq(router_stops) {
            return Err(TransportError::InvalidSnapshot(
                "catalog and router list different stops".to_string(),
            ));
        }

        for stop_name in catalog.stop_names() {
            let Some(stats) = catalog.stop(stop_name) else {
                continue;
            };
            if let Some(bus) = stats.bus_names.iter().find(|bus| catalog.bus(bus).is_none()) {
                return Err(TransportError::InvalidSnapshot(format!(
                    "stop {stop_name} lists unknown bus {bus}"
                )));
            }
        }

        Ok(Self { catalog, router })
    }
}
