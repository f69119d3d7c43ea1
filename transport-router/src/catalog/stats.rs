//! Bus and stop statistics.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::CatalogError;
use crate::descriptions::{BusesDict, Stop, StopsDict, compute_stops_distance, sphere};

/// Summary of one bus's stop list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusStats {
    /// Stops called at, counting repeats and the return leg.
    pub stop_count: usize,
    pub unique_stop_count: usize,
    /// Metres ridden along roads.
    pub route_length: f64,
    /// Metres along great circles between the same stops.
    pub geo_route_length: f64,
}

impl BusStats {
    /// Ratio of road length to great-circle length.
    ///
    /// `None` when every stop shares one position, so the ratio is
    /// undefined.
    pub fn curvature(&self) -> Option<f64> {
        (self.geo_route_length > 0.0).then(|| self.route_length / self.geo_route_length)
    }
}

/// Buses calling at one stop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopStats {
    /// Sorted by name.
    pub bus_names: BTreeSet<String>,
}

/// Statistics for every bus and every stop, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportCatalog {
    buses: BTreeMap<String, BusStats>,
    stops: BTreeMap<String, StopStats>,
}

impl TransportCatalog {
    /// Computes statistics from stop and bus descriptions.
    ///
    /// Every described stop gets an entry, including stops no bus calls at.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a bus calls at a stop missing from `stops`.
    pub fn new(stops: &StopsDict, buses: &BusesDict) -> Result<Self, CatalogError> {
        let mut stop_stats: BTreeMap<String, StopStats> = stops
            .keys()
            .map(|name| (name.clone(), StopStats::default()))
            .collect();
        let mut bus_stats = BTreeMap::new();

        for bus in buses.values() {
            let route = bus
                .stops
                .iter()
                .map(|name| {
                    stops.get(name).ok_or_else(|| CatalogError::UnknownStop {
                        bus: bus.name.clone(),
                        stop: name.clone(),
                    })
                })
                .collect::<Result<Vec<&Stop>, _>>()?;

            let mut route_length = 0.0;
            let mut geo_route_length = 0.0;
            for pair in route.windows(2) {
                route_length += compute_stops_distance(pair[0], pair[1]);
                geo_route_length += sphere::distance(pair[0].position, pair[1].position);
            }

            let unique: BTreeSet<&str> = bus.stops.iter().map(String::as_str).collect();
            for stop_name in &unique {
                if let Some(stats) = stop_stats.get_mut(*stop_name) {
                    stats.bus_names.insert(bus.name.clone());
                }
            }

            bus_stats.insert(
                bus.name.clone(),
                BusStats {
                    stop_count: bus.stops.len(),
                    unique_stop_count: unique.len(),
                    route_length,
                    geo_route_length,
                },
            );
        }

        Ok(Self {
            buses: bus_stats,
            stops: stop_stats,
        })
    }

    /// Looks up a bus by name.
    pub fn bus(&self, name: &str) -> Option<&BusStats> {
        self.buses.get(name)
    }

    /// Looks up a stop by name.
    pub fn stop(&self, name: &str) -> Option<&StopStats> {
        self.stops.get(name)
    }

    /// Iterates over stop names in order.
    pub fn stop_names(&self) -> impl Iterator<Item = &str> {
        self.stops.keys().map(String::as_str)
    }

    /// Iterates over bus names in order.
    pub fn bus_names(&self) -> impl Iterator<Item = &str> {
        self.buses.keys().map(String::as_str)
    }
}
