//! Rider-facing route description.

use serde::{Deserialize, Serialize};

use crate::graph::Weight;

/// Waiting for a bus at a stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitItem {
    pub stop_name: String,
    /// Minutes spent waiting.
    pub time: Weight,
}

/// Riding one bus without getting off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusItem {
    pub bus_name: String,
    /// Minutes spent riding.
    pub time: Weight,
    /// Number of stop-to-stop hops ridden.
    pub span_count: usize,
    /// Position of the boarding stop in the bus's stop list.
    pub start_stop_idx: usize,
    /// Position of the alighting stop in the bus's stop list.
    pub finish_stop_idx: usize,
}

/// One leg of an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RouteItem {
    Wait(WaitItem),
    Bus(BusItem),
}

impl RouteItem {
    /// Returns the minutes spent on this leg.
    pub fn time(&self) -> Weight {
        match self {
            RouteItem::Wait(wait) => wait.time,
            RouteItem::Bus(bus) => bus.time,
        }
    }

    /// Returns true if this is a wait leg.
    pub fn is_wait(&self) -> bool {
        matches!(self, RouteItem::Wait(_))
    }

    /// Returns true if this is a ride leg.
    pub fn is_bus(&self) -> bool {
        matches!(self, RouteItem::Bus(_))
    }

    /// Returns the wait if this is a wait leg.
    pub fn as_wait(&self) -> Option<&WaitItem> {
        match self {
            RouteItem::Wait(wait) => Some(wait),
            RouteItem::Bus(_) => None,
        }
    }

    /// Returns the ride if this is a ride leg.
    pub fn as_bus(&self) -> Option<&BusItem> {
        match self {
            RouteItem::Wait(_) => None,
            RouteItem::Bus(bus) => Some(bus),
        }
    }
}

/// The fastest itinerary between two stops.
///
/// # Invariants
///
/// - Items alternate `Wait, Bus, Wait, Bus, ...`, starting with a wait and
///   ending with a ride; a journey from a stop to itself has no items
/// - `total_time` is the sum of item times, added in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub total_time: Weight,
    pub items: Vec<RouteItem>,
}

impl RouteInfo {
    /// Returns the ride legs in order.
    pub fn bus_items(&self) -> impl Iterator<Item = &BusItem> {
        self.items.iter().filter_map(RouteItem::as_bus)
    }

    /// Returns the wait legs in order.
    pub fn wait_items(&self) -> impl Iterator<Item = &WaitItem> {
        self.items.iter().filter_map(RouteItem::as_wait)
    }

    /// Returns the number of buses boarded.
    pub fn bus_count(&self) -> usize {
        self.bus_items().count()
    }

    /// Returns true if wait and ride legs alternate as described above.
    pub fn is_alternating(&self) -> bool {
        let kinds_alternate = self
            .items
            .iter()
            .enumerate()
            .all(|(i, item)| item.is_wait() == (i % 2 == 0));
        kinds_alternate && self.items.len() % 2 == 0
    }
}
