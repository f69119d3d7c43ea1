//! Stop and bus types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::sphere::{self, Point};

/// A named bus stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub name: String,
    pub position: Point,
    /// Measured road distance in metres to neighbouring stops, by name.
    #[serde(default)]
    pub road_distances: BTreeMap<String, u32>,
}

impl Stop {
    /// Creates a stop with no measured road distances.
    pub fn new(name: impl Into<String>, position: Point) -> Self {
        Self {
            name: name.into(),
            position,
            road_distances: BTreeMap::new(),
        }
    }

    /// Adds a measured road distance to another stop.
    pub fn with_road_distance(mut self, to: impl Into<String>, metres: u32) -> Self {
        self.road_distances.insert(to.into(), metres);
        self
    }
}

/// A bus line: the stops it calls at, in riding order.
///
/// `stops` is the literal riding sequence. For a there-and-back line it
/// already contains the return leg (see
/// [`BusDescription`](super::BusDescription)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bus {
    pub name: String,
    pub stops: Vec<String>,
    pub is_roundtrip: bool,
}

impl Bus {
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        stops: impl IntoIterator<Item = S>,
        is_roundtrip: bool,
    ) -> Self {
        Self {
            name: name.into(),
            stops: stops.into_iter().map(Into::into).collect(),
            is_roundtrip,
        }
    }
}

/// Stops keyed by name. Ordered, so iteration is deterministic.
pub type StopsDict = BTreeMap<String, Stop>;

/// Buses keyed by name. Ordered, so iteration is deterministic.
pub type BusesDict = BTreeMap<String, Bus>;

/// Distance in metres travelled from `from` to the next stop `to`.
///
/// A road distance measured from `from` wins; otherwise one measured in the
/// opposite direction is used; otherwise the great-circle distance between
/// the two positions.
pub fn compute_stops_distance(from: &Stop, to: &Stop) -> f64 {
    from.road_distances
        .get(&to.name)
        .or_else(|| to.road_distances.get(&from.name))
        .map(|&metres| f64::from(metres))
        .unwrap_or_else(|| sphere::distance(from.position, to.position))
}
