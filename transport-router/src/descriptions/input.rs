//! JSON base requests describing stops and buses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::model::{Bus, BusesDict, Stop, StopsDict};
use super::sphere::Point;

/// A stop as it appears in `base_requests`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopDescription {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub road_distances: BTreeMap<String, u32>,
}

impl From<StopDescription> for Stop {
    fn from(desc: StopDescription) -> Self {
        Stop {
            name: desc.name,
            position: Point::new(desc.latitude, desc.longitude),
            road_distances: desc.road_distances,
        }
    }
}

/// A bus as it appears in `base_requests`.
///
/// A round-trip bus lists its whole loop. Any other bus lists one direction
/// only, and rides it back in reverse: `[A, B, C]` becomes
/// `[A, B, C, B, A]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusDescription {
    pub name: String,
    pub stops: Vec<String>,
    pub is_roundtrip: bool,
}

impl From<BusDescription> for Bus {
    fn from(desc: BusDescription) -> Self {
        let mut stops = desc.stops;
        if !desc.is_roundtrip && stops.len() > 1 {
            let back: Vec<String> = stops.iter().rev().skip(1).cloned().collect();
            stops.extend(back);
        }
        Bus {
            name: desc.name,
            stops,
            is_roundtrip: desc.is_roundtrip,
        }
    }
}

/// One entry of `base_requests`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputQuery {
    Stop(StopDescription),
    Bus(BusDescription),
}

/// Splits base requests into stop and bus dictionaries.
///
/// A later description with the same name replaces an earlier one.
///
/// # Examples
///
/// ```
/// use transport_router::descriptions::{InputQuery, read_descriptions};
///
/// let queries: Vec<InputQuery> = serde_json::from_str(r#"[
///     {"type": "Stop", "name": "A", "latitude": 55.6, "longitude": 37.2,
///      "road_distances": {"B": 1200}},
///     {"type": "Stop", "name": "B", "latitude": 55.7, "longitude": 37.3},
///     {"type": "Bus", "name": "14", "stops": ["A", "B"], "is_roundtrip": false}
/// ]"#).unwrap();
///
/// let (stops, buses) = read_descriptions(queries);
/// assert_eq!(stops.len(), 2);
/// assert_eq!(stops["A"].road_distances["B"], 1200);
/// assert_eq!(buses["14"].stops, vec!["A", "B", "A"]);
/// ```
pub fn read_descriptions(queries: Vec<InputQuery>) -> (StopsDict, BusesDict) {
    let mut stops = StopsDict::new();
    let mut buses = BusesDict::new();

    for query in queries {
        match query {
            InputQuery::Stop(desc) => {
                stops.insert(desc.name.clone(), desc.into());
            }
            InputQuery::Bus(desc) => {
                buses.insert(desc.name.clone(), desc.into());
            }
        }
    }

    (stops, buses)
}
