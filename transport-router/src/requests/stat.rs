//! Stat queries and their JSON responses.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::error;

use crate::catalog::{BusStats, StopStats, TransportBase};
use crate::transport::{RouteInfo, RouteItem, TransportError};

const NOT_FOUND: &str = "not found";

/// One entry of `stat_requests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StatRequest {
    /// Statistics of one bus.
    Bus { id: i64, name: String },
    /// Buses calling at one stop.
    Stop { id: i64, name: String },
    /// Fastest itinerary between two stops.
    Route { id: i64, from: String, to: String },
}

impl StatRequest {
    pub fn id(&self) -> i64 {
        match self {
            StatRequest::Bus { id, .. }
            | StatRequest::Stop { id, .. }
            | StatRequest::Route { id, .. } => *id,
        }
    }
}

/// Answers one request.
///
/// Unknown buses and stops, and unreachable destinations, answer
/// `{"request_id": id, "error_message": "not found"}`.
pub fn process_request(base: &TransportBase, request: &StatRequest) -> Value {
    match request {
        StatRequest::Bus { id, name } => match base.catalog.bus(name) {
            Some(stats) => bus_response(*id, stats),
            None => not_found(*id),
        },
        StatRequest::Stop { id, name } => match base.catalog.stop(name) {
            Some(stats) => stop_response(*id, stats),
            None => not_found(*id),
        },
        StatRequest::Route { id, from, to } => match base.router.find_route(from, to) {
            Ok(Some(route)) => route_response(*id, &route),
            Ok(None) | Err(TransportError::StopNotFound(_)) => not_found(*id),
            Err(e) => {
                error!(
                    request_id = id,
                    from = %from,
                    to = %to,
                    error = %e,
                    "Route query failed"
                );
                debug_assert!(false, "route query {id} failed: {e}");
                not_found(*id)
            }
        },
    }
}

/// Answers every request, in order.
pub fn process_all(base: &TransportBase, requests: &[StatRequest]) -> Vec<Value> {
    requests
        .iter()
        .map(|request| process_request(base, request))
        .collect()
}

fn bus_response(id: i64, stats: &BusStats) -> Value {
    json!({
        "request_id": id,
        "stop_count": stats.stop_count,
        "unique_stop_count": stats.unique_stop_count,
        "route_length": stats.route_length,
        "curvature": stats.curvature(),
    })
}

fn stop_response(id: i64, stats: &StopStats) -> Value {
    json!({
        "request_id": id,
        "buses": stats.bus_names,
    })
}

fn route_response(id: i64, route: &RouteInfo) -> Value {
    let items: Vec<Value> = route
        .items
        .iter()
        .map(|item| match item {
            RouteItem::Wait(wait) => json!({
                "type": "Wait",
                "stop_name": wait.stop_name,
                "time": wait.time,
            }),
            RouteItem::Bus(bus) => json!({
                "type": "Bus",
                "bus": bus.bus_name,
                "time": bus.time,
                "span_count": bus.span_count,
            }),
        })
        .collect();

    json!({
        "request_id": id,
        "total_time": route.total_time,
        "items": items,
    })
}

fn not_found(id: i64) -> Value {
    json!({
        "request_id": id,
        "error_message": NOT_FOUND,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptions::{Bus, BusesDict, Point, Stop, StopsDict};
    use crate::transport::RoutingSettings;

    fn base() -> TransportBase {
        let mut stops = StopsDict::new();
        stops.insert(
            "A".into(),
            Stop::new("A", Point::default()).with_road_distance("B", 1500),
        );
        stops.insert("B".into(), Stop::new("B", Point::default()));
        stops.insert("Island".into(), Stop::new("Island", Point::new(10.0, 10.0)));

        let mut buses = BusesDict::new();
        buses.insert("14".into(), Bus::new("14", ["A", "B", "A"], false));
        buses.insert("X".into(), Bus::new("X", ["Island", "A"], true));

        TransportBase::new(&stops, &buses, RoutingSettings::new(2, 30.0).unwrap()).unwrap()
    }

    fn route(id: i64, from: &str, to: &str) -> StatRequest {
        StatRequest::Route {
            id,
            from: from.into(),
            to: to.into(),
        }
    }

    #[test]
    fn found_route() {
        let response = process_request(&base(), &route(1, "A", "B"));
        assert_eq!(
            response,
            json!({
                "request_id": 1,
                "total_time": 5.0,
                "items": [
                    {"type": "Wait", "stop_name": "A", "time": 2.0},
                    {"type": "Bus", "bus": "14", "time": 3.0, "span_count": 1},
                ],
            })
        );
    }

    #[test]
    fn same_stop() {
        let response = process_request(&base(), &route(2, "B", "B"));
        assert_eq!(
            response,
            json!({"request_id": 2, "total_time": 0.0, "items": []})
        );
    }

    #[test]
    fn unreachable_and_unknown_are_not_found() {
        let base = base();
        let responses = process_all(&base, &[route(3, "A", "Island"), route(4, "A", "Atlantis")]);
        assert_eq!(
            responses,
            vec![
                json!({"request_id": 3, "error_message": "not found"}),
                json!({"request_id": 4, "error_message": "not found"}),
            ]
        );
    }

    #[test]
    fn responses_keep_request_order() {
        let base = base();
        let requests: Vec<_> = (0..5).map(|i| route(100 - i, "B", "A")).collect();
        let ids: Vec<_> = process_all(&base, &requests)
            .iter()
            .map(|response| response["request_id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![100, 99, 98, 97, 96]);
    }

    #[test]
    fn bus_stats() {
        let base = base();
        let responses = process_all(
            &base,
            &[
                StatRequest::Bus {
                    id: 10,
                    name: "14".into(),
                },
                StatRequest::Bus {
                    id: 11,
                    name: "404".into(),
                },
            ],
        );

        // Both stops share a position, so curvature is undefined
        assert_eq!(
            responses,
            vec![
                json!({
                    "request_id": 10,
                    "stop_count": 3,
                    "unique_stop_count": 2,
                    "route_length": 3000.0,
                    "curvature": null,
                }),
                json!({"request_id": 11, "error_message": "not found"}),
            ]
        );

        let response = process_request(
            &base,
            &StatRequest::Bus {
                id: 12,
                name: "X".into(),
            },
        );
        assert_eq!(response["curvature"], json!(1.0));
        assert_eq!(response["stop_count"], json!(2));
    }

    #[test]
    fn stop_buses() {
        let base = base();
        let stop = |id, name: &str| StatRequest::Stop {
            id,
            name: name.into(),
        };
        let responses = process_all(&base, &[stop(20, "A"), stop(21, "Island"), stop(22, "Nope")]);

        assert_eq!(
            responses,
            vec![
                json!({"request_id": 20, "buses": ["14", "X"]}),
                json!({"request_id": 21, "buses": ["X"]}),
                json!({"request_id": 22, "error_message": "not found"}),
            ]
        );
    }

    #[test]
    fn parse_request() {
        let request: StatRequest =
            serde_json::from_str(r#"{"type": "Route", "id": 7, "from": "A", "to": "B"}"#).unwrap();
        assert_eq!(request, route(7, "A", "B"));
        assert_eq!(request.id(), 7);

        let request: StatRequest =
            serde_json::from_str(r#"{"type": "Bus", "id": 8, "name": "297"}"#).unwrap();
        assert_eq!(
            request,
            StatRequest::Bus {
                id: 8,
                name: "297".into()
            }
        );

        let request: StatRequest =
            serde_json::from_str(r#"{"type": "Stop", "id": 9, "name": "A"}"#).unwrap();
        assert_eq!(request.id(), 9);
    }
}
