//! Top-level input documents of the two CLI modes.

use serde::{Deserialize, Serialize};

use super::StatRequest;
use crate::descriptions::InputQuery;
use crate::snapshot::SerializationSettings;
use crate::transport::RoutingSettings;

/// Input of `make_base`: stop and bus descriptions plus routing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MakeBaseRequest {
    pub serialization_settings: SerializationSettings,
    pub routing_settings: RoutingSettings,
    #[serde(default)]
    pub base_requests: Vec<InputQuery>,
}

/// Input of `process_requests`: queries against a saved base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRequestsRequest {
    pub serialization_settings: SerializationSettings,
    #[serde(default)]
    pub stat_requests: Vec<StatRequest>,
}
