//! Routing settings.

use serde::{Deserialize, Serialize};

use super::TransportError;
use crate::graph::Weight;

/// Parameters of the travel-time model.
///
/// Read from the `routing_settings` object of the input; fixed once a
/// router has been built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutingSettings {
    /// Time spent waiting for any bus at a stop (minutes).
    pub bus_wait_time: i32,

    /// Bus speed (km/h).
    pub bus_velocity: f64,
}

impl RoutingSettings {
    /// Creates validated settings.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the wait time is negative or the velocity is not a
    /// positive finite number.
    pub fn new(bus_wait_time: i32, bus_velocity: f64) -> Result<Self, TransportError> {
        let settings = Self {
            bus_wait_time,
            bus_velocity,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the settings, e.g. after deserialization.
    pub fn validate(&self) -> Result<(), TransportError> {
        if self.bus_wait_time < 0 {
            return Err(TransportError::InvalidBusWaitTime(self.bus_wait_time));
        }
        if !(self.bus_velocity.is_finite() && self.bus_velocity > 0.0) {
            return Err(TransportError::InvalidBusVelocity(self.bus_velocity));
        }
        Ok(())
    }

    /// Returns the wait time as an edge weight.
    pub fn wait_weight(&self) -> Weight {
        f64::from(self.bus_wait_time)
    }

    /// Returns the minutes needed to ride `metres`.
    pub fn ride_minutes(&self, metres: f64) -> Weight {
        metres / (self.bus_velocity * 1000.0 / 60.0)
    }
}
