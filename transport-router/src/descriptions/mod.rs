//! Stop and bus descriptions.
//!
//! This is the input side of the transport router: named stops with
//! positions and measured road distances, and named buses listing the
//! stops they call at.

mod input;
mod model;
pub mod sphere;

pub use input::{BusDescription, InputQuery, StopDescription, read_descriptions};
pub use model::{Bus, BusesDict, Stop, StopsDict, compute_stops_distance};
pub use sphere::Point;
