//! Great-circle distance on a spherical Earth.

use serde::{Deserialize, Serialize};

/// Earth radius in metres.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Distance in metres between two points along the surface.
pub fn distance(lhs: Point, rhs: Point) -> f64 {
    // The cosine below rounds to just under 1 for identical points
    if lhs == rhs {
        return 0.0;
    }

    let lat1 = lhs.latitude.to_radians();
    let lat2 = rhs.latitude.to_radians();
    let dlon = (lhs.longitude - rhs.longitude).abs().to_radians();

    let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * dlon.cos();
    cos_angle.clamp(-1.0, 1.0).acos() * EARTH_RADIUS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        let p = Point::new(55.611087, 37.20829);
        assert_eq!(distance(p, p), 0.0);
        assert_eq!(distance(Point::default(), Point::default()), 0.0);

        for latitude in [-89.5, -33.9, 12.25, 48.85, 55.6, 71.0] {
            let p = Point::new(latitude, 37.2);
            assert_eq!(distance(p, p), 0.0, "latitude {latitude}");
        }
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = distance(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        let expected = EARTH_RADIUS * std::f64::consts::PI / 180.0;
        assert!((d - expected).abs() < 1e-6, "got {d}, expected {expected}");
    }

    #[test]
    fn symmetric() {
        let a = Point::new(55.595884, 37.209755);
        let b = Point::new(55.632761, 37.333324);
        assert_eq!(distance(a, b), distance(b, a));
    }

    #[test]
    fn antipodes() {
        let d = distance(Point::new(0.0, 0.0), Point::new(0.0, 180.0));
        assert!((d - EARTH_RADIUS * std::f64::consts::PI).abs() < 1e-6);
    }
}
