pub mod config;
pub mod data;
pub mod error;
pub mod geo;
pub mod group;
pub mod schedule;
pub mod select;
pub mod service;

use serde::{Deserialize, Serialize};

pub use error::EngineError;

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Geographic position in degrees. Serialized as `[lat, lon]`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Coordinate { lat, lon }
    }

    /// Haversine great-circle distance in kilometres.
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.lon - self.lon).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Coordinate { lat, lon }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lat, c.lon]
    }
}

#[cfg(test)]
mod tests {
    use super::Coordinate;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn distance_to_self_is_zero() {
        let a = Coordinate::new(40.0076, -83.0300);
        assert_eq!(a.distance_km(&a), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(40.0029, -83.0158);
        let b = Coordinate::new(40.0063, -83.0304);
        assert_approx_eq!(a.distance_km(&b), b.distance_km(&a), 1e-12);
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 1.0);
        assert_approx_eq!(a.distance_km(&b), 111.195, 1e-3);
    }

    #[test]
    fn serializes_as_pair() {
        let c = Coordinate::new(40.5, -83.25);
        assert_eq!(serde_json::to_string(&c).unwrap(), "[40.5,-83.25]");
        let back: Coordinate = serde_json::from_str("[40.5,-83.25]").unwrap();
        assert_eq!(back, c);
    }
}
