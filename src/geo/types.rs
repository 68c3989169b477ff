//! Location types shared by the geocoding and places endpoints

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the Earth.
///
/// Serialised as `latitude` / `longitude` (Places API); the Geocoding API's
/// `lat` / `lng` spelling is accepted when decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    #[serde(rename = "latitude", alias = "lat")]
    pub lat: f64,
    #[serde(rename = "longitude", alias = "lng")]
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// `lat,lng` in the shortest form that round-trips
impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// A bounded rectangular area
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    #[serde(default)]
    pub northeast: LatLng,
    #[serde(default)]
    pub southwest: LatLng,
}

/// Circle used to bias or restrict a places search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: LatLng,
    /// Radius in meters
    pub radius: f64,
}

/// Circular location restriction / bias
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationRestriction {
    pub circle: Circle,
}

impl LocationRestriction {
    pub fn circle(center: LatLng, radius: f64) -> Self {
        Self {
            circle: Circle { center, radius },
        }
    }
}

/// Rectangle given by its low and high corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub low: LatLng,
    pub high: LatLng,
}

/// Rectangular location restriction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangularRestriction {
    pub rectangle: Rectangle,
}

#[cfg(test)]
mod types_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_latlng_display() {
        assert_eq!(LatLng::new(44.67775, -63.67206).to_string(), "44.67775,-63.67206");
        assert_eq!(LatLng::new(1.0, 2.5).to_string(), "1,2.5");
    }

    #[test]
    fn test_latlng_serde_spellings() {
        let places: LatLng = serde_json::from_value(json!({"latitude": 1.5, "longitude": 2.0})).unwrap();
        let geocoding: LatLng = serde_json::from_value(json!({"lat": 1.5, "lng": 2.0})).unwrap();

        assert_eq!(places, geocoding);
        assert_eq!(
            serde_json::to_value(places).unwrap(),
            json!({"latitude": 1.5, "longitude": 2.0})
        );
    }

    #[test]
    fn test_location_restriction_shape() {
        let restriction = LocationRestriction::circle(LatLng::new(44.0, -63.0), 500.0);
        assert_eq!(
            serde_json::to_value(restriction).unwrap(),
            json!({"circle": {"center": {"latitude": 44.0, "longitude": -63.0}, "radius": 500.0}})
        );
    }
}
