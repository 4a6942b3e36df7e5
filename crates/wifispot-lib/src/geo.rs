//! Great-circle distance and the fixed service area.
//!
//! Distances are reported in miles using the haversine formula on a sphere of
//! radius [`EARTH_RADIUS_MILES`].

use serde::{Deserialize, Serialize};

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Geographic rectangle covering the five boroughs.
///
/// Geocoding candidates outside this rectangle are rejected.
pub const SERVICE_AREA: BoundingBox = BoundingBox {
    north: 40.9176,
    south: 40.4957,
    east: -73.6895,
    west: -74.2557,
};

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to `other` in miles.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_miles(self, other)
    }

    /// True when both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Haversine distance between two points in miles.
///
/// ```
/// use wifispot_lib::{haversine_miles, GeoPoint};
///
/// let city_hall = GeoPoint::new(40.7128, -74.0060);
/// assert_eq!(haversine_miles(&city_hall, &city_hall), 0.0);
/// ```
pub fn haversine_miles(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Axis-aligned latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    /// Inclusive containment test.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }

    /// `west,south,east,north` string accepted by geocoding viewbox hints.
    pub fn viewbox(&self) -> String {
        format!("{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}
