//! Utility functions for angle conversions and great-circle distances

use crate::GeoPoint;
use geo::{Coord, Rect};

/// Mean Earth radius in kilometres used by every distance in this crate
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Precomputed constant: PI / 180.0
const DEG_TO_RAD_FACTOR: f64 = std::f64::consts::PI / 180.0;

/// Precomputed constant: 180.0 / PI
const RAD_TO_DEG_FACTOR: f64 = 180.0 / std::f64::consts::PI;

/// Convert degrees to radians
#[inline(always)]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * DEG_TO_RAD_FACTOR
}

/// Convert radians to degrees
#[inline(always)]
pub fn rad_to_deg(rad: f64) -> f64 {
    rad * RAD_TO_DEG_FACTOR
}

/// Great-circle distance between two points in kilometres (haversine formula)
///
/// Symmetric in its arguments and exactly `0.0` for identical points.
#[inline]
pub fn haversine_distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = deg_to_rad(a.lat);
    let lat2 = deg_to_rad(b.lat);
    let delta_lat = deg_to_rad(b.lat - a.lat);
    let delta_lng = deg_to_rad(b.lng - a.lng);

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] for antipodal points
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Great-circle distance in meters
#[inline]
pub fn haversine_distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    haversine_distance_km(a, b) * 1000.0
}

/// Lat/lng bounding box of the points, with x = lng and y = lat
///
/// Returns `None` for an empty iterator.
pub fn bounding_box<I>(points: I) -> Option<Rect<f64>>
where
    I: IntoIterator<Item = GeoPoint>,
{
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let mut found = false;

    for p in points {
        min_x = min_x.min(p.lng);
        min_y = min_y.min(p.lat);
        max_x = max_x.max(p.lng);
        max_y = max_y.max(p.lat);
        found = true;
    }

    found.then(|| Rect::new(Coord { x: min_x, y: min_y }, Coord { x: max_x, y: max_y }))
}

/// Center of a lat/lng bounding box
#[inline]
pub fn center(bbox: &Rect<f64>) -> GeoPoint {
    let c = bbox.center();
    GeoPoint::new(c.y, c.x)
}
