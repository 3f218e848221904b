//! Nearest-route lookup for click interactions
//!
//! A route's distance to a query point is the great-circle distance to its nearer endpoint
//! (pickup or dropoff). Among equally close routes the first one in input order wins. Any
//! implementation of [`RouteLocator`] must honour the same rule so a spatial index can
//! replace the linear scan without changing results.

use crate::{GeoPoint, Route, geo_math};

/// Capability to find the route closest to a point
pub trait RouteLocator {
    /// Closest route to `query`, `None` if `routes` is empty
    fn find_closest<'a>(&self, query: GeoPoint, routes: &'a [Route]) -> Option<&'a Route>;
}

/// O(n) scan over every route; adequate for hundreds of routes
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearScanLocator;

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl RouteLocator for LinearScanLocator {
    fn find_closest<'a>(&self, query: GeoPoint, routes: &'a [Route]) -> Option<&'a Route> {
        let mut best: Option<(&Route, f64)> = None;

        for route in routes {
            let d = closest_endpoint_distance_km(query, route);
            if d.is_nan() {
                tracing::warn!("Skipping route {} with non-finite endpoints", route.index);
                continue;
            }
            // Strictly smaller only: the earlier route keeps a tie
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((route, d)),
            }
        }

        best.map(|(route, _)| route)
    }
}

/// Distance in km from `query` to the nearer of the route's two endpoints
#[inline]
pub fn closest_endpoint_distance_km(query: GeoPoint, route: &Route) -> f64 {
    let to_pickup = geo_math::haversine_distance_km(query, route.pickup);
    let to_dropoff = geo_math::haversine_distance_km(query, route.dropoff);
    to_pickup.min(to_dropoff)
}

/// Closest route with the default linear scan
#[inline]
pub fn find_closest(query: GeoPoint, routes: &[Route]) -> Option<&Route> {
    LinearScanLocator.find_closest(query, routes)
}
