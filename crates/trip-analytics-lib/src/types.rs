//! Snapshot data model
//!
//! Source records handed in by the data collaborator. The core only ever borrows them.

use crate::{AnalyticsError, Result};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Check if the point has finite coordinates within lat [-90, 90] and lng [-180, 180]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    #[inline]
    fn from(p: GeoPoint) -> Self {
        geo::Point::new(p.lng, p.lat)
    }
}

impl From<geo::Point<f64>> for GeoPoint {
    #[inline]
    fn from(p: geo::Point<f64>) -> Self {
        GeoPoint::new(p.y(), p.x())
    }
}

/// Aggregated statistics of one spatial bucket
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TripAggregatePoint {
    pub location: GeoPoint,
    pub trip_count: u32,
    pub avg_duration_seconds: f64,
    pub avg_distance_km: f64,
}

impl TripAggregatePoint {
    pub fn new(
        location: GeoPoint,
        trip_count: u32,
        avg_duration_seconds: f64,
        avg_distance_km: f64,
    ) -> Self {
        Self {
            location,
            trip_count,
            avg_duration_seconds,
            avg_distance_km,
        }
    }

    /// Reject out-of-range coordinates and negative or non-finite averages
    pub(crate) fn validate(&self, position: usize) -> Result<()> {
        if !self.location.is_valid() {
            return Err(AnalyticsError::InvalidArgument(format!(
                "point {position} has invalid location ({}, {})",
                self.location.lat, self.location.lng
            )));
        }
        validate_metric("point", position, "avgDurationSeconds", self.avg_duration_seconds)?;
        validate_metric("point", position, "avgDistanceKm", self.avg_distance_km)
    }
}

/// Aggregated statistics of one pickup/dropoff pair
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Route {
    pub pickup: GeoPoint,
    pub dropoff: GeoPoint,
    pub trip_count: u32,
    pub avg_duration_seconds: f64,
    pub avg_distance_km: f64,
    /// Ingestion order; stable key for colour, weight and table cross-referencing
    pub index: usize,
}

impl Route {
    pub fn new(
        pickup: GeoPoint,
        dropoff: GeoPoint,
        trip_count: u32,
        avg_duration_seconds: f64,
        avg_distance_km: f64,
        index: usize,
    ) -> Self {
        Self {
            pickup,
            dropoff,
            trip_count,
            avg_duration_seconds,
            avg_distance_km,
            index,
        }
    }

    /// Reject out-of-range endpoints and negative or non-finite averages
    pub(crate) fn validate(&self, position: usize) -> Result<()> {
        for (name, endpoint) in [("pickup", self.pickup), ("dropoff", self.dropoff)] {
            if !endpoint.is_valid() {
                return Err(AnalyticsError::InvalidArgument(format!(
                    "route {position} has invalid {name} ({}, {})",
                    endpoint.lat, endpoint.lng
                )));
            }
        }
        validate_metric("route", position, "avgDurationSeconds", self.avg_duration_seconds)?;
        validate_metric("route", position, "avgDistanceKm", self.avg_distance_km)
    }
}

fn validate_metric(kind: &str, position: usize, name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AnalyticsError::InvalidArgument(format!(
            "{kind} {position} has invalid {name}: {value}"
        )))
    }
}

/// Which metric drives normalization, marker colours and legend units
///
/// `Unknown` stands for any mode name the core does not recognise. It is not an error:
/// every dispatch over the mode has an explicit branch for it (0.5 intensity, neutral
/// marker colour, empty legend range).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum VisualizationMode {
    #[default]
    Intensity,
    Duration,
    Distance,
    Unknown,
}

impl VisualizationMode {
    pub fn all() -> &'static [Self] {
        &[Self::Intensity, Self::Duration, Self::Distance]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Intensity => "intensity",
            Self::Duration => "duration",
            Self::Distance => "distance",
            Self::Unknown => "unknown",
        }
    }

    /// The raw, unclamped metric this mode reads from a point
    pub fn raw_metric(&self, point: &TripAggregatePoint) -> Option<f64> {
        match self {
            Self::Intensity => Some(f64::from(point.trip_count)),
            Self::Duration => Some(point.avg_duration_seconds),
            Self::Distance => Some(point.avg_distance_km),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for VisualizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VisualizationMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<&str> for VisualizationMode {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "intensity" => Self::Intensity,
            "duration" => Self::Duration,
            "distance" => Self::Distance,
            _ => Self::Unknown,
        }
    }
}

impl From<String> for VisualizationMode {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<VisualizationMode> for String {
    fn from(mode: VisualizationMode) -> Self {
        mode.name().to_string()
    }
}
