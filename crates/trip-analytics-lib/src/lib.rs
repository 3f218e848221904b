//! Trip Analytics Library - Geospatial transformation layer for aggregated trip statistics
//!
//! This library turns a finite, already-aggregated snapshot of trip records (pickup/dropoff
//! buckets with counts, durations and distances) into declarative render plans: heatmap
//! weights, ranked hotspot markers, styled route segments and zoom-adaptive level-of-detail
//! (LOD) parameters. Drawing is left to the caller's map renderer.
//!
//! # Architecture
//!
//! - **[`geo_math`]**: Great-circle distance and angle conversion
//! - **[`mod@normalize`]**: Per-mode mapping of a raw metric to a `[0, 1]` weight
//! - **[`rank_hotspots`]**: Stable top-K selection by trip count
//! - **[`style`]**: Deterministic colour and stroke encodings
//! - **[`RouteLocator`]**: Nearest-route lookup on click
//! - **[`lod`]**: Heatmap radius/blur and route visibility per zoom level
//! - **[`RenderPlanner`]**: Orchestrates the above into a [`RenderPlan`]
//!
//! Every operation is a pure function of its inputs. Derived values are recomputed in full
//! on each data update or zoom change; nothing is cached between calls.
//!
//! # Example
//!
//! ```
//! use trip_analytics_lib::{GeoPoint, TripAggregatePoint, VisualizationMode, build_render_plan};
//!
//! let points = vec![
//!     TripAggregatePoint::new(GeoPoint::new(40.75, -73.99), 10, 600.0, 2.0),
//!     TripAggregatePoint::new(GeoPoint::new(40.76, -73.98), 90, 900.0, 4.5),
//! ];
//!
//! let plan = build_render_plan(&points, VisualizationMode::Intensity, 10).unwrap();
//! assert_eq!(plan.hotspots[0].point.trip_count, 90);
//! assert_eq!(plan.legend.max, 90.0);
//! ```

pub mod geo_math;
pub mod lod;
mod locator;
pub mod normalize;
mod plan;
mod ranking;
pub mod style;
mod types;

// Public API exports
pub use locator::{LinearScanLocator, RouteLocator, closest_endpoint_distance_km, find_closest};
pub use lod::{
    HeatmapParams, LodConfig, LodParams, heatmap_params_for_zoom, lod_for_zoom,
    route_visibility_for_zoom,
};
pub use normalize::{ScaleConfig, normalize};
pub use plan::{
    Config, GradientStop, LegendSpec, NormalizedPoint, RenderPlan, RenderPlanner, RoutePlan,
    SnapshotSummary, StyledRoute, build_render_plan, build_route_plan,
};
pub use ranking::{DEFAULT_HOTSPOT_LIMIT, RankedHotspot, rank_hotspots};
pub use style::{ColorToken, color_for, marker_color_for, weight_for};
pub use types::{GeoPoint, Route, TripAggregatePoint, VisualizationMode};

/// Error types for the analytics core
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalyticsError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Empty input: no trip aggregates to render")]
    EmptyInput,
}

impl AnalyticsError {
    /// Whether the caller should simply skip rendering instead of reporting a failure
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AnalyticsError::EmptyInput)
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
