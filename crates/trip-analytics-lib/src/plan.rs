//! RenderPlanner - Top-level orchestration from snapshot to render plan
//!
//! This module turns a snapshot of trip aggregates into the declarative [`RenderPlan`] the map
//! renderer consumes, and a route list into a [`RoutePlan`]. Each call rebuilds its output
//! from scratch; a new plan fully replaces the previous one.

use crate::lod::{LodConfig, LodParams};
use crate::normalize::{self, ScaleConfig};
use crate::ranking::{self, DEFAULT_HOTSPOT_LIMIT, RankedHotspot};
use crate::style::{self, ColorToken, HEATMAP_GRADIENT};
use crate::{
    AnalyticsError, GeoPoint, LinearScanLocator, Result, Route, RouteLocator, TripAggregatePoint,
    VisualizationMode, geo_math,
};

use geo::Rect;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the render planner
///
/// The defaults are the fixed constants each visualization mode is defined by.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Config {
    /// Divisors for intensity normalization
    pub scale: ScaleConfig,
    /// Number of hotspots kept by [`RenderPlanner::build`] (default 10)
    pub hotspot_limit: i64,
    /// Zoom bands for heatmap kernels and route visibility
    pub lod: LodConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scale: ScaleConfig::default(),
            hotspot_limit: DEFAULT_HOTSPOT_LIMIT,
            lod: LodConfig::default(),
        }
    }
}

impl Config {
    /// Check the scale divisors and the LOD zoom bands
    pub fn validate(&self) -> Result<()> {
        self.scale.validate()?;
        self.lod.validate()
    }
}

/// Heatmap sample: a location and its weight in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NormalizedPoint {
    pub location: GeoPoint,
    pub weight: f64,
}

/// One stop of the heatmap colour ramp
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GradientStop {
    pub position: f64,
    pub color: ColorToken,
}

/// Legend for the active mode
///
/// `min`/`max` are taken from the raw metric, not from the clamped weights, so the legend
/// shows the true data range.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LegendSpec {
    pub mode: VisualizationMode,
    pub min: f64,
    pub max: f64,
    pub unit: String,
    pub label: String,
    pub gradient: Vec<GradientStop>,
}

impl LegendSpec {
    fn for_points(mode: VisualizationMode, points: &[TripAggregatePoint]) -> Self {
        let (unit, label) = match mode {
            VisualizationMode::Intensity => ("trips", "Trip count"),
            VisualizationMode::Duration => ("s", "Average duration"),
            VisualizationMode::Distance => ("km", "Average distance"),
            VisualizationMode::Unknown => ("", "Unknown"),
        };

        let (min, max) = points
            .iter()
            .filter_map(|p| mode.raw_metric(p))
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })
            .unwrap_or((0.0, 0.0));

        Self {
            mode,
            min,
            max,
            unit: unit.to_string(),
            label: label.to_string(),
            gradient: HEATMAP_GRADIENT
                .iter()
                .map(|&(position, color)| GradientStop { position, color })
                .collect(),
        }
    }
}

/// Totals over the whole snapshot
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SnapshotSummary {
    pub point_count: usize,
    pub total_trips: u64,
    /// Trip-weighted mean of the per-bucket averages (0 when there are no trips)
    pub mean_duration_seconds: f64,
    /// Trip-weighted mean of the per-bucket averages (0 when there are no trips)
    pub mean_distance_km: f64,
}

impl SnapshotSummary {
    pub fn from_points(points: &[TripAggregatePoint]) -> Self {
        let mut total_trips: u64 = 0;
        let mut mean_duration_seconds = 0.0;
        let mut mean_distance_km = 0.0;

        // Running mean: stays finite for any finite averages
        for p in points.iter().filter(|p| p.trip_count > 0) {
            total_trips += u64::from(p.trip_count);
            let share = f64::from(p.trip_count) / total_trips as f64;
            mean_duration_seconds += (p.avg_duration_seconds - mean_duration_seconds) * share;
            mean_distance_km += (p.avg_distance_km - mean_distance_km) * share;
        }

        Self {
            point_count: points.len(),
            total_trips,
            mean_duration_seconds,
            mean_distance_km,
        }
    }
}

/// Everything the renderer needs to draw one snapshot
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RenderPlan {
    /// One entry per input point, in input order
    pub heatmap_weights: Vec<NormalizedPoint>,
    /// Top-K points by trip count, coloured for the active mode
    pub hotspots: Vec<RankedHotspot>,
    pub legend: LegendSpec,
    /// Lat/lng extent of the snapshot (x = lng, y = lat) for fitting the viewport
    pub bounds: Rect<f64>,
    pub summary: SnapshotSummary,
}

impl RenderPlan {
    /// Center of the snapshot extent
    pub fn center(&self) -> GeoPoint {
        geo_math::center(&self.bounds)
    }
}

/// A route with its visual encoding
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StyledRoute {
    /// Ingestion index of the source route (table row key)
    pub index: usize,
    pub pickup: GeoPoint,
    pub dropoff: GeoPoint,
    pub trip_count: u32,
    pub color: ColorToken,
    pub weight: u32,
    /// Straight-line pickup to dropoff distance
    pub distance_km: f64,
}

impl StyledRoute {
    pub fn from_route(route: &Route) -> Self {
        Self {
            index: route.index,
            pickup: route.pickup,
            dropoff: route.dropoff,
            trip_count: route.trip_count,
            color: style::color_for(route.index),
            weight: style::weight_for(route.trip_count),
            distance_km: geo_math::haversine_distance_km(route.pickup, route.dropoff),
        }
    }
}

/// Styled routes for one zoom level
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RoutePlan {
    pub lod: LodParams,
    /// Whether routes should be drawn at this zoom
    pub visible: bool,
    /// Every input route, in input order
    pub routes: Vec<StyledRoute>,
    pub total_trips: u64,
}

/// Top-level entry point combining normalization, ranking, styling and LOD
///
/// Generic over the nearest-route strategy; defaults to [`LinearScanLocator`].
#[derive(Debug, Clone)]
pub struct RenderPlanner<L: RouteLocator = LinearScanLocator> {
    config: Config,
    locator: L,
}

impl RenderPlanner {
    /// Create a planner using the linear-scan locator
    pub fn new(config: Config) -> Self {
        Self::with_locator(config, LinearScanLocator)
    }
}

impl Default for RenderPlanner {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<L: RouteLocator> RenderPlanner<L> {
    pub fn with_locator(config: Config, locator: L) -> Self {
        Self { config, locator }
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build a render plan keeping `config.hotspot_limit` hotspots
    pub fn build(
        &self,
        points: &[TripAggregatePoint],
        mode: VisualizationMode,
    ) -> Result<RenderPlan> {
        self.build_with_limit(points, mode, self.config.hotspot_limit)
    }

    /// Build a render plan keeping at most `limit` hotspots
    ///
    /// # Errors
    /// - [`AnalyticsError::InvalidArgument`] for a negative limit, an invalid scale or LOD
    ///   configuration, or a point with invalid coordinates or metrics
    /// - [`AnalyticsError::EmptyInput`] when `points` is empty; the caller should skip
    ///   rendering rather than draw an empty heatmap
    pub fn build_with_limit(
        &self,
        points: &[TripAggregatePoint],
        mode: VisualizationMode,
        limit: i64,
    ) -> Result<RenderPlan> {
        #[cfg(feature = "profiling")]
        profiling::scope!("plan::build");

        // All rejections happen before any output is assembled
        ranking::checked_limit(limit)?;
        self.config.validate()?;
        if points.is_empty() {
            return Err(AnalyticsError::EmptyInput);
        }
        for (i, p) in points.iter().enumerate() {
            p.validate(i)?;
        }

        if mode == VisualizationMode::Unknown {
            tracing::debug!("Unrecognised visualization mode, using fallback weights and colours");
        }

        let heatmap_weights: Vec<NormalizedPoint> = points
            .iter()
            .map(|p| NormalizedPoint {
                location: p.location,
                weight: normalize::normalize(p, mode, &self.config.scale),
            })
            .collect();

        let hotspots: Vec<RankedHotspot> = ranking::rank_hotspots(points, limit)?
            .into_iter()
            .map(|h| RankedHotspot {
                color: style::marker_color_for(mode, &h.point),
                ..h
            })
            .collect();

        let legend = LegendSpec::for_points(mode, points);
        let bounds = geo_math::bounding_box(points.iter().map(|p| p.location))
            .ok_or(AnalyticsError::EmptyInput)?;
        let summary = SnapshotSummary::from_points(points);

        tracing::debug!(
            "Built {} plan: {} heatmap points, {} hotspots, legend [{}, {}] {}",
            mode,
            heatmap_weights.len(),
            hotspots.len(),
            legend.min,
            legend.max,
            legend.unit
        );

        Ok(RenderPlan {
            heatmap_weights,
            hotspots,
            legend,
            bounds,
            summary,
        })
    }

    /// Style every route and gate visibility on the zoom level
    ///
    /// # Errors
    /// [`AnalyticsError::InvalidArgument`] for an invalid LOD configuration or a route with
    /// out-of-range endpoints or invalid metrics. Nothing is styled in that case.
    pub fn build_routes(&self, routes: &[Route], zoom: i32) -> Result<RoutePlan> {
        #[cfg(feature = "profiling")]
        profiling::scope!("plan::build_routes");

        self.config.lod.validate()?;
        for (i, route) in routes.iter().enumerate() {
            route.validate(i)?;
        }

        let lod = self.config.lod.params(zoom);
        let styled: Vec<StyledRoute> = routes.iter().map(StyledRoute::from_route).collect();
        let total_trips = routes.iter().map(|r| u64::from(r.trip_count)).sum();

        Ok(RoutePlan {
            lod,
            visible: lod.routes_visible,
            routes: styled,
            total_trips,
        })
    }

    /// LOD bundle for a zoom change
    #[inline]
    pub fn lod(&self, zoom: i32) -> LodParams {
        self.config.lod.params(zoom)
    }

    /// Route nearest to a clicked point
    #[inline]
    pub fn closest_route<'a>(&self, query: GeoPoint, routes: &'a [Route]) -> Option<&'a Route> {
        self.locator.find_closest(query, routes)
    }
}

/// Build a render plan with the default configuration
///
/// See [`RenderPlanner::build_with_limit`] for the failure cases.
pub fn build_render_plan(
    points: &[TripAggregatePoint],
    mode: VisualizationMode,
    limit: i64,
) -> Result<RenderPlan> {
    RenderPlanner::new(Config::default()).build_with_limit(points, mode, limit)
}

/// Style routes for a zoom level
///
/// See [`RenderPlanner::build_routes`] for the failure cases.
pub fn build_route_plan(routes: &[Route], zoom: i32, config: &Config) -> Result<RoutePlan> {
    RenderPlanner::new(config.clone()).build_routes(routes, zoom)
}
