//! Zoom-driven level of detail
//!
//! The heatmap kernel shrinks in three bands as the map zooms in, and routes are hidden below a
//! minimum zoom. Everything here is a pure function of the zoom level, re-evaluated on every
//! zoom change.

use crate::{AnalyticsError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Heatmap kernel parameters in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct HeatmapParams {
    pub radius_px: u32,
    pub blur_px: u32,
}

impl HeatmapParams {
    pub const fn new(radius_px: u32, blur_px: u32) -> Self {
        Self { radius_px, blur_px }
    }
}

/// Full LOD bundle handed to the renderer on a zoom event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LodParams {
    pub zoom: i32,
    pub heatmap: HeatmapParams,
    pub min_visible_zoom: i32,
    pub routes_visible: bool,
}

/// Zoom bands and the parameters used inside each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct LodConfig {
    /// Zoom at or above which the `close` kernel applies
    pub close_zoom: i32,
    /// Zoom at or above which the `medium` kernel applies (below `close_zoom`)
    pub medium_zoom: i32,
    pub close: HeatmapParams,
    pub medium: HeatmapParams,
    pub far: HeatmapParams,
    /// Routes are drawn at this zoom and above
    pub route_min_zoom: i32,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            close_zoom: 15,
            medium_zoom: 12,
            close: HeatmapParams::new(15, 10),
            medium: HeatmapParams::new(25, 15),
            far: HeatmapParams::new(35, 20),
            route_min_zoom: 11,
        }
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl LodConfig {
    /// Check that all three bands are reachable (`close_zoom` above `medium_zoom`)
    pub fn validate(&self) -> Result<()> {
        if self.close_zoom <= self.medium_zoom {
            return Err(AnalyticsError::InvalidArgument(format!(
                "lod closeZoom ({}) must be greater than mediumZoom ({})",
                self.close_zoom, self.medium_zoom
            )));
        }
        Ok(())
    }

    pub fn heatmap_params(&self, zoom: i32) -> HeatmapParams {
        if zoom >= self.close_zoom {
            self.close
        } else if zoom >= self.medium_zoom {
            self.medium
        } else {
            self.far
        }
    }

    #[inline]
    pub fn routes_visible(&self, zoom: i32) -> bool {
        zoom >= self.route_min_zoom
    }

    pub fn params(&self, zoom: i32) -> LodParams {
        LodParams {
            zoom,
            heatmap: self.heatmap_params(zoom),
            min_visible_zoom: self.route_min_zoom,
            routes_visible: self.routes_visible(zoom),
        }
    }
}

/// Heatmap kernel for a zoom level with the default bands
pub fn heatmap_params_for_zoom(zoom: i32) -> HeatmapParams {
    LodConfig::default().heatmap_params(zoom)
}

/// Whether routes are drawn at a zoom level with the default threshold
pub fn route_visibility_for_zoom(zoom: i32) -> bool {
    LodConfig::default().routes_visible(zoom)
}

/// Complete LOD bundle for a zoom level
pub fn lod_for_zoom(zoom: i32, config: &LodConfig) -> LodParams {
    config.params(zoom)
}
