use clap::Parser;
use std::path::PathBuf;
use trip_analytics_lib::{GeoPoint, VisualizationMode};

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Trip Analytics - Turn aggregated trip snapshots into heatmap, hotspot and route render plans
pub struct Settings {
    /// Snapshot JSON files (`{"points": [...], "routes": [...]}`), merged in the given order
    #[clap(value_name = "FILE", required = true)]
    pub snapshot_files: Vec<PathBuf>,

    /// Visualization mode: intensity, duration or distance
    #[clap(short, long, default_value = "intensity")]
    pub mode: String,

    /// Number of hotspots to rank (overrides the config file)
    #[clap(short, long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Current map zoom level, used for heatmap LOD and route visibility
    #[clap(short, long, default_value = "13", allow_negative_numbers = true)]
    pub zoom: i32,

    /// Latitude of a map click to resolve to the nearest route
    #[clap(long, requires = "click_lng", allow_negative_numbers = true)]
    pub click_lat: Option<f64>,

    /// Longitude of a map click to resolve to the nearest route
    #[clap(long, requires = "click_lat", allow_negative_numbers = true)]
    pub click_lng: Option<f64>,

    /// JSON file overriding the planner configuration (scale divisors, hotspot limit, LOD bands)
    #[clap(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[clap(long, default_value = "false")]
    pub pretty: bool,
}

impl Settings {
    pub fn visualization_mode(&self) -> VisualizationMode {
        VisualizationMode::from(self.mode.as_str())
    }

    pub fn click(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.click_lat?, self.click_lng?))
    }
}
