//! Trip Analytics command line front-end
//!
//! Loads one or more snapshot files, runs them through the analytics core and prints a single
//! JSON document (render plan, LOD, route plan and optional nearest-route hit) on stdout.
//! Logs go to stderr and are filtered with `RUST_LOG`.

mod error;
mod settings;
mod snapshot;

use clap::Parser;
use error::Result;
use serde::Serialize;
use settings::Settings;
use snapshot::Snapshot;
use std::process::ExitCode;
use trip_analytics_lib::{
    AnalyticsError, Config, LodParams, RenderPlan, RenderPlanner, Route, RoutePlan,
    VisualizationMode,
};

/// Everything printed for one invocation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Output<'a> {
    mode: VisualizationMode,
    /// `None` when the snapshot has no points and rendering should be skipped
    render_plan: Option<RenderPlan>,
    lod: LodParams,
    route_plan: RoutePlan,
    closest_route: Option<&'a Route>,
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(settings: &Settings) -> Result<Config> {
    let mut config = match &settings.config {
        Some(path) => {
            let reader = std::io::BufReader::new(std::fs::File::open(path)?);
            let config: Config = serde_json::from_reader(reader)?;
            tracing::info!("Loaded planner configuration from {}", path.display());
            config
        }
        None => Config::default(),
    };
    if let Some(limit) = settings.limit {
        config.hotspot_limit = limit;
    }
    config.validate()?;
    Ok(config)
}

/// Run the core over a loaded snapshot
///
/// An empty point set only drops the render plan; invalid input of any kind fails the whole
/// invocation.
fn build_output<'a>(
    settings: &Settings,
    planner: &RenderPlanner,
    snapshot: &'a Snapshot,
) -> Result<Output<'a>> {
    let mode = settings.visualization_mode();
    if mode == VisualizationMode::Unknown {
        tracing::warn!(
            "Unknown visualization mode '{}', falling back to default weights and colours",
            settings.mode
        );
    }

    let render_plan = match planner.build(&snapshot.points, mode) {
        Ok(plan) => Some(plan),
        Err(e) if e.is_recoverable() => {
            tracing::warn!("{e}; skipping heatmap and hotspots");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let route_plan = planner.build_routes(&snapshot.routes, settings.zoom)?;

    let closest_route = settings.click().and_then(|click| {
        if !click.is_valid() {
            tracing::warn!(
                "Ignoring click outside valid coordinates: ({}, {})",
                click.lat,
                click.lng
            );
            return None;
        }
        let hit = planner.closest_route(click, &snapshot.routes);
        match hit {
            Some(route) => tracing::info!("Closest route to click is #{}", route.index),
            None => tracing::info!("No routes to match the click against"),
        }
        hit
    });

    Ok(Output {
        mode,
        render_plan,
        lod: planner.lod(settings.zoom),
        route_plan,
        closest_route,
    })
}

fn run(settings: Settings) -> Result<()> {
    let config = load_config(&settings)?;
    let snapshot = Snapshot::load_from_files(settings.snapshot_files.as_slice())?;
    let planner = RenderPlanner::new(config);
    let output = build_output(&settings, &planner, &snapshot)?;

    let stdout = std::io::stdout().lock();
    if settings.pretty {
        serde_json::to_writer_pretty(stdout, &output)?;
    } else {
        serde_json::to_writer(stdout, &output)?;
    }
    println!();

    Ok(())
}

fn main() -> ExitCode {
    init_logging();

    let settings = Settings::parse();
    match run(settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            if matches!(e, error::CliError::Analytics(AnalyticsError::InvalidArgument(_))) {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use error::CliError;
    use trip_analytics_lib::{GeoPoint, TripAggregatePoint};

    fn settings(extra: &[&str]) -> Settings {
        let args = ["trip-analytics", "snapshot.json"].into_iter().chain(extra.iter().copied());
        Settings::try_parse_from(args).unwrap()
    }

    fn route(pickup: GeoPoint, index: usize) -> Route {
        Route::new(pickup, GeoPoint::new(40.64, -73.78), 12, 900.0, 20.0, index)
    }

    fn snapshot_with_routes() -> Snapshot {
        Snapshot {
            points: vec![
                TripAggregatePoint::new(GeoPoint::new(40.75, -73.99), 90, 840.0, 3.2),
                TripAggregatePoint::new(GeoPoint::new(40.70, -74.01), 15, 300.0, 1.0),
            ],
            routes: vec![
                route(GeoPoint::new(40.75, -73.99), 0),
                route(GeoPoint::new(40.80, -73.95), 1),
            ],
        }
    }

    #[test]
    fn test_points_free_snapshot_skips_render_plan() {
        let snapshot = Snapshot {
            points: Vec::new(),
            ..snapshot_with_routes()
        };
        let planner = RenderPlanner::new(Config::default());
        let output = build_output(&settings(&[]), &planner, &snapshot).unwrap();

        assert!(output.render_plan.is_none());
        assert_eq!(output.route_plan.routes.len(), 2);
        assert!(output.closest_route.is_none());

        let json = serde_json::to_value(&output).unwrap();
        assert!(json["renderPlan"].is_null());
    }

    #[test]
    fn test_output_with_points_and_click() {
        let snapshot = snapshot_with_routes();
        let planner = RenderPlanner::new(Config::default());
        let settings = settings(&["-z", "14", "--click-lat", "40.801", "--click-lng", "-73.951"]);
        let output = build_output(&settings, &planner, &snapshot).unwrap();

        let plan = output.render_plan.unwrap();
        assert_eq!(plan.hotspots.len(), 2);
        assert_eq!(output.lod.zoom, 14);
        assert!(output.route_plan.visible);
        assert_eq!(output.closest_route.map(|r| r.index), Some(1));
    }

    #[test]
    fn test_invalid_click_is_ignored() {
        let snapshot = snapshot_with_routes();
        let planner = RenderPlanner::new(Config::default());
        let settings = settings(&["--click-lat", "95.0", "--click-lng", "0.0"]);
        let output = build_output(&settings, &planner, &snapshot).unwrap();
        assert!(output.closest_route.is_none());
    }

    #[test]
    fn test_invalid_route_fails_invocation() {
        let mut snapshot = snapshot_with_routes();
        snapshot.routes.push(route(GeoPoint::new(500.0, -73.9), 2));
        let planner = RenderPlanner::new(Config::default());
        let settings = settings(&["--click-lat", "40.7", "--click-lng", "-73.9"]);

        let err = build_output(&settings, &planner, &snapshot).unwrap_err();
        assert!(matches!(err, CliError::Analytics(AnalyticsError::InvalidArgument(_))));
    }

    #[test]
    fn test_limit_flag_overrides_config() {
        let config = load_config(&settings(&["--limit", "3"])).unwrap();
        assert_eq!(config.hotspot_limit, 3);

        let config = load_config(&settings(&[])).unwrap();
        assert_eq!(config.hotspot_limit, Config::default().hotspot_limit);
    }

    #[test]
    fn test_limit_override_applies_to_hotspots() {
        let config = load_config(&settings(&["--limit", "1"])).unwrap();
        let planner = RenderPlanner::new(config);
        let snapshot = snapshot_with_routes();
        let output = build_output(&settings(&[]), &planner, &snapshot).unwrap();
        let plan = output.render_plan.unwrap();
        assert_eq!(plan.hotspots.len(), 1);
        assert_eq!(plan.hotspots[0].point.trip_count, 90);
    }

    #[test]
    fn test_config_file_with_inverted_lod_bands_rejected() {
        let name = format!("trip-analytics-lod-{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, r#"{ "lod": { "closeZoom": 10, "mediumZoom": 14 } }"#).unwrap();

        let result = load_config(&settings(&["--config", path.to_str().unwrap()]));
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            result,
            Err(CliError::Analytics(AnalyticsError::InvalidArgument(_)))
        ));
    }
}
