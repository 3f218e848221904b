//! Snapshot loading
//!
//! A snapshot file holds aggregated pickup buckets and pickup/dropoff pairs as delivered by the
//! backend. Several files are parsed in parallel and merged in argument order; route indices
//! are assigned by that merged ingestion order.

use crate::error::{CliError, Result};
use rayon::prelude::*;
use serde::Deserialize;
use std::path::Path;
use trip_analytics_lib::{GeoPoint, Route, TripAggregatePoint};

/// A route as it appears on disk, before it is given an ingestion index
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
    pub pickup: GeoPoint,
    pub dropoff: GeoPoint,
    #[serde(default)]
    pub trip_count: u32,
    #[serde(default)]
    pub avg_duration_seconds: f64,
    #[serde(default)]
    pub avg_distance_km: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub points: Vec<TripAggregatePoint>,
    #[serde(default)]
    pub routes: Vec<RouteRecord>,
}

/// Merged view over every loaded file
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub points: Vec<TripAggregatePoint>,
    pub routes: Vec<Route>,
}

impl Snapshot {
    /// Concatenate files in order, numbering routes as they are ingested
    pub fn merge(files: Vec<SnapshotFile>) -> Self {
        let mut snapshot = Snapshot::default();
        for file in files {
            snapshot.points.extend(file.points);
            for record in file.routes {
                let index = snapshot.routes.len();
                snapshot.routes.push(Route::new(
                    record.pickup,
                    record.dropoff,
                    record.trip_count,
                    record.avg_duration_seconds,
                    record.avg_distance_km,
                    index,
                ));
            }
        }
        snapshot
    }

    /// Load snapshot files in parallel
    pub fn load_from_files<P: AsRef<Path> + Send + Sync>(paths: &[P]) -> Result<Self> {
        let files: Result<Vec<SnapshotFile>> = paths
            .par_iter()
            .map(|path| {
                let path = path.as_ref();
                read_snapshot_file(path).map_err(|e| CliError::Snapshot {
                    path: path.to_path_buf(),
                    source: Box::new(e),
                })
            })
            .collect();

        let snapshot = Self::merge(files?);
        tracing::info!(
            "Loaded {} points and {} routes from {} file(s)",
            snapshot.points.len(),
            snapshot.routes.len(),
            paths.len()
        );
        Ok(snapshot)
    }
}

fn read_snapshot_file(path: &Path) -> Result<SnapshotFile> {
    let json = std::fs::read_to_string(path)?;
    parse_snapshot(&json)
}

/// Parse a snapshot document from a string
pub fn parse_snapshot(json: &str) -> Result<SnapshotFile> {
    Ok(serde_json::from_str(json)?)
}
