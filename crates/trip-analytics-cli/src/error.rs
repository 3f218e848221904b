use std::path::PathBuf;

/// Error types for the command line front-end
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Analytics(#[from] trip_analytics_lib::AnalyticsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read {}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: Box<CliError>,
    },
}

pub type Result<T> = std::result::Result<T, CliError>;
