use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failures that abort a whole call. Problems with single records are
/// reported as [`DataIssue`](crate::issues::DataIssue)s instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("input has no header row")]
    EmptyInput,

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("similarity threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("invalid settings: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("report encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
