//! Error types for the command line

use error_stack::Report;
use smokechart::SmokeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    BadArgument(String),

    #[error("{0:?}")]
    Chart(Report<SmokeError>),
}

impl From<Report<SmokeError>> for CliError {
    fn from(report: Report<SmokeError>) -> Self {
        CliError::Chart(report)
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
