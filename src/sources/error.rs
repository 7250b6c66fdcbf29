use crate::series::error::SeriesError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("Weather API answered with status {status}: {message}")]
    ApiStatus { status: u16, message: String },

    #[error("City not found: '{0}'")]
    CityNotFound(String),

    #[error("Failed to parse JSON data")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to read CSV file '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Required column '{0}' not found in DataFrame")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Failed processing DataFrame: {0}")]
    Polars(#[from] PolarsError),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("No API key configured, set the API_KEY environment variable")]
    MissingApiKey(#[source] std::env::VarError),

    #[error(transparent)]
    Series(#[from] SeriesError),
}
