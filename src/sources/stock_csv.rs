//! Loading of per-ticker price history from CSV files with a header row
//! (`Date,Open,High,Low,Close,Adj Close,Volume` as exported by most brokers).

use crate::frames::{points_from_frame, FrameColumns};
use crate::sources::error::SourceError;
use crate::types::point::TimeSeriesPoint;
use log::info;
use polars::prelude::*;
use std::path::Path;
use tokio::task;

pub const DATE_COLUMN: &str = "Date";
pub const CLOSE_COLUMN: &str = "Close";
pub const VOLUME_COLUMN: &str = "Volume";

/// Reads a ticker CSV file into a `DataFrame`, header included.
pub fn read_ticker_csv(path: &Path) -> Result<DataFrame, SourceError> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| SourceError::CsvRead(path.to_path_buf(), e))?
        .finish()
        .map_err(|e| SourceError::CsvRead(path.to_path_buf(), e))
}

/// Column mapping for a ticker frame: `Close` is the measurement and `Volume`,
/// when present, the auxiliary feature.
pub fn ticker_columns(df: &DataFrame) -> FrameColumns {
    let auxiliary = df.column(VOLUME_COLUMN).is_ok().then(|| VOLUME_COLUMN.to_string());
    FrameColumns::builder()
        .timestamp(DATE_COLUMN)
        .measurement(CLOSE_COLUMN)
        .maybe_auxiliary(auxiliary)
        .build()
}

/// Reads one ticker file and validates its rows into points grouped under `ticker`.
pub fn load_ticker(path: &Path, ticker: &str) -> Result<Vec<TimeSeriesPoint>, SourceError> {
    let df = read_ticker_csv(path)?;
    let points = points_from_frame(&df, &ticker_columns(&df), ticker)?;
    info!(
        "Loaded {} rows for ticker {} from {:?}",
        points.len(),
        ticker,
        path
    );
    Ok(points)
}

/// Loads several ticker files on blocking worker threads and concatenates
/// their points in the order the files were given.
///
/// # Example
///
/// ```no_run
/// # use trendline::{load_tickers, SourceError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), SourceError> {
/// let points = load_tickers(&[("AAPL.csv", "AAPL"), ("NFLX.csv", "NFLX")]).await?;
/// println!("{} rows", points.len());
/// # Ok(())
/// # }
/// ```
pub async fn load_tickers<P, S>(sources: &[(P, S)]) -> Result<Vec<TimeSeriesPoint>, SourceError>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let handles: Vec<_> = sources
        .iter()
        .map(|(path, ticker)| {
            let path = path.as_ref().to_path_buf();
            let ticker = ticker.as_ref().to_string();
            task::spawn_blocking(move || load_ticker(&path, &ticker))
        })
        .collect();

    let mut points = Vec::new();
    for handle in handles {
        points.extend(handle.await??);
    }
    Ok(points)
}
