//! Trend aggregation, baseline normalization and next-hour prediction for
//! weather and stock time series.
//!
//! The core ([`bucket`], [`normalize`], [`predict_next`]) is a set of pure
//! functions over [`TimeSeriesPoint`] slices. Around it sit validated data
//! sources (OpenWeatherMap, ticker CSV files), polars frame conversion for
//! charting, and report snapshots that bundle everything one dashboard
//! render needs.

mod error;
mod frames;
mod reports;
mod series;
mod sources;
mod types;

pub use error::TrendlineError;

pub use series::bucketer::{bucket, hourly_means, monthly_means};
pub use series::error::SeriesError;
pub use series::filter::PointFilter;
pub use series::normalizer::{normalize, normalize_group, normalize_selected};
pub use series::predictor::{fit_predict, predict_next, LinearModel, Prediction};
pub use series::summary::{summarize, GroupSummary};

pub use types::bucket::{Bucket, BucketOrder};
pub use types::normalized::{NormalizedPoint, NormalizedSeries};
pub use types::point::{sort_chronologically, TimeSeriesPoint};
pub use types::temperature_alert::{TemperatureAlert, LOW_TEMPERATURE_THRESHOLD};
pub use types::timestamp::IntoTimestamp;

pub use sources::client::{
    ForecastClient, Units, API_KEY_VAR, DEFAULT_BASE_URL, DEFAULT_GEO_URL,
};
pub use sources::error::SourceError;
pub use sources::openweather::*;
pub use sources::stock_csv::{load_ticker, load_tickers, read_ticker_csv, ticker_columns};

pub use frames::{
    buckets_to_frame, normalized_to_frame, points_from_frame, summary_to_frame, FrameColumns,
    FrameKey,
};
pub use reports::{StockComparison, WeatherReport, DEFAULT_HIGH_TEMPERATURE};
