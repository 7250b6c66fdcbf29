//! Data sources that feed the trend pipeline: the OpenWeatherMap API and
//! ticker CSV files. Everything untyped is validated here, before it becomes a
//! [`crate::TimeSeriesPoint`].

pub mod client;
pub mod error;
pub mod openweather;
pub mod stock_csv;
