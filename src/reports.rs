//! Immutable snapshots of everything a dashboard renders for one input.
//!
//! A report is rebuilt from scratch on every input change and owns its data,
//! so there is no shared "current"/"forecast" state to keep in sync between
//! render cycles.

use crate::error::TrendlineError;
use crate::series::bucketer::{hourly_means, monthly_means};
use crate::series::error::SeriesError;
use crate::series::filter::PointFilter;
use crate::series::group_points;
use crate::series::normalizer::normalize_group;
use crate::series::predictor::{predict_next, Prediction};
use crate::series::summary::{summarize, GroupSummary};
use crate::sources::client::ForecastClient;
use crate::sources::openweather::CurrentConditions;
use crate::types::bucket::Bucket;
use crate::types::normalized::NormalizedSeries;
use crate::types::point::{sort_chronologically, TimeSeriesPoint};
use crate::types::temperature_alert::TemperatureAlert;
use log::warn;

/// Default upper threshold (°C) for [`TemperatureAlert::High`].
pub const DEFAULT_HIGH_TEMPERATURE: f64 = 35.0;

/// Weather dashboard snapshot for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub current: Option<CurrentConditions>,
    pub alert: Option<TemperatureAlert>,
    pub forecast: Vec<TimeSeriesPoint>,
    /// Mean temperature per hour of day, by hour.
    pub hourly: Vec<Bucket<u32>>,
    /// Mean temperature per month, in calendar sequence of the forecast.
    pub monthly: Vec<Bucket<&'static str>>,
    /// Next-hour temperature; an error here means "insufficient data for prediction".
    pub prediction: Result<Prediction, SeriesError>,
}

impl WeatherReport {
    /// Builds a report, classifying the current temperature against
    /// [`DEFAULT_HIGH_TEMPERATURE`].
    pub fn build(current: Option<CurrentConditions>, forecast: Vec<TimeSeriesPoint>) -> Self {
        Self::build_with_threshold(current, forecast, DEFAULT_HIGH_TEMPERATURE)
    }

    /// Resolves `city` through the geocoding endpoint, then fetches current
    /// conditions and the forecast at its coordinates and builds a report.
    ///
    /// # Errors
    ///
    /// [`TrendlineError::Source`] if the city is unknown, a request fails or
    /// the forecast is malformed, [`TrendlineError::Series`] if the current
    /// conditions are.
    /// A failed prediction is not an error, see [`WeatherReport::prediction`].
    pub async fn fetch(
        client: &ForecastClient,
        city: &str,
        high_threshold: f64,
    ) -> Result<Self, TrendlineError> {
        let location = client.locate(city).await?;
        let coords = location.coordinates();
        let current = client.current_at(coords).await?.conditions()?;
        let forecast = client.forecast_points_at(coords, &location.name).await?;
        Ok(Self::build_with_threshold(
            Some(current),
            forecast,
            high_threshold,
        ))
    }

    pub fn build_with_threshold(
        current: Option<CurrentConditions>,
        forecast: Vec<TimeSeriesPoint>,
        high_threshold: f64,
    ) -> Self {
        let prediction = predict_next(&forecast);
        if let Err(e) = &prediction {
            warn!("No temperature prediction available: {}", e);
        }
        Self {
            alert: current.as_ref().map(|c| c.alert(high_threshold)),
            hourly: hourly_means(&forecast),
            monthly: monthly_means(&forecast),
            prediction,
            current,
            forecast,
        }
    }
}

/// Stock comparison snapshot: selected tickers rebased to 100, plus summary statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct StockComparison {
    /// Filtered points in chronological order.
    pub points: Vec<TimeSeriesPoint>,
    pub normalized: Vec<NormalizedSeries>,
    pub summary: Vec<GroupSummary>,
    /// Groups left out of `normalized` and why.
    pub skipped: Vec<(String, SeriesError)>,
}

impl StockComparison {
    /// Filters `points`, sorts them chronologically and normalizes each
    /// remaining group.
    ///
    /// A group whose normalization fails (zero baseline, non-finite close) is
    /// skipped and reported in `skipped`; the other groups are unaffected.
    ///
    /// # Example
    ///
    /// ```
    /// use trendline::{PointFilter, StockComparison, TimeSeriesPoint};
    ///
    /// let points = vec![
    ///     TimeSeriesPoint::parse("2024-01-03", "AAPL", Some(110.0), Some(0.0))?,
    ///     TimeSeriesPoint::parse("2024-01-02", "AAPL", Some(100.0), Some(0.0))?,
    ///     TimeSeriesPoint::parse("2024-01-02", "NFLX", Some(0.0), Some(0.0))?,
    /// ];
    /// let comparison = StockComparison::build(points, &PointFilter::default());
    ///
    /// assert_eq!(comparison.normalized.len(), 1);
    /// assert_eq!(comparison.normalized[0].latest(), Some(110.0));
    /// assert_eq!(comparison.skipped[0].0, "NFLX");
    /// # Ok::<(), trendline::SeriesError>(())
    /// ```
    pub fn build(points: Vec<TimeSeriesPoint>, filter: &PointFilter) -> Self {
        let mut selected = filter.apply(&points);
        sort_chronologically(&mut selected);

        let mut normalized = Vec::new();
        let mut skipped = Vec::new();
        for (group, members) in group_points(&selected) {
            match normalize_group(group, &members) {
                Ok(series) => normalized.push(series),
                Err(e) => {
                    warn!("Skipping group {} in comparison: {}", group, e);
                    skipped.push((group.to_string(), e));
                }
            }
        }

        Self {
            summary: summarize(&selected),
            normalized,
            skipped,
            points: selected,
        }
    }
}
