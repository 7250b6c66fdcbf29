//! Defines [`TimeSeriesPoint`], the single observation every stage of the trend
//! pipeline consumes, together with its validated construction step.

use crate::series::error::SeriesError;
use crate::types::timestamp::IntoTimestamp;
use chrono::{DateTime, Datelike, Timelike, Utc};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One observation in a time series.
///
/// * `group` - partition key, e.g. a ticker symbol or a city name.
/// * `measurement` - the value being charted (temperature, close price).
/// * `auxiliary` - a secondary numeric feature (humidity, traded volume).
///
/// [`TimeSeriesPoint::new`] does not check its numeric fields; the bucketer
/// tolerates non-finite measurements. Use [`TimeSeriesPoint::parse`] or
/// [`TimeSeriesPoint::try_new`] when building points from untyped sources.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub group: String,
    pub measurement: f64,
    pub auxiliary: f64,
}

impl TimeSeriesPoint {
    pub fn new(
        timestamp: DateTime<Utc>,
        group: impl Into<String>,
        measurement: f64,
        auxiliary: f64,
    ) -> Self {
        Self {
            timestamp,
            group: group.into(),
            measurement,
            auxiliary,
        }
    }

    /// Builds a point from a typed timestamp and possibly-missing numeric fields.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::MalformedInput`] if either field is missing or not finite.
    pub fn try_new(
        timestamp: DateTime<Utc>,
        group: impl Into<String>,
        measurement: Option<f64>,
        auxiliary: Option<f64>,
    ) -> Result<Self, SeriesError> {
        let measurement = require_finite("measurement", measurement)?;
        let auxiliary = require_finite("auxiliary", auxiliary)?;
        Ok(Self::new(timestamp, group, measurement, auxiliary))
    }

    /// Builds a point from a textual timestamp, see [`IntoTimestamp`] for accepted layouts.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::MalformedInput`] if the timestamp cannot be parsed or
    /// a numeric field is missing or not finite.
    ///
    /// # Example
    ///
    /// ```
    /// use trendline::TimeSeriesPoint;
    ///
    /// let point = TimeSeriesPoint::parse("2024-05-01 15:00:00", "Karachi", Some(31.5), Some(58.0))?;
    /// assert_eq!(point.hour_of_day(), 15);
    /// assert_eq!(point.month_name(), "May");
    ///
    /// assert!(TimeSeriesPoint::parse("not a date", "Karachi", Some(31.5), Some(58.0)).is_err());
    /// # Ok::<(), trendline::SeriesError>(())
    /// ```
    pub fn parse(
        timestamp: &str,
        group: impl Into<String>,
        measurement: Option<f64>,
        auxiliary: Option<f64>,
    ) -> Result<Self, SeriesError> {
        let parsed = timestamp
            .into_timestamp()
            .ok_or_else(|| SeriesError::malformed(format!("unparseable timestamp '{timestamp}'")))?;
        Self::try_new(parsed, group, measurement, auxiliary)
    }

    pub fn is_finite(&self) -> bool {
        self.measurement.is_finite() && self.auxiliary.is_finite()
    }

    /// Hour of day in UTC, 0 to 23.
    pub fn hour_of_day(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Calendar month, 1 to 12.
    pub fn month_number(&self) -> u32 {
        self.timestamp.month()
    }

    /// English month name, e.g. "March".
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.timestamp.month0() as usize]
    }
}

fn require_finite(field: &str, value: Option<f64>) -> Result<f64, SeriesError> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(SeriesError::malformed(format!("{field} is not finite ({v})"))),
        None => Err(SeriesError::malformed(format!("{field} is missing"))),
    }
}

/// Stable sort by timestamp. The normalizer expects its input in this order
/// and never sorts on its own.
pub fn sort_chronologically(points: &mut [TimeSeriesPoint]) {
    points.sort_by_key(|p| p.timestamp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_valid_point() {
        let point = TimeSeriesPoint::parse("2024-12-31 23:00:00", "Oslo", Some(-4.0), Some(81.0))
            .unwrap();
        assert_eq!(point.group, "Oslo");
        assert_eq!(point.hour_of_day(), 23);
        assert_eq!(point.month_number(), 12);
        assert_eq!(point.month_name(), "December");
    }

    #[test]
    fn test_parse_missing_measurement_is_malformed() {
        let err = TimeSeriesPoint::parse("2024-12-31 23:00:00", "Oslo", None, Some(81.0))
            .unwrap_err();
        assert!(matches!(err, SeriesError::MalformedInput { .. }));
    }

    #[test]
    fn test_parse_nan_auxiliary_is_malformed() {
        let err = TimeSeriesPoint::parse("2024-12-31", "Oslo", Some(1.0), Some(f64::NAN))
            .unwrap_err();
        match err {
            SeriesError::MalformedInput { reason } => assert!(reason.contains("auxiliary")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_parse_bad_timestamp_is_malformed() {
        let err = TimeSeriesPoint::parse("31/12/2024", "Oslo", Some(1.0), Some(2.0)).unwrap_err();
        match err {
            SeriesError::MalformedInput { reason } => assert!(reason.contains("31/12/2024")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_sort_chronologically_is_stable() {
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let mut points = vec![
            TimeSeriesPoint::new(t2, "B", 2.0, 0.0),
            TimeSeriesPoint::new(t1, "A", 1.0, 0.0),
            TimeSeriesPoint::new(t2, "A", 3.0, 0.0),
        ];
        sort_chronologically(&mut points);
        let order: Vec<(&str, f64)> = points
            .iter()
            .map(|p| (p.group.as_str(), p.measurement))
            .collect();
        assert_eq!(order, vec![("A", 1.0), ("B", 2.0), ("A", 3.0)]);
    }
}
