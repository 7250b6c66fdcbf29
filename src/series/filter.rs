use crate::types::point::TimeSeriesPoint;
use bon::Builder;
use chrono::NaiveDate;

/// Selects points by group and by an inclusive calendar-date window.
///
/// An empty `groups` list selects every group. Dates are compared on the UTC
/// calendar date of each point, so an `end` of `2024-03-31` keeps every
/// observation made on that day.
///
/// # Example
///
/// ```
/// use trendline::{PointFilter, TimeSeriesPoint};
/// use chrono::NaiveDate;
///
/// let points = vec![
///     TimeSeriesPoint::parse("2024-03-01", "AAPL", Some(180.0), Some(0.0))?,
///     TimeSeriesPoint::parse("2024-04-01", "AAPL", Some(170.0), Some(0.0))?,
///     TimeSeriesPoint::parse("2024-03-01", "NFLX", Some(600.0), Some(0.0))?,
/// ];
/// let filter = PointFilter::builder()
///     .groups(vec!["AAPL".to_string()])
///     .end(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap())
///     .build();
///
/// let kept = filter.apply(&points);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].measurement, 180.0);
/// # Ok::<(), trendline::SeriesError>(())
/// ```
#[derive(Debug, Clone, Default, Builder)]
pub struct PointFilter {
    #[builder(default)]
    pub groups: Vec<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl PointFilter {
    pub fn matches(&self, point: &TimeSeriesPoint) -> bool {
        let date = point.timestamp.date_naive();
        (self.groups.is_empty() || self.groups.iter().any(|g| *g == point.group))
            && self.start.map_or(true, |start| date >= start)
            && self.end.map_or(true, |end| date <= end)
    }

    /// Returns clones of the matching points, preserving input order.
    pub fn apply(&self, points: &[TimeSeriesPoint]) -> Vec<TimeSeriesPoint> {
        points.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}
