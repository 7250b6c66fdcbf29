//! Rescales each group of a series so that its first point reads 100, which is
//! what lets differently priced tickers share one comparison chart.

use crate::series::error::SeriesError;
use crate::series::group_points;
use crate::types::normalized::{NormalizedPoint, NormalizedSeries};
use crate::types::point::TimeSeriesPoint;

const BASELINE: f64 = 100.0;

/// Normalizes every group found in `points`.
///
/// Groups are returned in order of first appearance. Inside a group the input
/// order is kept as-is: callers must sort chronologically beforehand (see
/// [`crate::sort_chronologically`]), the first point of each group is taken as
/// the baseline.
///
/// # Errors
///
/// * [`SeriesError::DivisionByZero`] if a group's baseline measurement is zero.
/// * [`SeriesError::MalformedInput`] if any measurement is not finite.
///
/// The first failing group aborts the whole call. Use [`normalize_group`] to
/// skip failing groups instead.
///
/// # Example
///
/// ```
/// use trendline::{normalize, TimeSeriesPoint};
///
/// let points = vec![
///     TimeSeriesPoint::parse("2024-01-02", "AAPL", Some(100.0), Some(0.0))?,
///     TimeSeriesPoint::parse("2024-01-03", "AAPL", Some(110.0), Some(0.0))?,
///     TimeSeriesPoint::parse("2024-01-02", "NFLX", Some(400.0), Some(0.0))?,
///     TimeSeriesPoint::parse("2024-01-03", "NFLX", Some(380.0), Some(0.0))?,
/// ];
/// let series = normalize(&points)?;
/// assert_eq!(series[0].group, "AAPL");
/// assert_eq!(series[1].points[0].normalized_value, 100.0);
/// assert_eq!(series[1].points[1].normalized_value, 95.0);
/// # Ok::<(), trendline::SeriesError>(())
/// ```
pub fn normalize(points: &[TimeSeriesPoint]) -> Result<Vec<NormalizedSeries>, SeriesError> {
    group_points(points)
        .into_iter()
        .map(|(group, members)| normalize_group(group, &members))
        .collect()
}

/// Like [`normalize`], restricted to the groups named in `groups`.
///
/// Points of other groups are left out of the result entirely rather than
/// being carried along with a placeholder value.
pub fn normalize_selected<S: AsRef<str>>(
    points: &[TimeSeriesPoint],
    groups: &[S],
) -> Result<Vec<NormalizedSeries>, SeriesError> {
    group_points(points)
        .into_iter()
        .filter(|(group, _)| groups.iter().any(|g| g.as_ref() == *group))
        .map(|(group, members)| normalize_group(group, &members))
        .collect()
}

/// Normalizes a single, already chronologically sorted group.
///
/// An empty `members` slice yields an empty series.
pub fn normalize_group(
    group: &str,
    members: &[&TimeSeriesPoint],
) -> Result<NormalizedSeries, SeriesError> {
    if let Some(bad) = members.iter().find(|p| !p.measurement.is_finite()) {
        return Err(SeriesError::malformed(format!(
            "measurement for group '{}' at {} is not finite",
            group, bad.timestamp
        )));
    }

    let Some(first) = members.first() else {
        return Ok(NormalizedSeries {
            group: group.to_string(),
            points: Vec::new(),
        });
    };
    let baseline = first.measurement;
    if baseline == 0.0 {
        return Err(SeriesError::DivisionByZero {
            group: group.to_string(),
        });
    }

    let points = members
        .iter()
        .enumerate()
        .map(|(i, p)| NormalizedPoint {
            timestamp: p.timestamp,
            measurement: p.measurement,
            normalized_value: if i == 0 {
                BASELINE
            } else {
                p.measurement / baseline * BASELINE
            },
        })
        .collect();

    Ok(NormalizedSeries {
        group: group.to_string(),
        points,
    })
}
