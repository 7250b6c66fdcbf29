//! Conversion between polars `DataFrame`s and the pipeline types.
//!
//! Tabular sources (ticker CSV files, anything else polars can read) enter the
//! pipeline through [`points_from_frame`]; results leave it as frames the
//! rendering layer can plot directly.

use crate::series::error::SeriesError;
use crate::series::summary::GroupSummary;
use crate::sources::error::SourceError;
use crate::types::bucket::Bucket;
use crate::types::normalized::NormalizedSeries;
use crate::types::point::TimeSeriesPoint;
use bon::Builder;
use polars::prelude::*;

/// Names the frame columns that make up a [`TimeSeriesPoint`].
///
/// Without an `auxiliary` column every point gets an auxiliary value of `0.0`.
#[derive(Debug, Clone, Builder)]
pub struct FrameColumns {
    #[builder(into)]
    pub timestamp: String,
    #[builder(into)]
    pub measurement: String,
    #[builder(into)]
    pub auxiliary: Option<String>,
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, SourceError> {
    df.column(name)
        .map_err(|e| SourceError::ColumnNotFound(name.to_string(), e))
}

/// Validates every row of `df` into a [`TimeSeriesPoint`] belonging to `group`.
///
/// The timestamp column is read as text (dates and datetimes are cast first),
/// numeric columns are cast to `f64`.
///
/// # Errors
///
/// * [`SourceError::ColumnNotFound`] if a named column is absent.
/// * [`SourceError::Series`] wrapping [`SeriesError::MalformedInput`] for the
///   first row with a null, unparseable or non-finite value.
pub fn points_from_frame(
    df: &DataFrame,
    columns: &FrameColumns,
    group: &str,
) -> Result<Vec<TimeSeriesPoint>, SourceError> {
    let timestamp_col = column(df, &columns.timestamp)?.cast(&DataType::String)?;
    let timestamps = timestamp_col.str()?;
    let measurement_col = column(df, &columns.measurement)?.cast(&DataType::Float64)?;
    let measurements = measurement_col.f64()?;
    let auxiliary_col = match &columns.auxiliary {
        Some(name) => Some(column(df, name)?.cast(&DataType::Float64)?),
        None => None,
    };
    let auxiliaries = auxiliary_col.as_ref().map(|c| c.f64()).transpose()?;

    let points = (0..df.height())
        .map(|row| {
            let timestamp = timestamps.get(row).ok_or_else(|| {
                SeriesError::malformed(format!("row {row}: timestamp is missing"))
            })?;
            let auxiliary = match auxiliaries {
                Some(values) => values.get(row),
                None => Some(0.0),
            };
            TimeSeriesPoint::parse(timestamp, group, measurements.get(row), auxiliary)
                .map_err(|e| e.with_context(format!("row {row}")))
        })
        .collect::<Result<Vec<_>, SeriesError>>()?;
    Ok(points)
}

/// Builds the key column of a bucket frame.
pub trait FrameKey: Clone {
    fn key_column(name: &str, keys: Vec<Self>) -> Column;
}

impl FrameKey for u32 {
    fn key_column(name: &str, keys: Vec<Self>) -> Column {
        Column::new(name.into(), keys)
    }
}

impl FrameKey for &'static str {
    fn key_column(name: &str, keys: Vec<Self>) -> Column {
        Column::new(name.into(), keys)
    }
}

impl FrameKey for String {
    fn key_column(name: &str, keys: Vec<Self>) -> Column {
        Column::new(name.into(), keys)
    }
}

/// Frame with columns `<key_name>`, `mean` and `count`, one row per bucket.
pub fn buckets_to_frame<K: FrameKey>(
    buckets: &[Bucket<K>],
    key_name: &str,
) -> Result<DataFrame, SourceError> {
    let keys: Vec<K> = buckets.iter().map(|b| b.key.clone()).collect();
    let means: Vec<f64> = buckets.iter().map(|b| b.mean_measurement).collect();
    let counts: Vec<u32> = buckets.iter().map(|b| b.count as u32).collect();
    Ok(DataFrame::new(vec![
        K::key_column(key_name, keys),
        Column::new("mean".into(), means),
        Column::new("count".into(), counts),
    ])?)
}

/// Long-format frame with columns `group`, `timestamp`, `measurement` and
/// `normalized`, one row per normalized point.
pub fn normalized_to_frame(series: &[NormalizedSeries]) -> Result<DataFrame, SourceError> {
    let rows = series.iter().flat_map(|s| s.points.iter().map(move |p| (s, p)));
    let mut groups = Vec::new();
    let mut timestamps = Vec::new();
    let mut measurements = Vec::new();
    let mut normalized = Vec::new();
    for (s, p) in rows {
        groups.push(s.group.clone());
        timestamps.push(p.timestamp.timestamp_millis());
        measurements.push(p.measurement);
        normalized.push(p.normalized_value);
    }

    let timestamp_column = Column::new("timestamp".into(), timestamps)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    Ok(DataFrame::new(vec![
        Column::new("group".into(), groups),
        timestamp_column,
        Column::new("measurement".into(), measurements),
        Column::new("normalized".into(), normalized),
    ])?)
}

/// Frame with columns `group`, `min`, `max`, `mean` and `count`.
pub fn summary_to_frame(summaries: &[GroupSummary]) -> Result<DataFrame, SourceError> {
    Ok(DataFrame::new(vec![
        Column::new(
            "group".into(),
            summaries.iter().map(|s| s.group.clone()).collect::<Vec<_>>(),
        ),
        Column::new("min".into(), summaries.iter().map(|s| s.min).collect::<Vec<_>>()),
        Column::new("max".into(), summaries.iter().map(|s| s.max).collect::<Vec<_>>()),
        Column::new("mean".into(), summaries.iter().map(|s| s.mean).collect::<Vec<_>>()),
        Column::new(
            "count".into(),
            summaries.iter().map(|s| s.count as u32).collect::<Vec<_>>(),
        ),
    ])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::bucketer::{hourly_means, monthly_means};
    use crate::series::normalizer::normalize;
    use crate::series::summary::summarize;

    fn stock_columns() -> FrameColumns {
        FrameColumns::builder()
            .timestamp("Date")
            .measurement("Close")
            .auxiliary("Volume")
            .build()
    }

    #[test]
    fn test_points_from_frame() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "Date" => ["2024-01-02", "2024-01-03"],
            "Close" => [185.64, 184.25],
            "Volume" => [82_488_700i64, 58_414_500]
        )?;
        let points = points_from_frame(&df, &stock_columns(), "AAPL")?;

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].group, "AAPL");
        assert_eq!(points[0].measurement, 185.64);
        assert_eq!(points[1].auxiliary, 58_414_500.0);
        assert_eq!(points[1].timestamp.date_naive().to_string(), "2024-01-03");
        Ok(())
    }

    #[test]
    fn test_points_without_auxiliary_column() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!("Date" => ["2024-01-02"], "Close" => [10i64])?;
        let columns = FrameColumns::builder()
            .timestamp("Date")
            .measurement("Close")
            .build();
        let points = points_from_frame(&df, &columns, "NFLX")?;
        assert_eq!(points[0].measurement, 10.0);
        assert_eq!(points[0].auxiliary, 0.0);
        Ok(())
    }

    #[test]
    fn test_null_measurement_is_malformed() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "Date" => ["2024-01-02", "2024-01-03"],
            "Close" => [Some(1.0), None],
            "Volume" => [1i64, 2]
        )?;
        let err = points_from_frame(&df, &stock_columns(), "AAPL").unwrap_err();
        match err {
            SourceError::Series(SeriesError::MalformedInput { reason }) => {
                assert!(reason.starts_with("row 1"), "{reason}")
            }
            other => panic!("unexpected error {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_missing_column() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!("Date" => ["2024-01-02"], "Open" => [1.0])?;
        let err = points_from_frame(&df, &stock_columns(), "AAPL").unwrap_err();
        assert!(matches!(err, SourceError::ColumnNotFound(ref name, _) if name == "Close"));
        Ok(())
    }

    #[test]
    fn test_bucket_frames() -> Result<(), Box<dyn std::error::Error>> {
        let points = vec![
            TimeSeriesPoint::parse("2024-05-01 10:00:00", "X", Some(20.0), Some(40.0))?,
            TimeSeriesPoint::parse("2024-06-01 11:00:00", "X", Some(21.0), Some(42.0))?,
            TimeSeriesPoint::parse("2024-06-02 10:00:00", "X", Some(19.0), Some(38.0))?,
        ];

        let hourly = buckets_to_frame(&hourly_means(&points), "hour")?;
        assert_eq!(hourly.height(), 2);
        assert_eq!(hourly.column("hour")?.u32()?.get(0), Some(10));
        assert_eq!(hourly.column("mean")?.f64()?.get(0), Some(19.5));
        assert_eq!(hourly.column("count")?.u32()?.get(0), Some(2));

        let monthly = buckets_to_frame(&monthly_means(&points), "month")?;
        assert_eq!(monthly.column("month")?.str()?.get(1), Some("June"));
        assert_eq!(monthly.column("mean")?.f64()?.get(1), Some(20.0));
        Ok(())
    }

    #[test]
    fn test_normalized_and_summary_frames() -> Result<(), Box<dyn std::error::Error>> {
        let points = vec![
            TimeSeriesPoint::parse("2024-01-02", "AAPL", Some(100.0), Some(0.0))?,
            TimeSeriesPoint::parse("2024-01-03", "AAPL", Some(120.0), Some(0.0))?,
            TimeSeriesPoint::parse("2024-01-02", "NFLX", Some(50.0), Some(0.0))?,
        ];

        let normalized = normalized_to_frame(&normalize(&points)?)?;
        assert_eq!(normalized.shape(), (3, 4));
        assert_eq!(
            normalized.column("timestamp")?.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(normalized.column("normalized")?.f64()?.get(1), Some(120.0));
        assert_eq!(normalized.column("group")?.str()?.get(2), Some("NFLX"));

        let summary = summary_to_frame(&summarize(&points))?;
        assert_eq!(summary.shape(), (2, 5));
        assert_eq!(summary.column("mean")?.f64()?.get(0), Some(110.0));
        Ok(())
    }
}
