//! Groups a time series by a calendar-derived key and averages the measurement
//! per key. This backs the hourly and monthly trend charts.

use crate::types::bucket::{Bucket, BucketOrder};
use crate::types::point::TimeSeriesPoint;
use log::debug;
use std::collections::HashMap;
use std::hash::Hash;

struct Accumulator<K> {
    key: K,
    sum: f64,
    count: usize,
}

/// Averages `measurement` per distinct `key_fn` value.
///
/// Points with a non-finite measurement are left out of their bucket's mean
/// without raising an error. A bucket that ends up with no contributing points
/// is dropped. With [`BucketOrder::FirstAppearance`] the result follows the
/// position at which each key first occurs in `points`, counting excluded
/// points too.
///
/// # Arguments
///
/// * `points` - Observations, in any order. May be empty.
/// * `key_fn` - Pure function of a point's timestamp, e.g. [`TimeSeriesPoint::hour_of_day`].
/// * `order` - Output ordering.
///
/// # Example
///
/// ```
/// use trendline::{bucket, BucketOrder, TimeSeriesPoint};
///
/// let points = vec![
///     TimeSeriesPoint::parse("2024-05-01 11:00:00", "Lahore", Some(21.0), Some(42.0))?,
///     TimeSeriesPoint::parse("2024-05-01 10:00:00", "Lahore", Some(20.0), Some(40.0))?,
///     TimeSeriesPoint::parse("2024-05-02 10:00:00", "Lahore", Some(19.0), Some(38.0))?,
/// ];
/// let hourly = bucket(&points, TimeSeriesPoint::hour_of_day, BucketOrder::Ascending);
/// assert_eq!(hourly[0].key, 10);
/// assert_eq!(hourly[0].mean_measurement, 19.5);
/// assert_eq!(hourly[1].key, 11);
/// # Ok::<(), trendline::SeriesError>(())
/// ```
pub fn bucket<K, F>(points: &[TimeSeriesPoint], key_fn: F, order: BucketOrder) -> Vec<Bucket<K>>
where
    K: Eq + Hash + Ord + Clone,
    F: Fn(&TimeSeriesPoint) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut accumulators: Vec<Accumulator<K>> = Vec::new();
    let mut excluded = 0usize;

    for point in points {
        let key = key_fn(point);
        let slot = *slots.entry(key.clone()).or_insert_with(|| {
            accumulators.push(Accumulator {
                key,
                sum: 0.0,
                count: 0,
            });
            accumulators.len() - 1
        });

        if point.measurement.is_finite() {
            let acc = &mut accumulators[slot];
            acc.sum += point.measurement;
            acc.count += 1;
        } else {
            excluded += 1;
        }
    }

    if excluded > 0 {
        debug!(
            "Excluded {} non-finite measurement(s) out of {} points while bucketing",
            excluded,
            points.len()
        );
    }

    let mut buckets: Vec<Bucket<K>> = accumulators
        .into_iter()
        .filter(|acc| acc.count > 0)
        .map(|acc| Bucket {
            key: acc.key,
            mean_measurement: acc.sum / acc.count as f64,
            count: acc.count,
        })
        .collect();

    if order == BucketOrder::Ascending {
        buckets.sort_by(|a, b| a.key.cmp(&b.key));
    }
    buckets
}

/// Mean measurement per hour of day, sorted by hour.
pub fn hourly_means(points: &[TimeSeriesPoint]) -> Vec<Bucket<u32>> {
    bucket(points, TimeSeriesPoint::hour_of_day, BucketOrder::Ascending)
}

/// Mean measurement per month name, in order of first appearance.
pub fn monthly_means(points: &[TimeSeriesPoint]) -> Vec<Bucket<&'static str>> {
    bucket(points, TimeSeriesPoint::month_name, BucketOrder::FirstAppearance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(month: u32, day: u32, hour: u32, measurement: f64) -> TimeSeriesPoint {
        let ts = Utc.with_ymd_and_hms(2024, month, day, hour, 0, 0).unwrap();
        TimeSeriesPoint::new(ts, "Karachi", measurement, 50.0)
    }

    #[test]
    fn test_empty_input_yields_no_buckets() {
        let buckets = hourly_means(&[]);
        assert!(buckets.is_empty());
    }

    #[test]
    fn test_hourly_scenario() {
        let points = vec![at(5, 1, 10, 20.0), at(5, 1, 11, 21.0), at(5, 2, 10, 19.0)];
        let buckets = bucket(&points, TimeSeriesPoint::hour_of_day, BucketOrder::FirstAppearance);

        assert_eq!(
            buckets,
            vec![
                Bucket { key: 10, mean_measurement: 19.5, count: 2 },
                Bucket { key: 11, mean_measurement: 21.0, count: 1 },
            ]
        );
    }

    #[test]
    fn test_first_appearance_is_not_numeric_order() {
        let points = vec![at(5, 1, 21, 1.0), at(5, 1, 3, 2.0), at(5, 1, 12, 3.0)];

        let first_seen = bucket(&points, TimeSeriesPoint::hour_of_day, BucketOrder::FirstAppearance);
        let keys: Vec<u32> = first_seen.iter().map(|b| b.key).collect();
        assert_eq!(keys, vec![21, 3, 12]);

        let ascending = hourly_means(&points);
        let keys: Vec<u32> = ascending.iter().map(|b| b.key).collect();
        assert_eq!(keys, vec![3, 12, 21]);
    }

    #[test]
    fn test_non_finite_measurements_are_excluded() {
        let points = vec![
            at(5, 1, 10, 20.0),
            at(5, 1, 10, f64::NAN),
            at(5, 1, 11, f64::INFINITY),
            at(5, 1, 12, 30.0),
        ];
        let buckets = hourly_means(&points);

        // Hour 11 only had a non-finite reading and is dropped entirely.
        assert_eq!(
            buckets,
            vec![
                Bucket { key: 10, mean_measurement: 20.0, count: 1 },
                Bucket { key: 12, mean_measurement: 30.0, count: 1 },
            ]
        );
        let total: usize = buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, points.len() - 2);
    }

    #[test]
    fn test_counts_cover_all_finite_points() {
        let points: Vec<TimeSeriesPoint> = (0..48)
            .map(|i| at(5, 1 + i / 24, i % 24, i as f64))
            .collect();
        let buckets = hourly_means(&points);
        assert_eq!(buckets.len(), 24);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 48);
        // Hour 0 holds readings 0 and 24.
        assert_eq!(buckets[0].mean_measurement, 12.0);
    }

    #[test]
    fn test_monthly_means_keeps_calendar_sequence() {
        let points = vec![
            at(11, 30, 12, 10.0),
            at(12, 1, 12, 4.0),
            at(12, 2, 12, 6.0),
            at(11, 29, 12, 14.0),
        ];
        let buckets = monthly_means(&points);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].key, "November");
        assert_eq!(buckets[0].mean_measurement, 12.0);
        assert_eq!(buckets[1].key, "December");
        assert_eq!(buckets[1].mean_measurement, 5.0);
    }
}
