//! The trend pipeline: pure, synchronous functions over slices of
//! [`TimeSeriesPoint`]. Nothing here keeps state between calls.

pub mod bucketer;
pub mod error;
pub mod filter;
pub mod normalizer;
pub mod predictor;
pub mod summary;

use crate::types::point::TimeSeriesPoint;
use std::collections::HashMap;

/// Partitions `points` by group, keeping groups in first-appearance order and
/// each group's points in input order.
pub(crate) fn group_points(points: &[TimeSeriesPoint]) -> Vec<(&str, Vec<&TimeSeriesPoint>)> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&TimeSeriesPoint>)> = Vec::new();
    for point in points {
        let slot = *slots.entry(point.group.as_str()).or_insert_with(|| {
            groups.push((point.group.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(point);
    }
    groups
}
