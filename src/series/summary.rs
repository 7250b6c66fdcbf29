use crate::series::group_points;
use crate::types::point::TimeSeriesPoint;

/// Min, max and mean of one group's measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub group: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub count: usize,
}

/// Per-group summary statistics, in order of first appearance.
///
/// Non-finite measurements are skipped; a group without a single finite
/// measurement does not appear in the output.
pub fn summarize(points: &[TimeSeriesPoint]) -> Vec<GroupSummary> {
    group_points(points)
        .into_iter()
        .filter_map(|(group, members)| {
            let finite: Vec<f64> = members
                .iter()
                .map(|p| p.measurement)
                .filter(|m| m.is_finite())
                .collect();
            if finite.is_empty() {
                return None;
            }
            let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
            let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = finite.iter().sum::<f64>() / finite.len() as f64;
            Some(GroupSummary {
                group: group.to_string(),
                min,
                max,
                mean,
                count: finite.len(),
            })
        })
        .collect()
}
