use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPoint {
    pub timestamp: DateTime<Utc>,
    pub measurement: f64,
    pub normalized_value: f64,
}

/// One group rescaled so that its first (baseline) point reads exactly 100.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    pub group: String,
    pub points: Vec<NormalizedPoint>,
}

impl NormalizedSeries {
    pub fn baseline(&self) -> Option<f64> {
        self.points.first().map(|p| p.measurement)
    }

    /// Last normalized value, i.e. the relative performance over the whole window.
    pub fn latest(&self) -> Option<f64> {
        self.points.last().map(|p| p.normalized_value)
    }
}
