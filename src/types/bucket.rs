/// Mean of all finite measurements that share one calendar-derived key.
///
/// `count` is always at least 1; buckets without contributing points are
/// never produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<K> {
    pub key: K,
    pub mean_measurement: f64,
    pub count: usize,
}

/// Order in which [`crate::bucket`] returns its buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BucketOrder {
    /// Order in which each key first shows up in the input.
    #[default]
    FirstAppearance,
    /// Sorted by key. Hours need this to plot left to right.
    Ascending,
}
