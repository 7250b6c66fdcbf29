use std::fmt;
use thiserror::Error;

/// Failures raised by the trend pipeline itself (bucketing, normalization, prediction).
///
/// Every variant is cheap to clone so that report snapshots can keep a failed
/// prediction around and let the rendering layer decide how to present it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SeriesError {
    #[error("Malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("Baseline measurement for group '{group}' is zero")]
    DivisionByZero { group: String },

    #[error("Feature matrix is rank-deficient, no unique prediction exists")]
    SingularMatrix,

    #[error("Insufficient data: need at least {required} points, found {found}")]
    InsufficientData { required: usize, found: usize },
}

impl SeriesError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        SeriesError::MalformedInput {
            reason: reason.into(),
        }
    }

    /// Prefixes a `MalformedInput` reason with where the input came from.
    pub(crate) fn with_context(self, context: impl fmt::Display) -> Self {
        match self {
            SeriesError::MalformedInput { reason } => {
                SeriesError::malformed(format!("{context}: {reason}"))
            }
            other => other,
        }
    }
}
