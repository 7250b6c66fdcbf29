use crate::series::error::SeriesError;
use crate::sources::error::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrendlineError {
    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error(transparent)]
    Source(#[from] SourceError),
}
