use doc_cache::CacheConfigError;
use matcher::{LoadError, ScanConfigError};
use thiserror::Error;

/// Errors surfaced by [`QuoteViewer`](crate::QuoteViewer).
///
/// Only failures that end a selection are errors. A quote that cannot be
/// located, a missing quote and a superseded selection are reported as
/// [`SelectionOutcome`](crate::SelectionOutcome) values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewerError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("invalid viewer configuration: {0}")]
    Config(String),
}

impl From<ScanConfigError> for ViewerError {
    fn from(value: ScanConfigError) -> Self {
        ViewerError::Config(value.to_string())
    }
}

impl From<CacheConfigError> for ViewerError {
    fn from(value: CacheConfigError) -> Self {
        ViewerError::Config(value.to_string())
    }
}
