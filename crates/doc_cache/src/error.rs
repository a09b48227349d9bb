use thiserror::Error;

/// Errors raised while building a [`DocumentCache`](crate::DocumentCache).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheConfigError {
    #[error("cache capacity must be >= 1")]
    ZeroCapacity,
}
