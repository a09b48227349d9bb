use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::CacheConfigError;

/// Default number of opened documents kept resident.
pub const DEFAULT_CAPACITY: usize = 5;

/// Sizing for a [`DocumentCache`](crate::DocumentCache).
///
/// ```rust
/// use doc_cache::CacheConfig;
///
/// let cfg = CacheConfig::default();
/// assert_eq!(cfg.capacity, 5);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries held after any `acquire` returns.
    pub capacity: usize,
}

impl CacheConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Checks the configuration and returns the capacity as a non-zero value.
    pub fn validate(&self) -> Result<NonZeroUsize, CacheConfigError> {
        NonZeroUsize::new(self.capacity).ok_or(CacheConfigError::ZeroCapacity)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}
