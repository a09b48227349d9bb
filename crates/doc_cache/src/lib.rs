//! # Quotelight document cache (`doc_cache`)
//!
//! Opening a document (fetching, parsing its cross-reference tables, and so
//! on) is the expensive step of every lookup, and operators tend to click
//! back and forth between a handful of records. [`DocumentCache`] keeps the
//! most recently acquired handles resident, keyed by a caller-supplied stable
//! identifier rather than the fetch URL.
//!
//! ## Policy
//!
//! - Hit: refresh recency, return the resident handle, never evict.
//! - Miss: run the opener; on success insert as most recent, then evict the
//!   least recently acquired entries until within [`CacheConfig::capacity`].
//! - Opener failure: propagate, cache nothing.
//!
//! ## Example
//!
//! ```rust
//! use std::convert::Infallible;
//! use doc_cache::{CacheConfig, DocumentCache};
//!
//! # tokio_test_block(async {
//! let cache: DocumentCache<String, Vec<u8>> =
//!     DocumentCache::new(&CacheConfig::default()).unwrap();
//! let handle = cache
//!     .acquire("order-17".to_string(), || async { Ok::<_, Infallible>(vec![1, 2, 3]) })
//!     .await
//!     .unwrap();
//! assert_eq!(handle.len(), 3);
//! assert_eq!(cache.len(), 1);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod cache;
mod config;
mod error;

pub use crate::cache::{CacheEntry, CacheStats, DocumentCache};
pub use crate::config::{CacheConfig, DEFAULT_CAPACITY};
pub use crate::error::CacheConfigError;
