//! Workspace umbrella crate for Quotelight.
//!
//! Quotelight opens the document attached to a stored record and highlights
//! the record's quote in place, tolerating the typographic and whitespace
//! differences document extraction introduces. This crate wires the stage
//! crates together behind one selection controller:
//!
//! - `canonical`: normalization profiles and the per-page fragment index.
//! - `matcher`: quote locator, page scanner, loader and matcher interfaces.
//! - `doc_cache`: bounded least-recently-acquired cache of opened documents.
//!
//! [`QuoteViewer`] is the entry point. It takes one [`RecordRef`] per user
//! selection, reuses opened documents through the cache, and commits a
//! [`DisplayState`] only while the selection is still the latest one.
//!
//! ```
//! use std::sync::Arc;
//! use quotelight::{
//!     MemoryDocument, MemoryLoader, QuoteViewer, RecordRef, SelectionOutcome, ViewerConfig,
//! };
//!
//! let loader = Arc::new(MemoryLoader::new().with_document(
//!     MemoryDocument::new("po-1138")
//!         .page(["Purchase order"])
//!         .page(["Delivery \u{2013} within", "14 days of \u{201C}acceptance\u{201D}"]),
//! ));
//! let viewer = QuoteViewer::new(loader, &ViewerConfig::default()).expect("valid config");
//! let record = RecordRef::new("po-1138").with_quote("delivery - within 14 days");
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let outcome = rt.block_on(viewer.select(&record)).expect("document opens");
//!
//! let SelectionOutcome::Applied(state) = outcome else { panic!("superseded") };
//! assert_eq!(state.page, 2);
//! assert!(state.is_highlighted());
//! ```

pub mod config;
pub mod error;
pub mod record;
pub mod viewer;

pub use matcher::location;

pub use canonical::{
    FragmentIds, NormalizeConfig, NormalizeProfile, PageIndex, RawFragment, build_index,
    build_index_with, normalize, normalize_with,
};
pub use doc_cache::{CacheConfig, CacheStats, DocumentCache};
pub use matcher::{
    AnchorSet, DocumentLoader, ExternalMatch, ExternalMatchError, ExternalMatcher, Generations,
    LoadError, LocateStrategy, MatchResult, MemoryDocument, MemoryLoader, Needle,
    PageDecodeError, PageMatch, PageScanner, ScanConfig, ScanMetrics, ScanReport, StrategyKind,
    Ticket, candidate_locations, is_http_location, locate, locate_quote, looks_like_pdf,
    mark_anchors, set_scan_metrics,
};

pub use crate::config::{
    CACHE_CAPACITY_ENV, CacheYamlConfig, ConfigLoadError, MatcherYamlConfig,
    NormalizeYamlConfig, PAGE_LIMIT_ENV, ScanYamlConfig, ViewerConfig,
};
pub use crate::error::ViewerError;
pub use crate::record::{DocumentKey, RecordRef};
pub use crate::viewer::{DisplayState, DisplayStatus, QuoteViewer, SelectionOutcome};
