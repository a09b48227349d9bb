//! # Quote Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` sits on top of `canonical` and finds the page and the fragments
//! of a multi-page document that contain a stored quote. Text is compared only
//! after both sides pass through the same normalization, so typographic
//! differences and line breaks introduced by document extraction do not
//! prevent a match.
//!
//! Fetching and decoding documents stays outside this crate, behind the
//! [`DocumentLoader`] trait. An optional [`ExternalMatcher`] can pick the
//! page and anchor tokens instead of a local scan.
//!
//! ## Core Types
//!
//! - [`LocateStrategy`]: `Phrase` scans pages for the normalized quote;
//!   `Anchors` marks fragments on one page that contain any anchor token.
//! - [`ScanConfig`]: page limit for phrase scans and the normalization config.
//! - [`PageScanner`]: drives a loader page by page and runs the locator.
//! - [`MatchResult`] / [`PageMatch`]: 1-based page number plus fragment ids.
//! - [`ScanReport`]: result plus pages decoded, pages skipped and whether a
//!   newer selection superseded the scan.
//! - [`Generations`] / [`Ticket`]: tag each selection so stale results can be
//!   recognized.
//! - [`MemoryLoader`]: in-memory loader for tests and demos.
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use matcher::{
//!     DocumentLoader, MemoryDocument, MemoryLoader, PageScanner, ScanConfig, Ticket,
//! };
//!
//! let loader = Arc::new(
//!     MemoryLoader::new().with_document(
//!         MemoryDocument::new("contract-7")
//!             .page(["Preamble"])
//!             .page(["Payment is due ", "within thirty days."]),
//!     ),
//! );
//! let scanner = PageScanner::new(Arc::clone(&loader), ScanConfig::default())
//!     .expect("valid config");
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let report = rt.block_on(async {
//!     let doc = loader.open("contract-7", None).await.expect("open");
//!     scanner.scan(&doc, "due within thirty", &Ticket::detached()).await
//! });
//!
//! let found = report.result.page_match().expect("quote located");
//! assert_eq!(found.page_number, 2);
//! assert_eq!(found.fragment_ids.iter().copied().collect::<Vec<_>>(), vec![0, 1]);
//! ```
//!
//! ## Metrics
//!
//! Install a [`ScanMetrics`] implementation with [`set_scan_metrics`] to
//! observe the latency and outcome of every lookup.

pub mod generation;
pub mod loader;
pub mod locate;
pub mod location;
pub mod memory;
pub mod metrics;
pub mod scanner;
pub mod types;

pub use crate::generation::{Generations, Ticket};
pub use crate::loader::{DocumentLoader, ExternalMatch, ExternalMatcher};
pub use crate::locate::{locate, locate_quote, mark_anchors, AnchorSet, Needle};
pub use crate::location::{candidate_locations, is_http_location, looks_like_pdf};
pub use crate::memory::{MemoryDocument, MemoryLoader, MemoryPage, PageRequest};
pub use crate::metrics::{set_scan_metrics, ScanMetrics};
pub use crate::scanner::PageScanner;
pub use crate::types::{
    ExternalMatchError, LoadError, LocateStrategy, MatchResult, PageDecodeError, PageMatch,
    ScanConfig, ScanConfigError, ScanReport, StrategyKind, DEFAULT_PAGE_LIMIT,
};
