//! Interfaces to the collaborators the matching core depends on.
//!
//! Fetching, decoding and rendering documents, and any semantic "find this
//! quote" service, live outside this crate. The scanner only needs the small
//! async surface defined here, so decoders and HTTP clients can be swapped
//! without touching the matching logic.

use async_trait::async_trait;
use canonical::RawFragment;
use serde::{Deserialize, Serialize};

use crate::types::{ExternalMatchError, LoadError, PageDecodeError};

/// Opens documents and extracts per-page text fragments.
///
/// `open` and `fragments` are the points where a lookup suspends; no lock in
/// the matching core is held across them.
#[async_trait]
pub trait DocumentLoader: Send + Sync + 'static {
    /// Opened document. Shared between the cache and in-flight scans.
    type Handle: Send + Sync + 'static;
    /// Opaque per-fragment geometry, passed through to the renderer.
    type Geometry: Send + Sync;

    /// Opens the document named by `identifier`, using `location_hint` to
    /// find it when the identifier alone is not enough.
    async fn open(
        &self,
        identifier: &str,
        location_hint: Option<&str>,
    ) -> Result<Self::Handle, LoadError>;

    /// Number of pages in the opened document.
    fn page_count(&self, handle: &Self::Handle) -> u32;

    /// Text fragments of the 1-based `page_number`, in extraction order.
    async fn fragments(
        &self,
        handle: &Self::Handle,
        page_number: u32,
    ) -> Result<Vec<RawFragment<Self::Geometry>>, PageDecodeError>;
}

/// Answer from an external semantic matcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalMatch {
    /// 1-based page the matcher believes holds the quote.
    pub page: u32,
    /// Short candidate substrings to mark on that page.
    #[serde(default)]
    pub anchors: Vec<String>,
    /// Matcher-reported confidence in `0.0..=1.0`.
    #[serde(default)]
    pub confidence: f32,
    /// Free-form explanation from the matcher.
    #[serde(default)]
    pub reason: String,
}

impl ExternalMatch {
    /// Parses a matcher response body.
    pub fn from_json(body: &str) -> Result<Self, ExternalMatchError> {
        let parsed: ExternalMatch = serde_json::from_str(body)
            .map_err(|err| ExternalMatchError::Malformed(err.to_string()))?;
        if parsed.page == 0 {
            return Err(ExternalMatchError::Malformed(
                "page numbers start at 1".into(),
            ));
        }
        Ok(parsed)
    }
}

/// Optional external service that picks the page and anchor tokens for a
/// quote instead of a local scan.
#[async_trait]
pub trait ExternalMatcher: Send + Sync {
    async fn find_quote(
        &self,
        document: &str,
        location_hint: Option<&str>,
        quote: &str,
    ) -> Result<ExternalMatch, ExternalMatchError>;
}
