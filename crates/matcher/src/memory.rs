//! In-memory [`DocumentLoader`] for tests, benches and demos.
//!
//! Documents are lists of pages, each page either a list of fragment texts or
//! a decode failure. Locations can be registered as serving a document or an
//! HTML preview; HTTP hints are tried with their download variants. The loader
//! records every open and every page request so tests can assert on how much
//! work a lookup did.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use canonical::RawFragment;
use tracing::debug;

use crate::loader::DocumentLoader;
use crate::location::{candidate_locations, is_http_location, looks_like_pdf};
use crate::types::{LoadError, PageDecodeError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryPage {
    Text(Vec<String>),
    Corrupt(String),
}

/// One in-memory document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryDocument {
    id: String,
    pages: Vec<MemoryPage>,
}

impl MemoryDocument {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pages: Vec::new(),
        }
    }

    /// Appends a page made of `fragments`.
    pub fn page<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pages
            .push(MemoryPage::Text(fragments.into_iter().map(Into::into).collect()));
        self
    }

    /// Appends a page whose decoding fails with `reason`.
    pub fn corrupt_page(mut self, reason: impl Into<String>) -> Self {
        self.pages.push(MemoryPage::Corrupt(reason.into()));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn page_count(&self) -> u32 {
        u32::try_from(self.pages.len()).unwrap_or(u32::MAX)
    }
}

/// A page request observed by [`MemoryLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub document: String,
    pub page_number: u32,
}

/// What a registered location answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Hosted {
    content_type: &'static str,
    body_prefix: &'static [u8],
    document: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryLoader {
    documents: HashMap<String, Arc<MemoryDocument>>,
    hosted: HashMap<String, Hosted>,
    opens: AtomicUsize,
    requests: Mutex<Vec<PageRequest>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, document: MemoryDocument) -> Self {
        self.insert(document);
        self
    }

    pub fn insert(&mut self, document: MemoryDocument) {
        self.documents
            .insert(document.id.clone(), Arc::new(document));
    }

    /// Makes `location` serve the document `id`, the way a fetch URL
    /// resolves to a stored file.
    pub fn with_location(mut self, location: impl Into<String>, id: impl Into<String>) -> Self {
        self.hosted.insert(
            location.into(),
            Hosted {
                content_type: "application/pdf",
                body_prefix: b"%PDF-1.7",
                document: Some(id.into()),
            },
        );
        self
    }

    /// Makes `location` serve an HTML preview page instead of a document.
    pub fn with_preview(mut self, location: impl Into<String>) -> Self {
        self.hosted.insert(
            location.into(),
            Hosted {
                content_type: "text/html; charset=utf-8",
                body_prefix: b"<!DOCTYPE html>",
                document: None,
            },
        );
        self
    }

    /// Number of successful `open` calls so far.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Pages requested for `document`, in request order.
    pub fn requested_pages(&self, document: &str) -> Vec<u32> {
        self.lock_requests()
            .iter()
            .filter(|req| req.document == document)
            .map(|req| req.page_number)
            .collect()
    }

    pub fn clear_requests(&self) {
        self.lock_requests().clear();
    }

    /// First candidate of `location` that serves a document.
    fn fetch(&self, location: &str) -> Option<&Arc<MemoryDocument>> {
        let candidates = if is_http_location(location) {
            candidate_locations(location)
        } else {
            vec![location.to_string()]
        };
        candidates.iter().find_map(|candidate| {
            let hosted = self.hosted.get(candidate)?;
            if !looks_like_pdf(Some(hosted.content_type), hosted.body_prefix) {
                debug!(location = %candidate, "preview_page_skipped");
                return None;
            }
            hosted.document.as_deref().and_then(|id| self.documents.get(id))
        })
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<PageRequest>> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DocumentLoader for MemoryLoader {
    type Handle = Arc<MemoryDocument>;
    type Geometry = ();

    async fn open(
        &self,
        identifier: &str,
        location_hint: Option<&str>,
    ) -> Result<Self::Handle, LoadError> {
        let found = self
            .documents
            .get(identifier)
            .or_else(|| self.fetch(identifier))
            .or_else(|| location_hint.and_then(|hint| self.fetch(hint)));
        match found {
            Some(document) => {
                self.opens.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::clone(document))
            }
            None => Err(LoadError::Open {
                document: identifier.to_string(),
                reason: "no such document".into(),
            }),
        }
    }

    fn page_count(&self, handle: &Self::Handle) -> u32 {
        handle.page_count()
    }

    async fn fragments(
        &self,
        handle: &Self::Handle,
        page_number: u32,
    ) -> Result<Vec<RawFragment>, PageDecodeError> {
        self.lock_requests().push(PageRequest {
            document: handle.id.clone(),
            page_number,
        });

        let page = page_number
            .checked_sub(1)
            .and_then(|idx| handle.pages.get(idx as usize))
            .ok_or_else(|| PageDecodeError::new(page_number, "page out of range"))?;

        match page {
            MemoryPage::Text(fragments) => Ok(fragments
                .iter()
                .map(|text| RawFragment::text_only(text.clone()))
                .collect()),
            MemoryPage::Corrupt(reason) => Err(PageDecodeError::new(page_number, reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader() -> MemoryLoader {
        MemoryLoader::new()
            .with_document(
                MemoryDocument::new("doc-1")
                    .page(["first page"])
                    .corrupt_page("bad xref"),
            )
            .with_location("https://files.example/doc-1.pdf", "doc-1")
    }

    #[tokio::test]
    async fn opens_by_identifier_or_location() {
        let loader = loader();
        let by_id = loader.open("doc-1", None).await.expect("by id");
        let by_hint = loader
            .open("unknown", Some("https://files.example/doc-1.pdf"))
            .await
            .expect("by hint");
        assert_eq!(by_id.id(), by_hint.id());
        assert_eq!(loader.open_count(), 2);
        assert!(loader.open("missing", None).await.is_err());
    }

    #[tokio::test]
    async fn preview_links_fall_through_to_download_variants() {
        let loader = MemoryLoader::new()
            .with_document(MemoryDocument::new("doc-2").page(["shared"]))
            .with_preview("https://drive.example/s/abc")
            .with_preview("https://drive.example/s/abc?download=1")
            .with_location("https://drive.example/s/abc?raw=1", "doc-2");

        let doc = loader
            .open("record-9", Some("https://drive.example/s/abc"))
            .await
            .expect("raw variant serves the file");
        assert_eq!(doc.id(), "doc-2");

        let preview_only = MemoryLoader::new().with_preview("https://drive.example/s/xyz");
        assert!(preview_only
            .open("record-10", Some("https://drive.example/s/xyz"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn non_http_hints_are_not_varied() {
        let loader = MemoryLoader::new()
            .with_document(MemoryDocument::new("doc-3").page(["local"]))
            .with_location("store/doc-3?download=1", "doc-3");

        assert!(loader.open("x", Some("store/doc-3")).await.is_err());
        assert!(loader.open("x", Some("store/doc-3?download=1")).await.is_ok());
    }

    #[tokio::test]
    async fn pages_decode_or_fail_and_are_recorded() {
        let loader = loader();
        let doc = loader.open("doc-1", None).await.expect("open");
        assert_eq!(loader.page_count(&doc), 2);

        let first = loader.fragments(&doc, 1).await.expect("page 1");
        assert_eq!(first[0].text, "first page");

        let err = loader.fragments(&doc, 2).await.unwrap_err();
        assert_eq!(err.page, 2);
        assert_eq!(err.reason, "bad xref");

        assert!(loader.fragments(&doc, 0).await.is_err());
        assert!(loader.fragments(&doc, 3).await.is_err());
        assert_eq!(loader.requested_pages("doc-1"), vec![1, 2, 0, 3]);

        loader.clear_requests();
        assert!(loader.requested_pages("doc-1").is_empty());
    }
}
