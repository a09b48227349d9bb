//! Overlapping selections and shared-cache behaviour.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quotelight::{
    DocumentLoader, LoadError, MemoryDocument, MemoryLoader, PageDecodeError, QuoteViewer,
    RawFragment, RecordRef, SelectionOutcome, ViewerConfig,
};
use tokio::sync::Notify;

/// Holds calls for one document until the test releases them.
struct GatedLoader {
    inner: MemoryLoader,
    gated_document: String,
    gated_page: Option<u32>,
    entered: Notify,
    release: Notify,
}

impl GatedLoader {
    fn new(inner: MemoryLoader, gated_document: &str, gated_page: Option<u32>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            gated_document: gated_document.to_string(),
            gated_page,
            entered: Notify::new(),
            release: Notify::new(),
        })
    }

    async fn hold(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

#[async_trait]
impl DocumentLoader for GatedLoader {
    type Handle = Arc<MemoryDocument>;
    type Geometry = ();

    async fn open(
        &self,
        identifier: &str,
        location_hint: Option<&str>,
    ) -> Result<Self::Handle, LoadError> {
        if identifier == self.gated_document && self.gated_page.is_none() {
            self.hold().await;
        }
        self.inner.open(identifier, location_hint).await
    }

    fn page_count(&self, handle: &Self::Handle) -> u32 {
        self.inner.page_count(handle)
    }

    async fn fragments(
        &self,
        handle: &Self::Handle,
        page_number: u32,
    ) -> Result<Vec<RawFragment>, PageDecodeError> {
        if handle.id() == self.gated_document && self.gated_page == Some(page_number) {
            self.hold().await;
        }
        self.inner.fragments(handle, page_number).await
    }
}

fn two_documents() -> MemoryLoader {
    MemoryLoader::new()
        .with_document(
            MemoryDocument::new("slow")
                .page(["cover"])
                .page(["still scanning"])
                .page(["the slow quote"]),
        )
        .with_document(MemoryDocument::new("fast").page(["the fast quote"]))
}

#[tokio::test]
async fn later_selection_wins_while_earlier_is_opening() {
    let loader = GatedLoader::new(two_documents(), "slow", None);
    let viewer =
        QuoteViewer::new(Arc::clone(&loader), &ViewerConfig::default()).expect("valid config");
    let record_a = RecordRef::new("slow").with_quote("slow quote");
    let record_b = RecordRef::new("fast").with_quote("fast quote");

    let (outcome_a, outcome_b) = tokio::join!(viewer.select(&record_a), async {
        loader.entered.notified().await;
        let outcome = viewer.select(&record_b).await;
        loader.release.notify_one();
        outcome
    });

    let outcome_a = outcome_a.expect("slow document opens");
    let outcome_b = outcome_b.expect("fast document opens");
    assert!(matches!(outcome_a, SelectionOutcome::Superseded { .. }));
    let state_b = outcome_b.applied().expect("latest selection applies").clone();
    assert_eq!(state_b.document.as_str(), "fast");
    assert_eq!(viewer.display(), Some(state_b));
}

#[tokio::test]
async fn later_selection_stops_earlier_scan_midway() {
    let loader = GatedLoader::new(two_documents(), "slow", Some(2));
    let viewer =
        QuoteViewer::new(Arc::clone(&loader), &ViewerConfig::default()).expect("valid config");
    let record_a = RecordRef::new("slow").with_quote("slow quote");
    let record_b = RecordRef::new("fast").with_quote("fast quote");

    let (outcome_a, outcome_b) = tokio::join!(viewer.select(&record_a), async {
        loader.entered.notified().await;
        let outcome = viewer.select(&record_b).await;
        loader.release.notify_one();
        outcome
    });

    assert!(matches!(
        outcome_a.expect("opens"),
        SelectionOutcome::Superseded { .. }
    ));
    assert!(outcome_b.expect("opens").applied().is_some());
    assert_eq!(loader.inner.requested_pages("slow"), vec![1, 2]);
    let shown = viewer.display().expect("display state");
    assert_eq!(shown.document.as_str(), "fast");
    assert!(shown.is_highlighted());
}

#[tokio::test]
async fn stale_open_failure_is_reported_as_superseded() {
    let inner = MemoryLoader::new().with_document(MemoryDocument::new("fast").page(["the fast quote"]));
    let loader = GatedLoader::new(inner, "slow", None);
    let viewer =
        QuoteViewer::new(Arc::clone(&loader), &ViewerConfig::default()).expect("valid config");
    let missing = RecordRef::new("slow").with_quote("never opens");
    let record_b = RecordRef::new("fast").with_quote("fast quote");

    let (outcome_a, outcome_b) = tokio::join!(viewer.select(&missing), async {
        loader.entered.notified().await;
        let outcome = viewer.select(&record_b).await;
        loader.release.notify_one();
        outcome
    });

    assert!(matches!(outcome_a, Ok(SelectionOutcome::Superseded { .. })));
    assert!(outcome_b.expect("opens").applied().is_some());
    assert_eq!(
        viewer.display().map(|state| state.document.to_string()),
        Some("fast".to_string())
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_selections_of_one_document_share_a_handle() {
    let loader = Arc::new(MemoryLoader::new().with_document(
        MemoryDocument::new("shared").page(["alpha"]).page(["beta"]),
    ));
    let viewer = Arc::new(
        QuoteViewer::new(Arc::clone(&loader), &ViewerConfig::default()).expect("valid config"),
    );

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let viewer = Arc::clone(&viewer);
            tokio::spawn(async move {
                let quote = if i % 2 == 0 { "alpha" } else { "beta" };
                viewer
                    .select(&RecordRef::new("shared").with_quote(quote))
                    .await
            })
        })
        .collect();

    let mut applied = 0;
    for task in tasks {
        match task.await.expect("task completes").expect("document opens") {
            SelectionOutcome::Applied(_) => applied += 1,
            SelectionOutcome::Superseded { .. } => {}
        }
    }

    assert_eq!(viewer.cache().len(), 1);
    assert!(applied >= 1);
    let latest = viewer.generations().latest();
    if let Some(state) = viewer.display() {
        assert!(state.generation <= latest);
    }
    let stats = viewer.cache().stats();
    assert_eq!(stats.hits + stats.misses, 16);
}

#[tokio::test]
async fn evicted_document_stays_usable_by_holder() {
    let loader = Arc::new(
        (1..=3).fold(MemoryLoader::new(), |loader, i| {
            loader.with_document(MemoryDocument::new(format!("doc-{i}")).page([format!("p{i}")]))
        }),
    );
    let mut config = ViewerConfig::default();
    config.cache.capacity = 1;
    let viewer = QuoteViewer::new(Arc::clone(&loader), &config).expect("valid config");

    viewer
        .select(&RecordRef::new("doc-1").with_quote("p1"))
        .await
        .expect("opens");
    let held = viewer
        .cache()
        .get(&quotelight::DocumentKey::new("doc-1"))
        .expect("resident");

    viewer
        .select(&RecordRef::new("doc-2").with_quote("p2"))
        .await
        .expect("opens");
    assert!(!viewer.cache().contains(&quotelight::DocumentKey::new("doc-1")));

    let fragments = loader.fragments(&held, 1).await.expect("page decodes");
    assert_eq!(fragments[0].text, "p1");

    tokio::time::timeout(
        Duration::from_secs(1),
        viewer.select(&RecordRef::new("doc-3").with_quote("p3")),
    )
    .await
    .expect("select finishes")
    .expect("opens");
    assert_eq!(viewer.cache().len(), 1);
}
