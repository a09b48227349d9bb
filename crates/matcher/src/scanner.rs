use std::sync::Arc;
use std::time::Instant;

use canonical::build_index_with;
use tracing::{debug, info, warn, Instrument};

use crate::generation::Ticket;
use crate::loader::DocumentLoader;
use crate::locate::{locate, mark_anchors, AnchorSet, Needle};
use crate::metrics::metrics_recorder;
use crate::types::{
    LocateStrategy, MatchResult, PageDecodeError, PageMatch, ScanConfig, ScanConfigError,
    ScanReport, StrategyKind,
};


/// Drives a [`DocumentLoader`] page by page and runs the locator on each page.
///
/// The scanner never holds a lock across a loader call. Staleness is checked
/// through the caller's [`Ticket`] before each page is decoded, so a superseded
/// lookup stops at the next page boundary.
pub struct PageScanner<L: DocumentLoader> {
    loader: Arc<L>,
    config: ScanConfig,
}

impl<L: DocumentLoader> PageScanner<L> {
    /// Builds a scanner after validating `config`.
    pub fn new(loader: Arc<L>, config: ScanConfig) -> Result<Self, ScanConfigError> {
        config.validate()?;
        Ok(Self { loader, config })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn loader(&self) -> &Arc<L> {
        &self.loader
    }

    /// Runs whichever strategy `strategy` names.
    pub async fn run(
        &self,
        handle: &L::Handle,
        strategy: &LocateStrategy,
        ticket: &Ticket,
    ) -> ScanReport {
        match strategy {
            LocateStrategy::Phrase { quote } => self.scan(handle, quote, ticket).await,
            LocateStrategy::Anchors { page, anchors } => {
                self.mark_page(handle, *page, anchors, ticket).await
            }
        }
    }

    /// Phrase scan bounded by the configured page limit.
    pub async fn scan(&self, handle: &L::Handle, quote: &str, ticket: &Ticket) -> ScanReport {
        self.scan_with_limit(handle, quote, self.config.page_limit, ticket)
            .await
    }

    /// Phrase scan over pages `1..=min(page_count, page_limit)`.
    ///
    /// Pages are decoded in ascending order and the first page containing the
    /// normalized quote wins. Pages that fail to decode are skipped. A blank
    /// quote decodes nothing and reports `NotFound`.
    pub async fn scan_with_limit(
        &self,
        handle: &L::Handle,
        quote: &str,
        page_limit: u32,
        ticket: &Ticket,
    ) -> ScanReport {
        let start = Instant::now();
        let page_count = self.loader.page_count(handle);
        let last_page = page_count.min(page_limit);
        let span = tracing::info_span!(
            "matcher.scan",
            generation = ticket.id(),
            page_count,
            page_limit
        );

        let report = async {
            let mut report = ScanReport::new(StrategyKind::Phrase, page_limit);
            let Some(needle) = Needle::phrase_with(quote, &self.config.normalize) else {
                debug!("blank_quote");
                return report;
            };

            for page_number in 1..=last_page {
                if !ticket.is_current() {
                    report.superseded = true;
                    debug!(page_number, "scan_superseded");
                    break;
                }
                let fragments = match self.loader.fragments(handle, page_number).await {
                    Ok(fragments) => fragments,
                    Err(err) => {
                        skip_page(&mut report, page_number, &err);
                        continue;
                    }
                };
                report.pages_decoded += 1;

                let index = build_index_with(&fragments, &self.config.normalize);
                if let Some(fragment_ids) = locate(&needle, &index) {
                    report.result = MatchResult::Found(PageMatch {
                        page_number,
                        fragment_ids,
                    });
                    break;
                }
            }
            report
        }
        .instrument(span)
        .await;

        self.finish(start, report)
    }

    /// Anchor strategy on the single page an external matcher picked.
    ///
    /// An out-of-range page, a decode failure, or no marked fragment all
    /// report `NotFound`.
    pub async fn mark_page(
        &self,
        handle: &L::Handle,
        page_number: u32,
        anchors: &[String],
        ticket: &Ticket,
    ) -> ScanReport {
        let start = Instant::now();
        let page_count = self.loader.page_count(handle);
        let span = tracing::info_span!(
            "matcher.mark_page",
            generation = ticket.id(),
            page_number,
            anchor_count = anchors.len()
        );

        let report = async {
            let mut report = ScanReport::new(StrategyKind::Anchors, self.config.page_limit);
            if page_number == 0 || page_number > page_count {
                warn!(page_count, "anchor_page_out_of_range");
                return report;
            }
            if !ticket.is_current() {
                report.superseded = true;
                return report;
            }
            let set = AnchorSet::with_config(anchors, &self.config.normalize);
            if set.is_empty() {
                debug!("no_usable_anchors");
                return report;
            }

            let fragments = match self.loader.fragments(handle, page_number).await {
                Ok(fragments) => fragments,
                Err(err) => {
                    skip_page(&mut report, page_number, &err);
                    return report;
                }
            };
            report.pages_decoded = 1;

            let fragment_ids = mark_anchors(&set, &fragments);
            if !fragment_ids.is_empty() {
                report.result = MatchResult::Found(PageMatch {
                    page_number,
                    fragment_ids,
                });
            }
            report
        }
        .instrument(span)
        .await;

        self.finish(start, report)
    }

    fn finish(&self, start: Instant, report: ScanReport) -> ScanReport {
        let latency = start.elapsed();
        let elapsed_micros = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        match report.result.page_match() {
            Some(found) => info!(
                strategy = ?report.strategy,
                page_number = found.page_number,
                fragment_count = found.fragment_ids.len(),
                pages_decoded = report.pages_decoded,
                failed_pages = report.failed_pages.len(),
                elapsed_micros,
                "scan_success"
            ),
            None => info!(
                strategy = ?report.strategy,
                pages_decoded = report.pages_decoded,
                failed_pages = report.failed_pages.len(),
                superseded = report.superseded,
                elapsed_micros,
                "scan_not_found"
            ),
        }
        if let Some(recorder) = metrics_recorder() {
            recorder.record_scan(
                report.strategy,
                latency,
                report.pages_decoded,
                report.failed_pages.len(),
                report.is_found(),
                report.superseded,
            );
        }
        report
    }
}

fn skip_page(report: &mut ScanReport, page_number: u32, err: &PageDecodeError) {
    warn!(page_number, error = %err, "page_decode_failure");
    report.failed_pages.push(page_number);
    if let Some(recorder) = metrics_recorder() {
        recorder.record_page_failure(report.strategy, err);
    }
}
