use std::sync::{Arc, Mutex, MutexGuard};

use canonical::FragmentIds;
use doc_cache::DocumentCache;
use matcher::{
    DocumentLoader, ExternalMatch, ExternalMatcher, Generations, LoadError, LocateStrategy,
    PageScanner, ScanReport, StrategyKind, Ticket,
};
use serde::Serialize;
use tracing::{debug, info, warn, Instrument};

use crate::config::{MatcherYamlConfig, ViewerConfig};
use crate::error::ViewerError;
use crate::record::{DocumentKey, RecordRef};

/// Why the displayed page looks the way it does.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayStatus {
    /// The quote was located and `highlights` names its fragments.
    Highlighted { strategy: StrategyKind },
    /// Nothing matched within the range that was searched.
    NotFound {
        strategy: StrategyKind,
        page_limit: u32,
    },
    /// The record carries neither a quote nor match data.
    MissingQuote,
}

/// What the renderer should show for the current selection.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DisplayState {
    pub generation: u64,
    pub document: DocumentKey,
    /// 1-based page to render.
    pub page: u32,
    pub page_count: u32,
    /// Fragments of `page` to mark. Empty unless the status is `Highlighted`.
    pub highlights: FragmentIds,
    pub status: DisplayStatus,
}

impl DisplayState {
    pub fn is_highlighted(&self) -> bool {
        matches!(self.status, DisplayStatus::Highlighted { .. })
    }
}

/// Result of [`QuoteViewer::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The state was committed and is now displayed.
    Applied(DisplayState),
    /// A newer selection was made first; nothing was committed.
    Superseded { generation: u64 },
}

impl SelectionOutcome {
    pub fn applied(&self) -> Option<&DisplayState> {
        match self {
            SelectionOutcome::Applied(state) => Some(state),
            SelectionOutcome::Superseded { .. } => None,
        }
    }
}

enum Plan {
    Locate(LocateStrategy),
    /// Show `page` unhighlighted without decoding anything.
    Show { page: u32, status: DisplayStatus },
}

/// Selection controller: opens the record's document through the cache,
/// locates its quote and commits the display state.
///
/// Each [`select`](Self::select) takes a new generation ticket. A selection
/// whose ticket has been superseded by the time its lookup finishes returns
/// [`SelectionOutcome::Superseded`] and leaves the display untouched, so the
/// display always reflects the most recent selection.
pub struct QuoteViewer<L: DocumentLoader> {
    scanner: PageScanner<L>,
    cache: DocumentCache<DocumentKey, L::Handle>,
    external: Option<Arc<dyn ExternalMatcher>>,
    policy: MatcherYamlConfig,
    generations: Generations,
    display: Mutex<Option<DisplayState>>,
}

impl<L: DocumentLoader> QuoteViewer<L> {
    pub fn new(loader: Arc<L>, config: &ViewerConfig) -> Result<Self, ViewerError> {
        config
            .validate()
            .map_err(|err| ViewerError::Config(err.to_string()))?;
        Ok(Self {
            scanner: PageScanner::new(loader, config.scan_config())?,
            cache: DocumentCache::new(&config.cache_config())?,
            external: None,
            policy: config.matcher.clone(),
            generations: Generations::new(),
            display: Mutex::new(None),
        })
    }

    /// Installs an external matcher consulted before the local scan.
    pub fn with_external_matcher(mut self, matcher: Arc<dyn ExternalMatcher>) -> Self {
        self.external = Some(matcher);
        self
    }

    /// The committed display state, if any selection has been applied.
    pub fn display(&self) -> Option<DisplayState> {
        self.lock_display().clone()
    }

    pub fn cache(&self) -> &DocumentCache<DocumentKey, L::Handle> {
        &self.cache
    }

    pub fn generations(&self) -> &Generations {
        &self.generations
    }

    pub fn scanner(&self) -> &PageScanner<L> {
        &self.scanner
    }

    /// Selects `record`: opens its document, locates its quote and commits the
    /// resulting display state unless a newer selection arrived meanwhile.
    ///
    /// Only a document that cannot be opened is an error. A quote that is
    /// not found or not supplied is reported in [`DisplayState::status`].
    pub async fn select(&self, record: &RecordRef) -> Result<SelectionOutcome, ViewerError> {
        let ticket = self.generations.begin();
        let Some(key) = record.cache_key() else {
            tracing::info_span!("viewer.select", generation = ticket.id()).in_scope(|| {
                warn!("selection_missing_location");
                self.clear_display(&ticket);
            });
            return Err(ViewerError::Load(LoadError::MissingLocation));
        };
        let span = tracing::info_span!(
            "viewer.select",
            generation = ticket.id(),
            document = %key
        );
        self.select_inner(record, key, ticket).instrument(span).await
    }

    async fn select_inner(
        &self,
        record: &RecordRef,
        key: DocumentKey,
        ticket: Ticket,
    ) -> Result<SelectionOutcome, ViewerError> {
        let loader = self.scanner.loader();
        let hint = record.location();
        let opened = self
            .cache
            .acquire(key.clone(), || loader.open(key.as_str(), hint))
            .await;
        let handle = match opened {
            Ok(handle) => handle,
            Err(err) if !ticket.is_current() => {
                debug!(error = %err, "stale_open_failure");
                return Ok(self.superseded(&ticket));
            }
            Err(err) => {
                warn!(error = %err, "document_open_failure");
                self.clear_display(&ticket);
                return Err(err.into());
            }
        };

        if !ticket.is_current() {
            return Ok(self.superseded(&ticket));
        }

        let page_count = loader.page_count(&handle);
        let plan = self.plan(record, &key, page_count, &ticket).await;
        if !ticket.is_current() {
            return Ok(self.superseded(&ticket));
        }

        let state = match plan {
            Plan::Show { page, status } => DisplayState {
                generation: ticket.id(),
                document: key,
                page,
                page_count,
                highlights: FragmentIds::new(),
                status,
            },
            Plan::Locate(strategy) => {
                let report = self.scanner.run(&handle, &strategy, &ticket).await;
                if report.superseded {
                    return Ok(self.superseded(&ticket));
                }
                display_for(&ticket, key, page_count, &strategy, report)
            }
        };

        Ok(self.commit(&ticket, state))
    }

    /// Decides how to locate the quote for `record`.
    async fn plan(
        &self,
        record: &RecordRef,
        key: &DocumentKey,
        page_count: u32,
        ticket: &Ticket,
    ) -> Plan {
        let quote = record.quote();

        if let Some(precomputed) = &record.precomputed {
            if let Some(strategy) = anchors_within(precomputed, page_count) {
                debug!(page = precomputed.page, "using_precomputed_match");
                return Plan::Locate(strategy);
            }
            warn!(
                page = precomputed.page,
                page_count, "precomputed_page_out_of_range"
            );
            return self.fallback(quote, StrategyKind::Anchors);
        }

        let Some(quote) = quote else {
            return Plan::Show {
                page: 1,
                status: DisplayStatus::MissingQuote,
            };
        };

        let external = self.external.as_ref().filter(|_| self.policy.enabled);
        if let Some(external) = external {
            match external
                .find_quote(key.as_str(), record.location(), quote)
                .await
            {
                Ok(found) if found.confidence < self.policy.min_confidence => {
                    info!(
                        generation = ticket.id(),
                        confidence = found.confidence,
                        min_confidence = self.policy.min_confidence,
                        "external_match_low_confidence"
                    );
                }
                Ok(found) => match anchors_within(&found, page_count) {
                    Some(strategy) => return Plan::Locate(strategy),
                    None => warn!(page = found.page, page_count, "external_page_out_of_range"),
                },
                Err(err) => warn!(error = %err, "external_match_failure"),
            }
            return self.fallback(Some(quote), StrategyKind::Anchors);
        }

        Plan::Locate(LocateStrategy::Phrase {
            quote: quote.to_string(),
        })
    }

    fn fallback(&self, quote: Option<&str>, strategy: StrategyKind) -> Plan {
        match quote {
            Some(quote) if self.policy.fallback_to_scan => Plan::Locate(LocateStrategy::Phrase {
                quote: quote.to_string(),
            }),
            _ => Plan::Show {
                page: 1,
                status: DisplayStatus::NotFound {
                    strategy,
                    page_limit: self.scanner.config().page_limit,
                },
            },
        }
    }

    fn commit(&self, ticket: &Ticket, state: DisplayState) -> SelectionOutcome {
        let mut display = self.lock_display();
        if !ticket.is_current() {
            drop(display);
            return self.superseded(ticket);
        }
        info!(
            page = state.page,
            highlights = state.highlights.len(),
            status = ?state.status,
            "selection_applied"
        );
        *display = Some(state.clone());
        SelectionOutcome::Applied(state)
    }

    fn superseded(&self, ticket: &Ticket) -> SelectionOutcome {
        info!(
            generation = ticket.id(),
            latest = self.generations.latest(),
            "selection_superseded"
        );
        SelectionOutcome::Superseded {
            generation: ticket.id(),
        }
    }

    /// Drops the displayed state when `ticket` is still the latest selection.
    fn clear_display(&self, ticket: &Ticket) {
        let mut display = self.lock_display();
        if ticket.is_current() {
            *display = None;
        }
    }

    fn lock_display(&self) -> MutexGuard<'_, Option<DisplayState>> {
        self.display
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn anchors_within(found: &ExternalMatch, page_count: u32) -> Option<LocateStrategy> {
    (1..=page_count)
        .contains(&found.page)
        .then(|| LocateStrategy::Anchors {
            page: found.page,
            anchors: found.anchors.clone(),
        })
}

fn display_for(
    ticket: &Ticket,
    document: DocumentKey,
    page_count: u32,
    strategy: &LocateStrategy,
    report: ScanReport,
) -> DisplayState {
    let (page, highlights, status) = match report.result.page_match() {
        Some(found) => (
            found.page_number,
            found.fragment_ids.clone(),
            DisplayStatus::Highlighted {
                strategy: report.strategy,
            },
        ),
        None => {
            let page = match strategy {
                LocateStrategy::Anchors { page, .. } => *page,
                LocateStrategy::Phrase { .. } => 1,
            };
            (
                page,
                FragmentIds::new(),
                DisplayStatus::NotFound {
                    strategy: report.strategy,
                    page_limit: report.page_limit,
                },
            )
        }
    };
    DisplayState {
        generation: ticket.id(),
        document,
        page,
        page_count,
        highlights,
        status,
    }
}
