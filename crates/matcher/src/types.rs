use canonical::{FragmentIds, NormalizeConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default ceiling on pages decoded by one phrase scan.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Which locating strategy produced a report, for logs and metrics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Local exact-phrase scan over collapsed page text.
    Phrase,
    /// Fragment marking with anchor tokens on a page picked externally.
    Anchors,
}

/// How to locate a quote in one lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LocateStrategy {
    /// Scan pages in order until the normalized quote appears.
    Phrase { quote: String },
    /// Decode only `page` and mark fragments containing any anchor.
    Anchors { page: u32, anchors: Vec<String> },
}

impl LocateStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            LocateStrategy::Phrase { .. } => StrategyKind::Phrase,
            LocateStrategy::Anchors { .. } => StrategyKind::Anchors,
        }
    }
}

/// Scanner tuning shared by every lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanConfig {
    /// Highest page number a phrase scan will decode.
    #[serde(default = "ScanConfig::default_page_limit")]
    pub page_limit: u32,
    /// Normalization applied to page text, quotes and anchors.
    #[serde(default)]
    pub normalize: NormalizeConfig,
}

impl ScanConfig {
    pub(crate) fn default_page_limit() -> u32 {
        DEFAULT_PAGE_LIMIT
    }

    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit;
        self
    }

    pub fn validate(&self) -> Result<(), ScanConfigError> {
        if self.page_limit == 0 {
            return Err(ScanConfigError::Invalid(
                "page_limit must be greater than zero".into(),
            ));
        }
        if !self.normalize.is_valid() {
            return Err(ScanConfigError::Invalid(
                "normalize.version must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            normalize: NormalizeConfig::default(),
        }
    }
}

/// Where a quote was found.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMatch {
    /// 1-based page number.
    pub page_number: u32,
    /// Fragments of that page to highlight.
    pub fragment_ids: FragmentIds,
}

/// Outcome of locating a quote. `NotFound` is an ordinary result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchResult {
    Found(PageMatch),
    NotFound,
}

impl MatchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, MatchResult::Found(_))
    }

    pub fn page_match(&self) -> Option<&PageMatch> {
        match self {
            MatchResult::Found(found) => Some(found),
            MatchResult::NotFound => None,
        }
    }
}

/// Everything a scan observed, for the caller and for metrics.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScanReport {
    pub strategy: StrategyKind,
    pub result: MatchResult,
    /// Page ceiling that applied to this lookup.
    pub page_limit: u32,
    /// Pages whose fragments were decoded successfully.
    pub pages_decoded: u32,
    /// Pages whose decoding failed and were skipped.
    pub failed_pages: Vec<u32>,
    /// A newer selection was issued while this scan ran; it stopped early.
    pub superseded: bool,
}

impl ScanReport {
    pub(crate) fn new(strategy: StrategyKind, page_limit: u32) -> Self {
        Self {
            strategy,
            result: MatchResult::NotFound,
            page_limit,
            pages_decoded: 0,
            failed_pages: Vec::new(),
            superseded: false,
        }
    }

    pub fn is_found(&self) -> bool {
        self.result.is_found()
    }
}

/// Invalid scanner configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanConfigError {
    #[error("invalid scan config: {0}")]
    Invalid(String),
}

/// The document cannot be opened at all. Fatal for the current selection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Neither an identifier nor a location hint was supplied.
    #[error("record has neither a document identifier nor a location hint")]
    MissingLocation,
    /// The loader could not fetch or parse the document.
    #[error("cannot open document {document}: {reason}")]
    Open { document: String, reason: String },
    /// The fetched bytes are not a document the loader understands.
    #[error("document {document} is not a supported format: {reason}")]
    Unsupported { document: String, reason: String },
}

/// One page's fragments could not be extracted. The scanner skips the page.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("page {page} could not be decoded: {reason}")]
pub struct PageDecodeError {
    pub page: u32,
    pub reason: String,
}

impl PageDecodeError {
    pub fn new(page: u32, reason: impl Into<String>) -> Self {
        Self {
            page,
            reason: reason.into(),
        }
    }
}

/// The external semantic matcher could not answer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExternalMatchError {
    #[error("external matcher unavailable: {0}")]
    Unavailable(String),
    #[error("external matcher rejected the request: {0}")]
    Rejected(String),
    #[error("malformed external matcher response: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = ScanConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.page_limit, 50);
    }

    #[test]
    fn zero_page_limit_rejected() {
        let cfg = ScanConfig::default().with_page_limit(0);
        let err = cfg.validate().expect_err("config should be invalid");
        match err {
            ScanConfigError::Invalid(msg) => assert!(msg.contains("page_limit")),
        }
    }

    #[test]
    fn strategy_kind_follows_variant() {
        let phrase = LocateStrategy::Phrase {
            quote: "net 30".into(),
        };
        let anchors = LocateStrategy::Anchors {
            page: 2,
            anchors: vec!["net".into()],
        };
        assert_eq!(phrase.kind(), StrategyKind::Phrase);
        assert_eq!(anchors.kind(), StrategyKind::Anchors);
    }

    #[test]
    fn match_result_serializes_with_status_tag() {
        let found = MatchResult::Found(PageMatch {
            page_number: 3,
            fragment_ids: FragmentIds::from([4, 5]),
        });
        let json = serde_json::to_value(&found).expect("serialize");
        assert_eq!(json["status"], "found");
        assert_eq!(json["page_number"], 3);
        assert_eq!(json["fragment_ids"], serde_json::json!([4, 5]));

        let missing = serde_json::to_value(MatchResult::NotFound).expect("serialize");
        assert_eq!(missing["status"], "not_found");
    }

    #[test]
    fn load_error_messages_name_document() {
        let err = LoadError::Open {
            document: "order-9".into(),
            reason: "HTTP 404".into(),
        };
        assert!(err.to_string().contains("order-9"));
        assert!(err.to_string().contains("HTTP 404"));
    }
}
