use std::fmt;

use matcher::ExternalMatch;
use serde::{Deserialize, Serialize};

/// A stored record the user can select: which document to open and which
/// quote to highlight in it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecordRef {
    /// Stable identifier of the source document.
    #[serde(default)]
    pub document_id: Option<String>,
    /// Where the loader can fetch the document, typically a URL.
    #[serde(default)]
    pub location_hint: Option<String>,
    /// Verbatim passage captured from the document.
    #[serde(default)]
    pub quote: Option<String>,
    /// Page and anchors already computed by an external matcher.
    #[serde(default)]
    pub precomputed: Option<ExternalMatch>,
}

impl RecordRef {
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: Some(document_id.into()),
            ..Self::default()
        }
    }

    pub fn at_location(location_hint: impl Into<String>) -> Self {
        Self {
            location_hint: Some(location_hint.into()),
            ..Self::default()
        }
    }

    pub fn with_location(mut self, location_hint: impl Into<String>) -> Self {
        self.location_hint = Some(location_hint.into());
        self
    }

    pub fn with_quote(mut self, quote: impl Into<String>) -> Self {
        self.quote = Some(quote.into());
        self
    }

    pub fn with_precomputed(mut self, precomputed: ExternalMatch) -> Self {
        self.precomputed = Some(precomputed);
        self
    }

    /// Key under which the opened document is cached.
    ///
    /// The identifier wins over the location hint; blank strings count as
    /// absent. `None` when the record names no document at all.
    pub fn cache_key(&self) -> Option<DocumentKey> {
        non_blank(self.document_id.as_deref())
            .or_else(|| non_blank(self.location_hint.as_deref()))
            .map(DocumentKey::new)
    }

    /// The quote, unless it is missing or only whitespace.
    pub fn quote(&self) -> Option<&str> {
        non_blank(self.quote.as_deref())
    }

    pub fn location(&self) -> Option<&str> {
        non_blank(self.location_hint.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Cache key for an opened document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentKey(String);

impl DocumentKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
