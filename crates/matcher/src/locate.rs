//! Quote locator: pure functions from a query and one page to fragment ids.
//!
//! Two strategies are supported and selected per lookup:
//!
//! - [`locate`]: exact substring search of a collapsing-normalized
//!   [`Needle`] in the page's canonical string, projected through the index
//!   map. The first occurrence wins.
//! - [`mark_anchors`]: stripping-normalized containment test of every
//!   [`AnchorSet`] token against every fragment. Fragment granularity only.

use canonical::{
    normalize_with, FragmentIds, NormalizeConfig, NormalizeProfile, PageIndex,
};

/// A quote normalized with the collapsing profile. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Needle {
    text: String,
}

impl Needle {
    /// Normalizes `raw`; returns `None` when nothing searchable remains.
    pub fn phrase(raw: &str) -> Option<Self> {
        Self::phrase_with(raw, &NormalizeConfig::default())
    }

    pub fn phrase_with(raw: &str, cfg: &NormalizeConfig) -> Option<Self> {
        let text = normalize_with(raw, NormalizeProfile::Collapsing, cfg);
        if text.is_empty() {
            None
        } else {
            Some(Self { text })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in bytes of the normalized needle.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Finds `needle` in `page` and returns the fragments covering the match.
///
/// The matched byte range `[start, start + needle.len())` is projected
/// through the index map; positions outside the canonical string are skipped.
pub fn locate(needle: &Needle, page: &PageIndex) -> Option<FragmentIds> {
    let range = page.find(needle.as_str())?;
    let ids = page.fragments_in(range);
    if ids.is_empty() {
        None
    } else {
        Some(ids)
    }
}

/// Normalizes `quote` and locates it in `page` in one call.
pub fn locate_quote(quote: &str, page: &PageIndex) -> Option<FragmentIds> {
    Needle::phrase(quote).and_then(|needle| locate(&needle, page))
}

/// Anchor tokens normalized with the stripping profile.
///
/// Anchors that strip to nothing are discarded, since the empty string is
/// contained in every fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSet {
    anchors: Vec<String>,
    config: NormalizeConfig,
}

impl AnchorSet {
    pub fn new<I, S>(anchors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(anchors, &NormalizeConfig::default())
    }

    pub fn with_config<I, S>(anchors: I, cfg: &NormalizeConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stripped: Vec<String> = anchors
            .into_iter()
            .map(|anchor| normalize_with(anchor.as_ref(), NormalizeProfile::Stripping, cfg))
            .filter(|anchor| !anchor.is_empty())
            .collect();
        stripped.sort();
        stripped.dedup();
        Self {
            anchors: stripped,
            config: cfg.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.anchors.iter().map(String::as_str)
    }

    fn hits(&self, fragment: &str) -> bool {
        let stripped = normalize_with(fragment, NormalizeProfile::Stripping, &self.config);
        !stripped.is_empty() && self.anchors.iter().any(|anchor| stripped.contains(anchor.as_str()))
    }
}

/// Marks every fragment whose stripped text contains at least one anchor.
pub fn mark_anchors<T: AsRef<str>>(anchors: &AnchorSet, fragments: &[T]) -> FragmentIds {
    if anchors.is_empty() {
        return FragmentIds::new();
    }
    fragments
        .iter()
        .enumerate()
        .filter(|(_, fragment)| anchors.hits(fragment.as_ref()))
        .map(|(idx, _)| idx)
        .collect()
}
