//! Fragment-to-canonical index maps.
//!
//! [`build_index`] turns the ordered fragments of one page into a single
//! canonical string under the collapsing profile, and records for every byte
//! of that string which fragment produced it. The map is what lets a match
//! found in the canonical string be projected back onto the fragments that
//! have to be highlighted.
//!
//! # Separator attribution
//!
//! - A whitespace run inside or across fragments becomes one ASCII space,
//!   attributed to the fragment that contained the first whitespace char.
//! - When a fragment ends without whitespace, a synthetic space is appended
//!   and attributed to that fragment, so the last word of one fragment never
//!   fuses with the first word of the next.
//! - Trailing separators are trimmed together with their map entries.
//!
//! ```rust
//! use canonical::build_index;
//!
//! let page = build_index(&["Hello ", "World"]);
//! assert_eq!(page.canonical_text(), "hello world");
//! assert_eq!(page.index_map(), &[0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1]);
//! ```
//!
//! # Known limitation
//!
//! A word hyphenated across a line break arrives as two fragments
//! (`"inter-"`, `"national"`) and is indexed as `"inter- national"`. Quotes
//! straddling such a break do not match under the collapsing profile.

use std::collections::BTreeSet;
use std::ops::Range;

use serde::Serialize;

use crate::config::NormalizeConfig;
use crate::normalize::fold_char;
use crate::whitespace::{is_removable, is_separator};

/// Distinct fragment indices, ascending.
pub type FragmentIds = BTreeSet<usize>;

/// Canonical search string of one page plus its byte-to-fragment map.
///
/// Invariants:
/// - `index_map().len() == canonical_text().len()`
/// - `index_map()` is non-decreasing
/// - every entry is a valid index into the fragments it was built from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageIndex {
    canonical_text: String,
    index_map: Vec<usize>,
}

impl PageIndex {
    /// Haystack for phrase search.
    pub fn canonical_text(&self) -> &str {
        &self.canonical_text
    }

    /// Owning fragment for each byte of [`canonical_text`](Self::canonical_text).
    pub fn index_map(&self) -> &[usize] {
        &self.index_map
    }

    pub fn len(&self) -> usize {
        self.canonical_text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical_text.is_empty()
    }

    /// Fragment that produced the byte at `offset`, if the offset is in bounds.
    pub fn fragment_at(&self, offset: usize) -> Option<usize> {
        self.index_map.get(offset).copied()
    }

    /// Fragments covering the byte range `range`. Positions past the end of
    /// the canonical string are ignored.
    pub fn fragments_in(&self, range: Range<usize>) -> FragmentIds {
        let end = range.end.min(self.index_map.len());
        let start = range.start.min(end);
        self.index_map[start..end].iter().copied().collect()
    }

    /// Byte range of the first occurrence of `needle`.
    ///
    /// `needle` must already be normalized with the collapsing profile. An
    /// empty needle never matches.
    pub fn find(&self, needle: &str) -> Option<Range<usize>> {
        if needle.is_empty() {
            return None;
        }
        self.canonical_text
            .find(needle)
            .map(|start| start..start + needle.len())
    }
}

/// Builds the page index with the default normalization configuration.
pub fn build_index<T: AsRef<str>>(fragments: &[T]) -> PageIndex {
    build_index_with(fragments, &NormalizeConfig::default())
}

/// Builds the page index for `fragments`, visiting each character once.
///
/// A page with no fragments, or only blank ones, yields an empty index.
pub fn build_index_with<T: AsRef<str>>(fragments: &[T], cfg: &NormalizeConfig) -> PageIndex {
    let capacity: usize = fragments
        .iter()
        .map(|f| f.as_ref().len() + 1)
        .sum();
    let mut builder = IndexBuilder::with_capacity(capacity);

    for (owner, fragment) in fragments.iter().enumerate() {
        for ch in fragment.as_ref().chars() {
            fold_char(ch, cfg, |folded| builder.push(folded, owner));
        }
        builder.end_fragment(owner);
    }

    builder.finish()
}

struct IndexBuilder {
    text: String,
    map: Vec<usize>,
    // Carries across fragment boundaries; starts true so nothing leads with a space.
    prev_was_space: bool,
}

impl IndexBuilder {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            map: Vec::with_capacity(capacity),
            prev_was_space: true,
        }
    }

    fn push(&mut self, ch: char, owner: usize) {
        if is_removable(ch) {
            return;
        }
        if is_separator(ch) {
            if !self.prev_was_space {
                self.emit(' ', owner);
                self.prev_was_space = true;
            }
        } else {
            self.emit(ch, owner);
            self.prev_was_space = false;
        }
    }

    fn end_fragment(&mut self, owner: usize) {
        if !self.prev_was_space {
            self.emit(' ', owner);
            self.prev_was_space = true;
        }
    }

    fn emit(&mut self, ch: char, owner: usize) {
        self.text.push(ch);
        self.map
            .extend(std::iter::repeat(owner).take(ch.len_utf8()));
    }

    fn finish(mut self) -> PageIndex {
        while self.text.ends_with(' ') {
            self.text.pop();
            self.map.pop();
        }
        PageIndex {
            canonical_text: self.text,
            index_map: self.map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawFragment;

    fn assert_invariants<T: AsRef<str>>(fragments: &[T], page: &PageIndex) {
        assert_eq!(page.index_map().len(), page.canonical_text().len());
        assert!(page.index_map().windows(2).all(|w| w[0] <= w[1]));
        assert!(page.index_map().iter().all(|&i| i < fragments.len()));
    }

    #[test]
    fn multi_fragment_span_attributes_boundary_to_first() {
        let fragments = ["Hello ", "World"];
        let page = build_index(&fragments);
        assert_eq!(page.canonical_text(), "hello world");
        let range = page.find("hello world").expect("phrase present");
        assert_eq!(page.fragments_in(range), FragmentIds::from([0, 1]));
        assert_eq!(page.fragment_at(5), Some(0));
        assert_invariants(&fragments, &page);
    }

    #[test]
    fn synthetic_separator_between_unspaced_fragments() {
        let fragments = ["Net", "30", "days"];
        let page = build_index(&fragments);
        assert_eq!(page.canonical_text(), "net 30 days");
        assert_eq!(page.fragment_at(3), Some(0));
        assert_eq!(page.fragment_at(6), Some(1));
        assert_invariants(&fragments, &page);
    }

    #[test]
    fn whitespace_state_persists_across_fragments() {
        let fragments = ["a  ", "  ", " b"];
        let page = build_index(&fragments);
        assert_eq!(page.canonical_text(), "a b");
        assert_eq!(page.index_map(), &[0, 0, 2]);
    }

    #[test]
    fn empty_fragments_do_not_force_separators() {
        let fragments = ["", "ab", "", "", "cd", ""];
        let page = build_index(&fragments);
        assert_eq!(page.canonical_text(), "ab cd");
        assert_eq!(page.index_map(), &[1, 1, 1, 4, 4]);
        assert_invariants(&fragments, &page);
    }

    #[test]
    fn zero_fragments_yield_empty_index() {
        let fragments: [RawFragment; 0] = [];
        let page = build_index(&fragments);
        assert!(page.is_empty());
        assert!(page.index_map().is_empty());
        assert_eq!(page.fragment_at(0), None);
    }

    #[test]
    fn multibyte_characters_map_every_byte() {
        let fragments = ["Źródło", "— cytat"];
        let page = build_index(&fragments);
        assert_eq!(page.canonical_text(), "źródło - cytat");
        assert_invariants(&fragments, &page);
        let range = page.find("- cytat").expect("dash folded");
        assert_eq!(page.fragments_in(range), FragmentIds::from([1]));
    }

    #[test]
    fn soft_hyphen_inside_fragment_joins_word() {
        let page = build_index(&["con\u{00AD}tract signed"]);
        assert_eq!(page.canonical_text(), "contract signed");
    }

    #[test]
    fn out_of_bounds_ranges_are_clamped() {
        let page = build_index(&["abc"]);
        assert_eq!(page.fragments_in(1..99), FragmentIds::from([0]));
        assert!(page.fragments_in(50..99).is_empty());
    }

    #[test]
    fn empty_needle_never_matches() {
        let page = build_index(&["abc"]);
        assert_eq!(page.find(""), None);
    }

    #[test]
    fn first_occurrence_wins() {
        let page = build_index(&["pay now", "then", "pay now"]);
        let range = page.find("pay now").expect("present");
        assert_eq!(range, 0..7);
        assert_eq!(page.fragments_in(range), FragmentIds::from([0]));
    }

    #[test]
    fn compatibility_folding_attributes_expanded_chars() {
        let cfg = NormalizeConfig {
            fold_compatibility: true,
            ..Default::default()
        };
        let fragments = ["\u{FB01}rst", "o\u{FB03}ce"];
        let page = build_index_with(&fragments, &cfg);
        assert_eq!(page.canonical_text(), "first office");
        assert_invariants(&fragments, &page);
    }
}
