//! Quotelight canonical text layer.
//!
//! This crate turns noisy extracted document text and stored quotes into a
//! comparable canonical form, and keeps a reversible map from the canonical
//! string back to the fragments it came from.
//!
//! ## What we do
//!
//! - Typographic dash and quote variants fold to ASCII (`—` → `-`, `’` → `'`)
//! - Locale-free lowercasing
//! - Whitespace handling per [`NormalizeProfile`] (collapse or strip)
//! - Soft hyphens and zero-width characters vanish
//! - Optional per-character NFKC folding for ligatures
//! - Per-page [`PageIndex`]: canonical string plus byte-to-fragment map
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no locale dependence. Everything here is safe to
//! call from any number of threads at once.
//!
//! ## Invariants worth knowing
//!
//! - `normalize(normalize(s, p), p) == normalize(s, p)` for both profiles
//! - `PageIndex::index_map().len() == PageIndex::canonical_text().len()`
//! - The index map is non-decreasing and only names real fragments

mod config;
mod fragment;
mod index;
mod normalize;
mod whitespace;

pub use crate::config::{NormalizeConfig, NormalizeProfile};
pub use crate::fragment::RawFragment;
pub use crate::index::{build_index, build_index_with, FragmentIds, PageIndex};
pub use crate::normalize::{fold_char, normalize, normalize_with, substitute};
pub use crate::whitespace::{collapse_whitespace, is_removable, is_separator, strip_whitespace};
