//! Configuration types for quote normalization.
//!
//! This module defines [`NormalizeProfile`], which selects how whitespace is
//! treated, and [`NormalizeConfig`], which carries the knobs shared by both
//! profiles.
//!
//! # Profiles
//!
//! Two profiles exist because two matching strategies consume normalized text:
//!
//! - [`NormalizeProfile::Collapsing`] turns every whitespace run into a single
//!   ASCII space. The phrase locator searches for whole quotes this way.
//! - [`NormalizeProfile::Stripping`] removes whitespace entirely. Anchor
//!   tokens are compared this way, so a token broken across a line still
//!   matches its fragment.
//!
//! Both profiles drop soft hyphens and zero-width characters without leaving
//! a separator behind.
//!
//! # Versioning
//!
//! The `version` field follows the same rule as every other canonical
//! configuration: any change to observable output needs a version bump.
//!
//! # Examples
//!
//! ```rust
//! use canonical::{NormalizeConfig, NormalizeProfile};
//!
//! let config = NormalizeConfig::default();
//! assert_eq!(config.version, 1);
//! assert!(!config.fold_compatibility);
//! assert_eq!(NormalizeProfile::default(), NormalizeProfile::Collapsing);
//! ```

use serde::{Deserialize, Serialize};

/// Whitespace policy applied after character folding.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeProfile {
    /// Whitespace runs collapse to one ASCII space; edges are trimmed.
    #[default]
    Collapsing,
    /// Whitespace is removed entirely.
    Stripping,
}

/// Configuration shared by both normalization profiles.
///
/// `NormalizeConfig` is cheap to clone and serializable so it can be embedded
/// in a viewer configuration file.
///
/// ```json
/// {
///   "version": 1,
///   "fold_compatibility": false
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizeConfig {
    /// Version of the normalization rules. Must be >= 1.
    pub version: u32,

    /// If true, apply per-character NFKC folding before the substitution
    /// table.
    ///
    /// Text extracted from typeset documents often carries ligatures
    /// (`"\u{FB01}"` for "fi") and full-width forms. Folding maps them to
    /// their plain equivalents:
    ///
    /// ```text
    /// "\u{FB01}nal"  → "final"
    /// "\u{2026}"     → "..."
    /// ```
    ///
    /// Folding can make the canonical string longer than the raw fragment
    /// text, so it is disabled unless the caller asks for it.
    ///
    /// # Default
    ///
    /// `false`
    pub fold_compatibility: bool,
}

impl NormalizeConfig {
    /// Returns `true` when the configuration can be used.
    pub fn is_valid(&self) -> bool {
        self.version >= 1
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            fold_compatibility: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_zero_is_invalid() {
        let cfg = NormalizeConfig {
            version: 0,
            ..Default::default()
        };
        assert!(!cfg.is_valid());
        assert!(NormalizeConfig::default().is_valid());
    }
}
