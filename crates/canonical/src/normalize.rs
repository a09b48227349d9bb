use unicode_normalization::UnicodeNormalization;

use crate::config::{NormalizeConfig, NormalizeProfile};
use crate::whitespace::{push_collapsed, push_stripped, trim_trailing_separator};

/// Maps typographic dash and quote variants to their ASCII equivalents.
///
/// Characters outside the table pass through unchanged.
#[inline]
pub fn substitute(ch: char) -> char {
    match ch {
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}'
        | '\u{2212}' | '\u{FE58}' | '\u{FE63}' | '\u{FF0D}' => '-',
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '\u{FF07}' => '\'',
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' | '\u{00AB}'
        | '\u{00BB}' | '\u{FF02}' => '"',
        other => other,
    }
}

/// Folds one raw character and hands the results to `emit`.
///
/// Folding applies optional NFKC, the substitution table, then
/// locale-independent lowercasing. One input character may emit zero or more
/// output characters. Whitespace and removable characters are emitted as-is;
/// the caller's profile decides what to do with them.
#[inline]
pub fn fold_char(ch: char, cfg: &NormalizeConfig, mut emit: impl FnMut(char)) {
    if cfg.fold_compatibility {
        for folded in std::iter::once(ch).nfkc() {
            fold_plain(folded, &mut emit);
        }
    } else {
        fold_plain(ch, &mut emit);
    }
}

#[inline]
fn fold_plain(ch: char, emit: &mut impl FnMut(char)) {
    for lower in substitute(ch).to_lowercase() {
        emit(lower);
    }
}

/// Normalizes `raw` with the default configuration.
///
/// # Examples
///
/// ```rust
/// use canonical::{normalize, NormalizeProfile};
///
/// assert_eq!(
///     normalize("Don\u{2019}t \u{2014}  Really", NormalizeProfile::Collapsing),
///     "don't - really"
/// );
/// assert_eq!(
///     normalize("Con\u{00AD}tract No. 7", NormalizeProfile::Stripping),
///     "contractno.7"
/// );
/// ```
pub fn normalize(raw: &str, profile: NormalizeProfile) -> String {
    normalize_with(raw, profile, &NormalizeConfig::default())
}

/// Normalizes `raw` under `profile` and `cfg`.
///
/// Total and deterministic: every input has an output, and
/// `normalize_with(normalize_with(s)) == normalize_with(s)`.
pub fn normalize_with(raw: &str, profile: NormalizeProfile, cfg: &NormalizeConfig) -> String {
    let mut out = String::with_capacity(raw.len());
    match profile {
        NormalizeProfile::Collapsing => {
            let mut prev_was_space = true;
            for ch in raw.chars() {
                fold_char(ch, cfg, |folded| {
                    push_collapsed(&mut out, &mut prev_was_space, folded)
                });
            }
            trim_trailing_separator(&mut out);
        }
        NormalizeProfile::Stripping => {
            for ch in raw.chars() {
                fold_char(ch, cfg, |folded| push_stripped(&mut out, folded));
            }
        }
    }
    out
}
