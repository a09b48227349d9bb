//! Whitespace and invisible-character handling.
//!
//! Document text extraction produces whitespace in many shapes: ASCII
//! spaces, tabs, line breaks, no-break spaces, and the occasional
//! zero-width character or soft hyphen inserted by the typesetter. This
//! module decides which of those are separators and which vanish.
//!
//! # Whitespace Definition
//!
//! Separators are Unicode whitespace as defined by [`char::is_whitespace`].
//!
//! Removable characters are dropped without leaving a separator:
//! - Soft hyphen (U+00AD)
//! - Zero-width space (U+200B)
//! - Byte-order mark / zero-width no-break space (U+FEFF)
//!
//! # Examples
//!
//! ```rust
//! use canonical::{collapse_whitespace, strip_whitespace};
//!
//! assert_eq!(collapse_whitespace("  hyph\u{00AD}enated \n text "), "hyphenated text");
//! assert_eq!(strip_whitespace(" con\u{00AD}tract  no. 7 "), "contractno.7");
//! ```

/// Characters removed entirely by every profile.
const REMOVABLE: [char; 3] = ['\u{00AD}', '\u{200B}', '\u{FEFF}'];

/// Returns `true` if `ch` separates words.
#[inline]
pub fn is_separator(ch: char) -> bool {
    ch.is_whitespace()
}

/// Returns `true` if `ch` is dropped with no separator left behind.
#[inline]
pub fn is_removable(ch: char) -> bool {
    REMOVABLE.contains(&ch)
}

/// Collapses whitespace runs to single ASCII spaces, drops removable
/// characters, and trims both edges.
///
/// This is the whitespace half of the collapsing profile. It does not
/// lowercase or substitute punctuation; use
/// [`normalize()`](crate::normalize) for the full pipeline.
///
/// # Examples
///
/// ```rust
/// use canonical::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("hello\t\t\tworld"), "hello world");
/// assert_eq!(collapse_whitespace("hello\r\nworld"), "hello world");
/// assert_eq!(collapse_whitespace("hello\u{00A0}world"), "hello world");
/// assert_eq!(collapse_whitespace("   \n\t   "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_was_space = true;
    for ch in text.chars() {
        push_collapsed(&mut out, &mut prev_was_space, ch);
    }
    trim_trailing_separator(&mut out);
    out
}

/// Removes whitespace and removable characters entirely.
///
/// # Examples
///
/// ```rust
/// use canonical::strip_whitespace;
///
/// assert_eq!(strip_whitespace("a b\tc\nd"), "abcd");
/// assert_eq!(strip_whitespace("   "), "");
/// ```
pub fn strip_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        push_stripped(&mut out, ch);
    }
    out
}

/// Appends `ch` under the collapsing rule.
///
/// `prev_was_space` starts as `true` so leading whitespace never reaches the
/// buffer.
#[inline]
pub(crate) fn push_collapsed(out: &mut String, prev_was_space: &mut bool, ch: char) {
    if is_removable(ch) {
        return;
    }
    if is_separator(ch) {
        if !*prev_was_space {
            out.push(' ');
            *prev_was_space = true;
        }
    } else {
        out.push(ch);
        *prev_was_space = false;
    }
}

#[inline]
pub(crate) fn push_stripped(out: &mut String, ch: char) {
    if !is_removable(ch) && !is_separator(ch) {
        out.push(ch);
    }
}

/// Pops trailing ASCII separators; returns how many bytes were removed.
pub(crate) fn trim_trailing_separator(out: &mut String) -> usize {
    let mut removed = 0;
    while out.ends_with(' ') {
        out.pop();
        removed += 1;
    }
    removed
}
