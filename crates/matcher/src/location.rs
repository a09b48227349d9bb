//! Helpers for loaders that fetch documents from a location hint.
//!
//! Some file hosts serve an HTML preview at the shared link and the file
//! itself only with a "force download" query flag. [`candidate_locations`]
//! lists the variants worth trying in order; [`looks_like_pdf`] tells a real
//! document apart from a preview page. [`MemoryLoader`](crate::MemoryLoader)
//! resolves location hints this way.

const DOWNLOAD_FLAGS: [&str; 2] = ["download=1", "raw=1"];

/// `true` for `http://` and `https://` locations, case-insensitively.
pub fn is_http_location(location: &str) -> bool {
    let trimmed = location.trim_start();
    ["http://", "https://"].iter().any(|scheme| {
        trimmed
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// The location itself, then its force-download variants.
///
/// A flag already present anywhere in the location is not appended again.
/// The result keeps first-seen order and holds no duplicates.
pub fn candidate_locations(location: &str) -> Vec<String> {
    let mut candidates = vec![location.to_string()];
    for flag in DOWNLOAD_FLAGS {
        if location.contains(flag) {
            continue;
        }
        let joiner = if location.contains('?') { '&' } else { '?' };
        let variant = format!("{location}{joiner}{flag}");
        if !candidates.contains(&variant) {
            candidates.push(variant);
        }
    }
    candidates
}

/// `true` when the response looks like a PDF: the content type names
/// `application/pdf`, or the body starts with the `%PDF` magic.
pub fn looks_like_pdf(content_type: Option<&str>, first_bytes: &[u8]) -> bool {
    let declared = content_type
        .map(|ctype| ctype.to_ascii_lowercase().contains("application/pdf"))
        .unwrap_or(false);
    declared || first_bytes.starts_with(b"%PDF")
}
