use serde::{Deserialize, Serialize};

/// One atomic piece of extracted page text.
///
/// Produced by the document decoder in reading order. `geometry` is opaque
/// to the matching core; a renderer uses it to draw the highlight.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawFragment<G = ()> {
    /// Extracted text, exactly as the decoder produced it.
    pub text: String,
    /// Position and size on the page, in the decoder's coordinate space.
    pub geometry: G,
}

impl RawFragment<()> {
    /// Builds a fragment with no geometry attached.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            geometry: (),
        }
    }
}

impl<G> RawFragment<G> {
    pub fn new(text: impl Into<String>, geometry: G) -> Self {
        Self {
            text: text.into(),
            geometry,
        }
    }
}

impl<G> AsRef<str> for RawFragment<G> {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}
