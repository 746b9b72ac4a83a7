//! Table of contents rendering and active-section tracking.

use folio_core::HeadingEntry;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::options::RenderOptions;

/// Renders the outline as a `<nav>` list. An empty outline renders nothing.
pub fn render_toc(outline: &[HeadingEntry], options: &RenderOptions) -> String {
    if outline.is_empty() {
        return String::new();
    }

    let mut html = String::from(r#"<nav class="toc" aria-label="Table of contents">"#);
    if let Some(title) = &options.toc_title {
        html.push_str(r#"<p class="toc-title">"#);
        html.push_str(&encode_text(title));
        html.push_str("</p>");
    }
    html.push_str("<ul>");
    for entry in outline {
        html.push_str(&format!(
            r##"<li class="toc-level-{}"><a href="#{}">{}</a></li>"##,
            entry.level,
            encode_double_quoted_attribute(&entry.slug),
            encode_text(&entry.text)
        ));
    }
    html.push_str("</ul></nav>");
    html
}

/// Measured position of a heading anchor, relative to the viewport top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorOffset {
    /// Element id.
    pub slug: String,
    /// Distance from the viewport top in pixels; negative once scrolled past.
    pub top: f64,
}

/// Lower edge, in pixels from the viewport top, of the band where a heading
/// becomes current.
pub const DEFAULT_ACTIVE_THRESHOLD: f64 = 120.0;

/// Picks the heading to highlight in the outline.
///
/// The active heading is the last one, in outline order, whose anchor sits at
/// or above `threshold`. Anchors missing from `offsets` never become
/// active. Returns `None` before the first heading reaches the band.
pub fn active_section<'a>(
    outline: &'a [HeadingEntry],
    offsets: &[AnchorOffset],
    threshold: f64,
) -> Option<&'a HeadingEntry> {
    let mut tops: HashMap<&str, f64> = HashMap::with_capacity(offsets.len());
    for offset in offsets {
        tops.entry(offset.slug.as_str()).or_insert(offset.top);
    }

    outline
        .iter()
        .filter(|entry| {
            tops.get(entry.slug.as_str())
                .is_some_and(|top| *top <= threshold)
        })
        .next_back()
}
