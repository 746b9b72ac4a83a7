//! Heading rendering with anchor ids.

use std::collections::HashMap;

use folio_core::{HeadingEntry, parse_heading_line};
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::options::RenderOptions;

/// Renders one heading element of any level.
///
/// `slug` becomes the element id; `text` is escaped.
pub fn render_heading(level: u8, text: &str, slug: &str, options: &RenderOptions) -> String {
    let id = encode_double_quoted_attribute(slug);
    let text = encode_text(text);
    if options.heading_autolinks {
        format!(
            "<h{level} id=\"{id}\" class=\"heading\"><a class=\"heading-anchor\" href=\"#{id}\">{text}</a></h{level}>"
        )
    } else {
        format!("<h{level} id=\"{id}\" class=\"heading\">{text}</h{level}>")
    }
}

/// Turns outline lines into HTML headings.
///
/// Ids are looked up by source line in the outline, never re-derived, so a
/// heading line cut short by a fence or a placeholder still gets the id the
/// table of contents links to.
pub struct HeadingRenderer<'a> {
    by_line: HashMap<usize, &'a HeadingEntry>,
    options: &'a RenderOptions,
}

impl<'a> HeadingRenderer<'a> {
    /// Creates a renderer for the headings of `outline`.
    pub fn new(outline: &'a [HeadingEntry], options: &'a RenderOptions) -> Self {
        Self {
            by_line: outline.iter().map(|entry| (entry.line, entry)).collect(),
            options,
        }
    }

    /// The options headings are rendered with.
    pub fn options(&self) -> &'a RenderOptions {
        self.options
    }

    /// The outline entry starting on source `line` (1-indexed).
    pub fn entry_at(&self, line: usize) -> Option<&'a HeadingEntry> {
        self.by_line.get(&line).copied()
    }

    /// Renders the heading on source `line`, or `None` when the outline has
    /// no heading there.
    ///
    /// `visible` is the part of the line that sits in prose. Its text is
    /// shown when it still parses as a heading; otherwise the outline text is.
    pub fn render_line(&self, line: usize, visible: &str) -> Option<String> {
        let entry = self.entry_at(line)?;
        let text = parse_heading_line(visible).map_or_else(|| entry.text.clone(), |(_, text)| text);
        Some(render_heading(entry.level, &text, &entry.slug, self.options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{SlugMode, Slugger, extract_headings, extract_headings_with};

    #[test]
    fn renders_id_and_text() {
        let html = render_heading(2, "Hello, World! Now", "hello-world-now", &RenderOptions::default());
        assert_eq!(
            html,
            r#"<h2 id="hello-world-now" class="heading">Hello, World! Now</h2>"#
        );
    }

    #[test]
    fn escapes_text() {
        let html = render_heading(1, "<script> & co", "script--co", &RenderOptions::default());
        assert_eq!(
            html,
            r#"<h1 id="script--co" class="heading">&lt;script&gt; &amp; co</h1>"#
        );
    }

    #[test]
    fn autolink_wraps_text() {
        let options = RenderOptions {
            heading_autolinks: true,
            ..Default::default()
        };
        assert_eq!(
            render_heading(3, "Setup", "setup", &options),
            r##"<h3 id="setup" class="heading"><a class="heading-anchor" href="#setup">Setup</a></h3>"##
        );
    }

    #[test]
    fn renderer_only_knows_outline_lines() {
        let options = RenderOptions::default();
        let outline = extract_headings("plain text\n#### deep\n## **Bold** move");
        let renderer = HeadingRenderer::new(&outline, &options);
        assert_eq!(renderer.render_line(1, "plain text"), None);
        assert_eq!(renderer.render_line(2, "#### deep"), None);
        assert_eq!(
            renderer.render_line(3, "## **Bold** move").as_deref(),
            Some(r#"<h2 id="bold-move" class="heading">Bold move</h2>"#)
        );
    }

    #[test]
    fn ids_come_from_the_outline() {
        let options = RenderOptions::default();
        let mut slugger = Slugger::new(SlugMode::Deduplicate);
        let outline = extract_headings_with("# Notes\n# Notes", &mut slugger);
        let renderer = HeadingRenderer::new(&outline, &options);
        let second = renderer.render_line(2, "# Notes").unwrap();
        assert!(second.contains(r#"id="notes-1""#), "{second}");
    }

    #[test]
    fn truncated_line_keeps_outline_id() {
        let options = RenderOptions::default();
        let outline = extract_headings("## Run ```cargo``` now");
        let renderer = HeadingRenderer::new(&outline, &options);
        assert_eq!(
            renderer.render_line(1, "## Run ").as_deref(),
            Some(r#"<h2 id="run-cargo-now" class="heading">Run</h2>"#)
        );
        // Nothing but hashes left in prose: fall back to the outline text.
        assert_eq!(
            renderer.render_line(1, "## ").as_deref(),
            Some(r#"<h2 id="run-cargo-now" class="heading">Run ```cargo``` now</h2>"#)
        );
    }
}
