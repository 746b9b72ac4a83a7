//! Render plan: segments, outline and placeholders stitched into page blocks.

use folio_core::{
    Diagnostics, FolioError, HeadingEntry, ParseWarning, Segment, Slugger, SourceLocation, Span,
    extract_headings_with, locate_token, outline_diagnostics, segment_with_diagnostics,
    strip_placeholders,
};
use serde::Serialize;

use crate::heading::HeadingRenderer;
use crate::options::{CodeTheme, RenderOptions, TocFallback};
use crate::prose::{ProseOrigin, ProsePart, render_prose};
use crate::toc::render_toc;

/// One block of a rendered page, in display order.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RenderBlock {
    /// Rendered prose HTML.
    Html {
        /// The HTML content string.
        content: String,
    },
    /// A code block for the page shell's syntax highlighter.
    Code {
        /// Language tag, `None` when the fence had none.
        lang: Option<String>,
        /// The code content.
        code: String,
        /// Highlighting theme.
        theme: CodeTheme,
    },
    /// The table of contents.
    Toc {
        /// Outline entries linked from the table.
        entries: Vec<HeadingEntry>,
        /// Rendered `<nav>` markup.
        html: String,
    },
}

/// Everything the page shell needs to display one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan {
    /// Blocks in display order.
    pub blocks: Vec<RenderBlock>,
    /// Document outline.
    pub outline: Vec<HeadingEntry>,
    /// Placeholder occurrences in the whole source.
    pub placeholder_count: usize,
    /// Non-fatal findings.
    pub diagnostics: Diagnostics,
}

impl RenderPlan {
    /// Concatenates HTML and TOC blocks, and code blocks as plain `<pre>`.
    ///
    /// Used for previews and link checking; the page shell normally
    /// highlights code blocks itself.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for block in &self.blocks {
            match block {
                RenderBlock::Html { content } => html.push_str(content),
                RenderBlock::Toc { html: toc, .. } => {
                    html.push_str(toc);
                    html.push('\n');
                }
                RenderBlock::Code { lang, code, theme } => {
                    html.push_str(&format!(r#"<pre class="{}">"#, theme.class_name()));
                    match lang {
                        Some(lang) => html.push_str(&format!(
                            r#"<code class="language-{}">"#,
                            html_escape::encode_double_quoted_attribute(lang)
                        )),
                        None => html.push_str("<code>"),
                    }
                    html.push_str(&html_escape::encode_text(code));
                    html.push_str("</code></pre>\n");
                }
            }
        }
        html
    }
}

/// Builds the render plan for `document`.
///
/// Segmentation and outline extraction run independently over the raw
/// source; the TOC is spliced in at every placeholder inside prose. Rendered
/// headings take their ids from the outline by source line.
pub fn build_plan(document: &str, options: &RenderOptions) -> Result<RenderPlan, FolioError> {
    let (segments, mut diagnostics) = segment_with_diagnostics(document);
    // Placeholders are removed before extraction so they never leak into
    // heading text; stripping keeps line numbers intact.
    let outline = extract_headings_with(
        &strip_placeholders(document, &options.placeholder),
        &mut Slugger::new(options.slug_mode),
    );
    diagnostics.merge(outline_diagnostics(&outline));
    let scan = locate_token(document, &options.placeholder);

    log::debug!(
        "plan: {} segments, {} headings, {} placeholders",
        segments.len(),
        outline.len(),
        scan.count()
    );

    let toc = TocBlock::new(&outline, options);
    let headings = HeadingRenderer::new(&outline, options);
    let mut blocks = Vec::with_capacity(segments.len() + scan.count() + 1);
    let mut prose_placeholders = 0usize;

    for segment in &segments {
        match segment {
            Segment::Prose { text, span } => {
                let origin = ProseOrigin::at(document, span.start);
                for part in render_prose(text, origin, &headings)? {
                    match part {
                        ProsePart::Html(content) => blocks.push(RenderBlock::Html { content }),
                        ProsePart::Placeholder => {
                            prose_placeholders += 1;
                            toc.push_into(&mut blocks);
                        }
                    }
                }
            }
            Segment::Code {
                language,
                body,
                span,
            } => {
                let code_scan = locate_token(body, &options.placeholder);
                let code = if code_scan.is_present() {
                    let body_start = code_body_offset(document, *span);
                    for position in &code_scan.positions {
                        diagnostics.add_warning(ParseWarning::PlaceholderInCode {
                            location: SourceLocation::from_offset(
                                document,
                                body_start + position,
                            ),
                        });
                    }
                    strip_placeholders(body, &options.placeholder)
                } else {
                    body.clone()
                };
                blocks.push(RenderBlock::Code {
                    lang: (!language.is_empty()).then(|| language.clone()),
                    code,
                    theme: options.code_theme(),
                });
            }
        }
    }

    if prose_placeholders == 0 && !outline.is_empty() {
        match options.toc_fallback {
            TocFallback::Prepend => {
                log::debug!("plan: no placeholder, prepending table of contents");
                let mut prefix = Vec::with_capacity(1);
                toc.push_into(&mut prefix);
                blocks.splice(0..0, prefix);
            }
            TocFallback::Omit => log::debug!("plan: no placeholder, table of contents omitted"),
        }
    }

    for warning in &diagnostics.warnings {
        log::warn!("{}", warning);
    }

    Ok(RenderPlan {
        blocks,
        outline,
        placeholder_count: scan.count(),
        diagnostics,
    })
}

/// Byte offset of a code segment's body: just past the language line, or
/// right after the opening fence when the fenced text has no newline.
fn code_body_offset(document: &str, span: Span) -> usize {
    let inner_start = span.start + FENCE_LEN;
    let inner = &document[inner_start..span.end - FENCE_LEN];
    inner.find('\n').map_or(inner_start, |newline| inner_start + newline + 1)
}

const FENCE_LEN: usize = "```".len();

/// Rendered TOC, reused at every insertion point.
struct TocBlock<'a> {
    outline: &'a [HeadingEntry],
    html: String,
}

impl<'a> TocBlock<'a> {
    fn new(outline: &'a [HeadingEntry], options: &RenderOptions) -> Self {
        Self {
            outline,
            html: render_toc(outline, options),
        }
    }

    /// Pushes the TOC unless the outline is empty.
    fn push_into(&self, blocks: &mut Vec<RenderBlock>) {
        if self.outline.is_empty() {
            return;
        }
        blocks.push(RenderBlock::Toc {
            entries: self.outline.to_vec(),
            html: self.html.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::check_anchor_links;
    use folio_core::SlugMode;

    fn plan(document: &str) -> RenderPlan {
        build_plan(document, &RenderOptions::default()).unwrap()
    }

    fn kinds(plan: &RenderPlan) -> Vec<&'static str> {
        plan.blocks
            .iter()
            .map(|block| match block {
                RenderBlock::Html { .. } => "html",
                RenderBlock::Code { .. } => "code",
                RenderBlock::Toc { .. } => "toc",
            })
            .collect()
    }

    #[test]
    fn toc_replaces_placeholder() {
        let plan = plan("# Title\n\nIntro\n\n[[toc]]\n\n## Part\n\nBody\n");
        assert_eq!(kinds(&plan), vec!["html", "toc", "html"]);
        assert_eq!(plan.placeholder_count, 1);
        assert!(!plan.to_html().contains("[[toc]]"));
    }

    #[test]
    fn every_placeholder_gets_a_toc() {
        let plan = plan("[[toc]]\n# A\n[[toc]]\n");
        assert_eq!(kinds(&plan), vec!["toc", "html", "toc"]);
        assert_eq!(plan.placeholder_count, 2);
    }

    #[test]
    fn missing_placeholder_prepends_toc() {
        let plan = plan("# A\n\ntext\n");
        assert_eq!(kinds(&plan), vec!["toc", "html"]);
    }

    #[test]
    fn fallback_can_be_omitted() {
        let options = RenderOptions {
            toc_fallback: TocFallback::Omit,
            ..Default::default()
        };
        let plan = build_plan("# A\n\ntext\n", &options).unwrap();
        assert_eq!(kinds(&plan), vec!["html"]);
    }

    #[test]
    fn empty_outline_means_no_toc() {
        let plan = plan("Just words [[toc]] and more.\n");
        assert_eq!(kinds(&plan), vec!["html", "html"]);
        assert!(plan.outline.is_empty());
        assert!(!plan.to_html().contains("[[toc]]"));
    }

    #[test]
    fn code_segments_become_code_blocks() {
        let plan = plan("Run:\n\n```sh\ncargo run\n```\n\n```\nplain\n```\n");
        assert_eq!(kinds(&plan), vec!["html", "code", "code"]);
        assert_eq!(
            plan.blocks[1],
            RenderBlock::Code {
                lang: Some("sh".into()),
                code: "cargo run".into(),
                theme: CodeTheme::Dark,
            }
        );
        assert!(matches!(&plan.blocks[2], RenderBlock::Code { lang: None, .. }));
    }

    #[test]
    fn light_mode_selects_light_theme() {
        let options = RenderOptions {
            light_mode: true,
            ..Default::default()
        };
        let plan = build_plan("```js\n1\n```", &options).unwrap();
        assert!(matches!(
            &plan.blocks[0],
            RenderBlock::Code { theme: CodeTheme::Light, .. }
        ));
        assert!(plan.to_html().starts_with(r#"<pre class="code-light"><code class="language-js">1</code></pre>"#));
    }

    #[test]
    fn placeholder_in_code_is_removed_and_reported() {
        let plan = plan("# A\n\n```md\nWrite [[toc]] here\n```\n");
        assert!(matches!(
            &plan.blocks[2],
            RenderBlock::Code { code, .. } if code == "Write  here"
        ));
        assert_eq!(plan.diagnostics.count(), 1);
        assert!(matches!(
            &plan.diagnostics.warnings[0],
            ParseWarning::PlaceholderInCode { location } if location.line == 4 && location.column == 7
        ));
        // The only placeholder sits in code, so the fallback still applies.
        assert_eq!(kinds(&plan), vec!["toc", "html", "code"]);
    }

    #[test]
    fn duplicate_headings_are_reported_not_renamed() {
        let plan = plan("## Setup\n\n## Setup\n");
        assert_eq!(plan.outline[0].slug, plan.outline[1].slug);
        assert!(matches!(
            &plan.diagnostics.warnings[0],
            ParseWarning::DuplicateSlug { slug, .. } if slug == "setup"
        ));
    }

    #[test]
    fn deduplicated_ids_match_outline() {
        let options = RenderOptions {
            slug_mode: SlugMode::Deduplicate,
            ..Default::default()
        };
        let plan = build_plan("[[toc]]\n## Setup\n\n## Setup\n", &options).unwrap();
        let html = plan.to_html();
        assert!(html.contains(r#"id="setup-1""#), "{html}");
        assert!(html.contains(r##"href="#setup-1""##), "{html}");
    }

    #[test]
    fn code_headings_keep_deduplicated_ids_aligned() {
        let options = RenderOptions {
            slug_mode: SlugMode::Deduplicate,
            ..Default::default()
        };
        let plan = build_plan("[[toc]]\n```sh\n# Install\n```\n# Install\n", &options).unwrap();
        let slugs: Vec<_> = plan.outline.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, vec!["install", "install-1"]);
        assert!(plan.to_html().contains(r#"<h1 id="install-1""#));
    }

    #[test]
    fn placeholder_on_heading_line_stays_out_of_outline() {
        let plan = plan("## Intro [[toc]]\n\ntext\n");
        assert_eq!(plan.outline[0].text, "Intro");
        assert_eq!(plan.outline[0].slug, "intro");
        let html = plan.to_html();
        assert!(html.contains(r#"<h2 id="intro" class="heading">Intro</h2>"#), "{html}");
        assert!(!html.contains("[[toc]]"));
    }

    #[test]
    fn placeholder_mid_heading_goes_after_the_heading() {
        let plan = plan("## Intro [[toc]] more\n\ntext\n");
        assert_eq!(plan.outline[0].slug, "intro-more");
        assert_eq!(kinds(&plan), vec!["html", "toc", "html"]);
        let html = plan.to_html();
        assert!(html.starts_with(r#"<h2 id="intro-more" class="heading">"#), "{html}");
        let report = check_anchor_links(&html).unwrap();
        assert!(report.is_clean(), "{:?}", report.broken);
    }

    #[test]
    fn fence_inside_heading_line_keeps_outline_id() {
        let plan = plan("## Run ```cargo``` now\n\ntext\n");
        assert_eq!(plan.outline[0].slug, "run-cargo-now");
        assert_eq!(kinds(&plan), vec!["toc", "html", "code", "html"]);
        let html = plan.to_html();
        assert!(html.contains(r#"<h2 id="run-cargo-now" class="heading">Run</h2>"#), "{html}");
        assert!(check_anchor_links(&html).unwrap().is_clean());
    }

    #[test]
    fn text_after_closing_fence_takes_no_id() {
        let options = RenderOptions {
            slug_mode: SlugMode::Deduplicate,
            ..Default::default()
        };
        let plan = build_plan("[[toc]]\n```x\ny\n```# Tail\n\n# Tail\n", &options).unwrap();
        let slugs: Vec<_> = plan.outline.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, vec!["tail"]);

        let html = plan.to_html();
        assert_eq!(html.matches(r#"id="tail""#).count(), 1, "{html}");
        assert!(!html.contains("tail-1"), "{html}");
        assert!(html.contains(r#"<h1 id="tail" class="heading">Tail</h1>"#), "{html}");
        assert!(check_anchor_links(&html).unwrap().is_clean());
    }

    #[test]
    fn unclosed_fence_is_prose_with_warning() {
        let plan = plan("text\n```js\nlet a;\n");
        assert!(kinds(&plan).iter().all(|kind| *kind == "html"));
        assert!(matches!(
            &plan.diagnostics.warnings[0],
            ParseWarning::UnclosedCodeFence { .. }
        ));
    }

    #[test]
    fn empty_document() {
        let plan = plan("");
        assert!(plan.blocks.is_empty());
        assert!(plan.outline.is_empty());
        assert_eq!(plan.placeholder_count, 0);
    }

    #[test]
    fn rendering_is_idempotent() {
        let doc = "# A\n\n[[toc]]\n\n```rs\nfn x() {}\n```\n## B\n";
        assert_eq!(plan(doc), plan(doc));
    }
}
