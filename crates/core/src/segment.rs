//! Splits a markdown document into fenced-code and prose segments.
//!
//! A fence is three backticks; a code segment runs up to the next three
//! backticks, wherever they are. This is deliberately looser than CommonMark:
//! the page shell only needs to know which spans go to the highlighter.

use serde::Serialize;

use crate::error::{Diagnostics, ParseWarning, SourceLocation};

const FENCE: &str = "```";

/// Byte range of a segment inside the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Span {
    /// Creates a span from byte offsets.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the covered slice of `source`.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// One piece of a segmented document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Segment {
    /// Text between a pair of triple-backtick fences.
    Code {
        /// Language tag from the opening fence line, trimmed (may be empty).
        language: String,
        /// Fence contents with one trailing newline removed.
        body: String,
        /// Source range including both fences.
        span: Span,
    },
    /// Everything outside fences, verbatim.
    Prose {
        /// Raw markdown text.
        text: String,
        /// Source range.
        span: Span,
    },
}

impl Segment {
    /// Source range covered by this segment.
    pub fn span(&self) -> Span {
        match self {
            Segment::Code { span, .. } | Segment::Prose { span, .. } => *span,
        }
    }

    /// Returns true for code segments.
    pub fn is_code(&self) -> bool {
        matches!(self, Segment::Code { .. })
    }
}

/// Splits `document` into ordered segments.
///
/// Never fails: an opening fence without a closing fence is left in prose.
///
/// ```
/// use folio_core::segment::{Segment, segment};
///
/// let segments = segment("```js\nconst x = 1;\n```");
/// assert_eq!(segments.len(), 1);
/// assert!(matches!(
///     &segments[0],
///     Segment::Code { language, body, .. } if language == "js" && body == "const x = 1;"
/// ));
/// ```
pub fn segment(document: &str) -> Vec<Segment> {
    segment_with_diagnostics(document).0
}

/// Like [`segment`], also reporting an unclosed fence if one is left in prose.
pub fn segment_with_diagnostics(document: &str) -> (Vec<Segment>, Diagnostics) {
    let mut segments = Vec::new();
    let mut diagnostics = Diagnostics::new();
    let mut cursor = 0usize;

    while let Some(rel_open) = document[cursor..].find(FENCE) {
        let open = cursor + rel_open;
        let inner_start = open + FENCE.len();
        let Some(rel_close) = document[inner_start..].find(FENCE) else {
            diagnostics.add_warning(ParseWarning::UnclosedCodeFence {
                location: SourceLocation::from_offset(document, open),
                context: first_line(&document[open..]).to_string(),
            });
            break;
        };
        let close = inner_start + rel_close;
        let end = close + FENCE.len();

        push_prose(&mut segments, document, cursor, open);
        let (language, body) = split_fence_contents(&document[inner_start..close]);
        segments.push(Segment::Code {
            language: language.to_string(),
            body: body.to_string(),
            span: Span::new(open, end),
        });
        cursor = end;
    }

    push_prose(&mut segments, document, cursor, document.len());
    (segments, diagnostics)
}

/// Splits the text between fences into the language tag and the body.
fn split_fence_contents(inner: &str) -> (&str, &str) {
    let Some(newline) = inner.find('\n') else {
        return ("", inner);
    };
    let language = inner[..newline].trim();
    let body = &inner[newline + 1..];
    let body = match body.strip_suffix('\n') {
        Some(stripped) => stripped.strip_suffix('\r').unwrap_or(stripped),
        None => body,
    };
    (language, body)
}

fn push_prose(segments: &mut Vec<Segment>, document: &str, start: usize, end: usize) {
    if start < end {
        segments.push(Segment::Prose {
            text: document[start..end].to_string(),
            span: Span::new(start, end),
        });
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reassemble(document: &str, segments: &[Segment]) -> String {
        segments
            .iter()
            .map(|segment| segment.span().slice(document))
            .collect()
    }

    fn assert_lossless(document: &str) {
        let segments = segment(document);
        assert_eq!(reassemble(document, &segments), document, "{document:?}");
        let mut expected_start = 0;
        for segment in &segments {
            assert_eq!(segment.span().start, expected_start);
            expected_start = segment.span().end;
        }
    }

    #[test]
    fn single_fence() {
        let segments = segment("```js\nconst x = 1;\n```");
        assert_eq!(
            segments,
            vec![Segment::Code {
                language: "js".into(),
                body: "const x = 1;".into(),
                span: Span::new(0, 22),
            }]
        );
    }

    #[test]
    fn prose_around_code() {
        let doc = "Intro\n\n```rust\nfn main() {}\n```\n\nOutro\n";
        let segments = segment(doc);
        assert_eq!(segments.len(), 3);
        assert!(matches!(&segments[0], Segment::Prose { text, .. } if text == "Intro\n\n"));
        assert!(matches!(
            &segments[1],
            Segment::Code { language, body, .. } if language == "rust" && body == "fn main() {}"
        ));
        assert!(matches!(&segments[2], Segment::Prose { text, .. } if text == "\n\nOutro\n"));
        assert_lossless(doc);
    }

    #[test]
    fn adjacent_fences_have_no_empty_prose() {
        let doc = "```a\n1\n``````b\n2\n```";
        let segments = segment(doc);
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(Segment::is_code));
        assert_lossless(doc);
    }

    #[test]
    fn missing_language_is_empty() {
        let segments = segment("```\nplain\n```");
        assert!(matches!(
            &segments[0],
            Segment::Code { language, body, .. } if language.is_empty() && body == "plain"
        ));
    }

    #[test]
    fn language_tag_is_trimmed() {
        let segments = segment("```  python \r\nprint(1)\r\n```");
        assert!(matches!(
            &segments[0],
            Segment::Code { language, body, .. } if language == "python" && body == "print(1)"
        ));
    }

    #[test]
    fn only_one_trailing_newline_stripped() {
        let segments = segment("```txt\nline\n\n\n```");
        assert!(matches!(&segments[0], Segment::Code { body, .. } if body == "line\n\n"));
    }

    #[test]
    fn inline_fence_without_newline() {
        let segments = segment("see ```inline``` here");
        assert_eq!(segments.len(), 3);
        assert!(matches!(
            &segments[1],
            Segment::Code { language, body, .. } if language.is_empty() && body == "inline"
        ));
    }

    #[test]
    fn unterminated_fence_is_prose() {
        let doc = "Before\n```js\nlet a = 1;\n";
        let (segments, diagnostics) = segment_with_diagnostics(doc);
        assert!(segments.iter().all(|s| !s.is_code()));
        assert_eq!(diagnostics.count(), 1);
        assert!(matches!(
            &diagnostics.warnings[0],
            ParseWarning::UnclosedCodeFence { location, context }
                if location.line == 2 && context == "```js"
        ));
        assert_lossless(doc);
    }

    #[test]
    fn third_fence_left_dangling() {
        let doc = "```a\nx\n```\ntext\n```b\ny";
        let (segments, diagnostics) = segment_with_diagnostics(doc);
        assert_eq!(segments.iter().filter(|s| s.is_code()).count(), 1);
        assert_eq!(diagnostics.count(), 1);
        assert_lossless(doc);
    }

    #[test]
    fn fence_matching_is_non_greedy() {
        let doc = "```a\n1\n```\nmid\n```b\n2\n```";
        let segments = segment(doc);
        assert_eq!(segments.len(), 3);
        assert!(matches!(&segments[1], Segment::Prose { text, .. } if text == "\nmid\n"));
    }

    #[test]
    fn four_backticks_close_on_the_fourth() {
        // The pattern closes at the very next run of three backticks.
        let doc = "````md\nx\n````";
        let segments = segment(doc);
        assert_eq!(segments.len(), 2);
        assert!(matches!(
            &segments[0],
            Segment::Code { language, body, .. } if language == "`md" && body == "x"
        ));
        assert!(matches!(&segments[1], Segment::Prose { text, .. } if text == "`"));
        assert_lossless(doc);
    }

    #[test]
    fn empty_input() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn lossless_over_assorted_inputs() {
        for doc in [
            "",
            "just prose",
            "```",
            "``",
            "``````",
            "a```b```c```d",
            "# Title\n\n```sh\n# not a heading\n```\n\n## Next\n",
            "ünïcödé ```rs\nlet ß = 1;\n``` trailing ✓",
            "\n\n```\n\n```\n\n",
        ] {
            assert_lossless(doc);
        }
    }
}
