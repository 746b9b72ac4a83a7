//! Prose rendering: markdown to HTML with anchored headings.
//!
//! Prose is walked line by line. A line that starts a source line listed in
//! the outline is rendered by [`HeadingRenderer`]; every other run of lines
//! goes through markdown-rs. Runs are rendered separately, so link reference
//! definitions from the whole prose text are appended to each run.
//!
//! Placeholders split a run where they occur. On a heading line they are
//! removed from the line and reported right after the heading instead.

use folio_core::{FolioError, SourceLocation, locate_token, split_at_placeholders, strip_placeholders};
use markdown::mdast::Node;
use markdown::message::{Message, Place};

use crate::heading::HeadingRenderer;

/// Where a prose fragment starts in its source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProseOrigin {
    /// Source line (1-indexed) of the first character.
    pub line: usize,
    /// Whether the fragment begins at the start of that line.
    pub at_line_start: bool,
}

impl ProseOrigin {
    /// A fragment that is a document of its own.
    pub const START: Self = Self {
        line: 1,
        at_line_start: true,
    };

    /// Origin of the text starting at byte `offset` of `document`.
    pub fn at(document: &str, offset: usize) -> Self {
        let before = document.get(..offset).unwrap_or(document);
        Self {
            line: before.matches('\n').count() + 1,
            at_line_start: before.is_empty() || before.ends_with('\n'),
        }
    }
}

/// One piece of rendered prose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProsePart {
    /// Rendered HTML.
    Html(String),
    /// A placeholder occurrence, removed from the HTML.
    Placeholder,
}

/// Renders a prose fragment into HTML parts separated by placeholders.
pub fn render_prose(
    text: &str,
    origin: ProseOrigin,
    headings: &HeadingRenderer<'_>,
) -> Result<Vec<ProsePart>, FolioError> {
    let token = headings.options().placeholder.as_str();
    let mut writer = ProseWriter {
        definitions: collect_definitions(text, origin.line)?,
        parts: Vec::new(),
        html: String::with_capacity(text.len() * 2),
        run: String::new(),
        run_start_line: origin.line,
    };

    for (index, line) in text.split_inclusive('\n').enumerate() {
        let source_line = origin.line + index;
        let at_line_start = index > 0 || origin.at_line_start;
        let heading = if at_line_start {
            let visible = strip_placeholders(line.trim_end_matches(['\n', '\r']), token);
            headings.render_line(source_line, &visible)
        } else {
            None
        };

        match heading {
            Some(heading) => {
                writer.flush_run()?;
                writer.html.push_str(&heading);
                writer.html.push('\n');
                for _ in 0..locate_token(line, token).count() {
                    writer.placeholder();
                }
            }
            None => {
                let mut pieces = split_at_placeholders(line, token).into_iter();
                if let Some(first) = pieces.next() {
                    writer.push_text(first, source_line);
                }
                for piece in pieces {
                    writer.flush_run()?;
                    writer.placeholder();
                    writer.push_text(piece, source_line);
                }
            }
        }
    }
    writer.flush_run()?;
    Ok(writer.finish())
}

struct ProseWriter {
    definitions: String,
    parts: Vec<ProsePart>,
    html: String,
    run: String,
    run_start_line: usize,
}

impl ProseWriter {
    fn push_text(&mut self, text: &str, source_line: usize) {
        if self.run.is_empty() {
            self.run_start_line = source_line;
        }
        self.run.push_str(text);
    }

    fn placeholder(&mut self) {
        self.take_html();
        self.parts.push(ProsePart::Placeholder);
    }

    fn take_html(&mut self) {
        if !self.html.is_empty() {
            self.parts.push(ProsePart::Html(std::mem::take(&mut self.html)));
        }
    }

    fn finish(mut self) -> Vec<ProsePart> {
        self.take_html();
        self.parts
    }

    fn flush_run(&mut self) -> Result<(), FolioError> {
        let run = std::mem::take(&mut self.run);
        if run.trim().is_empty() {
            return Ok(());
        }

        let source = if self.definitions.is_empty() {
            run
        } else {
            format!("{run}\n\n{}", self.definitions)
        };
        let rendered = markdown::to_html_with_options(&source, &markdown::Options::gfm())
            .map_err(|message| adapter_error(&message, self.run_start_line))?;
        let rendered = rendered.trim_matches('\n');
        if !rendered.is_empty() {
            self.html.push_str(rendered);
            self.html.push('\n');
        }
        Ok(())
    }
}

/// Source text of every link reference definition in `text`.
fn collect_definitions(text: &str, start_line: usize) -> Result<String, FolioError> {
    let tree = markdown::to_mdast(text, &markdown::ParseOptions::gfm())
        .map_err(|message| adapter_error(&message, start_line))?;

    let mut definitions = Vec::new();
    if let Some(children) = tree.children() {
        for child in children {
            if let Node::Definition(definition) = child
                && let Some(position) = &definition.position
            {
                definitions.push(&text[position.start.offset..position.end.offset]);
            }
        }
    }
    Ok(definitions.join("\n"))
}

/// Maps a markdown-rs message onto the source document; `start_line` is
/// the source line of the fragment's first line.
fn adapter_error(message: &Message, start_line: usize) -> FolioError {
    let location = match message.place.as_deref() {
        Some(Place::Point(point)) => SourceLocation::new(point.line, point.column),
        Some(Place::Position(position)) => {
            SourceLocation::new(position.start.line, position.start.column)
        }
        None => SourceLocation::new(1, 1),
    };
    FolioError::parse_error(
        message.reason.clone(),
        location.line + start_line - 1,
        location.column,
    )
}
