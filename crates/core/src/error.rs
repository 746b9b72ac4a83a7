use serde::Serialize;
use thiserror::Error;

use crate::frontmatter::FrontmatterError;

/// Source location information for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, counted in characters)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Resolve a byte offset inside `source` into a line/column pair.
    ///
    /// Offsets past the end of the input clamp to the final position.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |pos| pos + 1);
        let column = before[line_start..].chars().count() + 1;
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors that can occur while rendering a document.
#[derive(Debug, Error)]
pub enum FolioError {
    /// markdown-rs reported an error for a prose fragment.
    #[error("Parse error at {location}: {message}")]
    MarkdownAdapter {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// Render options could not be decoded.
    #[error("Invalid render options: {0}")]
    Config(String),
    /// The rendered HTML could not be scanned for anchors.
    #[error("Link check failed: {0}")]
    LinkCheck(String),
    /// Front matter of a post was malformed.
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
}

impl FolioError {
    /// Create a parse error with location
    pub fn parse_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::MarkdownAdapter {
            message: message.into(),
            location: SourceLocation::new(line, column),
        }
    }
}

/// Non-fatal warnings that don't change rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParseWarning {
    /// A triple-backtick fence was opened but never closed; the rest of the
    /// document is treated as prose.
    UnclosedCodeFence {
        /// Where the orphaned fence starts
        location: SourceLocation,
        /// First line of the orphaned fence, for the message
        context: String,
    },
    /// Two headings normalize to the same anchor id.
    DuplicateSlug {
        /// The colliding slug
        slug: String,
        /// Line of the first heading using the slug
        first: SourceLocation,
        /// Line of the later heading
        location: SourceLocation,
    },
    /// A placeholder token sat inside a code block and was removed.
    PlaceholderInCode {
        /// Position of the token in the source document
        location: SourceLocation,
    },
}

impl ParseWarning {
    /// Get the location of this warning
    pub fn location(&self) -> &SourceLocation {
        match self {
            ParseWarning::UnclosedCodeFence { location, .. } => location,
            ParseWarning::DuplicateSlug { location, .. } => location,
            ParseWarning::PlaceholderInCode { location } => location,
        }
    }
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::UnclosedCodeFence { location, context } => {
                write!(f, "Unclosed code fence: {}, near '{}'", location, context)
            }
            ParseWarning::DuplicateSlug {
                slug,
                first,
                location,
            } => write!(
                f,
                "{}: heading id '{}' already used at {}",
                location, slug, first
            ),
            ParseWarning::PlaceholderInCode { location } => {
                write!(f, "{}: placeholder inside code block removed", location)
            }
        }
    }
}

/// Collection of diagnostics gathered during a render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// List of non-fatal warnings
    pub warnings: Vec<ParseWarning>,
}

impl Diagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning to the diagnostics collection
    pub fn add_warning(&mut self, warning: ParseWarning) {
        self.warnings.push(warning);
    }

    /// Move every warning of `other` into this collection.
    pub fn merge(&mut self, mut other: Diagnostics) {
        self.warnings.append(&mut other.warnings);
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get total count of all diagnostics
    pub fn count(&self) -> usize {
        self.warnings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_resolves_to_line_and_column() {
        let source = "first\nsecond line\nthird";
        assert_eq!(SourceLocation::from_offset(source, 0), SourceLocation::new(1, 1));
        assert_eq!(SourceLocation::from_offset(source, 6), SourceLocation::new(2, 1));
        assert_eq!(SourceLocation::from_offset(source, 13), SourceLocation::new(2, 8));
    }

    #[test]
    fn offset_counts_characters_not_bytes() {
        let source = "héllo";
        // 'é' is two bytes; offset 3 points at the first 'l'
        assert_eq!(SourceLocation::from_offset(source, 3), SourceLocation::new(1, 3));
    }

    #[test]
    fn offset_past_end_clamps() {
        let source = "ab\ncd";
        assert_eq!(SourceLocation::from_offset(source, 99), SourceLocation::new(2, 3));
    }

    #[test]
    fn warning_display_mentions_slug() {
        let warning = ParseWarning::DuplicateSlug {
            slug: "intro".into(),
            first: SourceLocation::new(1, 1),
            location: SourceLocation::new(5, 1),
        };
        assert_eq!(
            warning.to_string(),
            "5:1: heading id 'intro' already used at 1:1"
        );
    }
}
