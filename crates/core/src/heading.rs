//! Heading outline extraction.
//!
//! The outline is built from the raw document, independent of segmentation.
//! [`parse_heading_line`] is the only line matcher; the heading renderer in
//! `folio-render` calls it too so anchor ids and outline links agree.

use serde::Serialize;
use std::collections::HashMap;

use crate::error::{Diagnostics, ParseWarning, SourceLocation};
use crate::slug::{SlugMode, Slugger};

/// Deepest heading level that takes part in the outline.
pub const MAX_OUTLINE_LEVEL: u8 = 3;

/// One entry of a document outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingEntry {
    /// Heading level (1-3).
    pub level: u8,
    /// Heading text with `**` markers removed and whitespace trimmed.
    pub text: String,
    /// Anchor id derived from `text`.
    pub slug: String,
    /// Source line (1-indexed).
    pub line: usize,
}

/// Matches a single ATX heading line of level 1-3.
///
/// Returns the level and the display text. A trailing `\r` is ignored.
///
/// ```
/// use folio_core::heading::parse_heading_line;
///
/// assert_eq!(parse_heading_line("## Hello **World**"), Some((2, "Hello World".to_string())));
/// assert_eq!(parse_heading_line("#### Too Deep"), None);
/// assert_eq!(parse_heading_line("#NoSpace"), None);
/// ```
pub fn parse_heading_line(line: &str) -> Option<(u8, String)> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 || hashes > MAX_OUTLINE_LEVEL as usize {
        return None;
    }

    let rest = &line[hashes..];
    let content = rest.trim_start_matches([' ', '\t']);
    if content.len() == rest.len() {
        return None;
    }
    if content.trim().is_empty() {
        return None;
    }

    Some((hashes as u8, heading_text(content)))
}

/// Strips emphasis markers and surrounding whitespace from heading content.
pub fn heading_text(content: &str) -> String {
    content.replace("**", "").trim().to_string()
}

/// Extracts the outline using slugs without de-duplication.
///
/// Returns an empty vector when the document has no headings.
pub fn extract_headings(document: &str) -> Vec<HeadingEntry> {
    extract_headings_with(document, &mut Slugger::new(SlugMode::Preserve))
}

/// Extracts the outline, drawing slugs from `slugger`.
pub fn extract_headings_with(document: &str, slugger: &mut Slugger) -> Vec<HeadingEntry> {
    document
        .split('\n')
        .enumerate()
        .filter_map(|(index, line)| {
            let (level, text) = parse_heading_line(line)?;
            let slug = slugger.next_slug(&text);
            Some(HeadingEntry {
                level,
                text,
                slug,
                line: index + 1,
            })
        })
        .collect()
}

/// Reports every heading whose slug was already used by an earlier heading.
pub fn outline_diagnostics(outline: &[HeadingEntry]) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    let mut first_seen: HashMap<&str, usize> = HashMap::new();

    for entry in outline {
        match first_seen.get(entry.slug.as_str()) {
            Some(&first_line) => diagnostics.add_warning(ParseWarning::DuplicateSlug {
                slug: entry.slug.clone(),
                first: SourceLocation::new(first_line, 1),
                location: SourceLocation::new(entry.line, 1),
            }),
            None => {
                first_seen.insert(entry.slug.as_str(), entry.line);
            }
        }
    }

    diagnostics
}
