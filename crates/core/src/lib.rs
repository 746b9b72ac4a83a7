#![deny(missing_docs)]
//! Folio core: markdown segmentation, heading outlines, slugs and post metadata.

/// Core error and diagnostic types.
pub mod error;
/// YAML frontmatter extraction helpers.
pub mod frontmatter;
/// Heading outline extraction.
pub mod heading;
/// Table-of-contents placeholder scanning.
pub mod placeholder;
/// Post metadata and index queries.
pub mod posts;
/// Code/prose segmentation.
pub mod segment;
/// Slug generation utilities.
pub mod slug;

pub use error::{Diagnostics, FolioError, ParseWarning, SourceLocation};
pub use frontmatter::{FrontmatterError, FrontmatterExtraction, extract_frontmatter};
pub use heading::{
    HeadingEntry, MAX_OUTLINE_LEVEL, extract_headings, extract_headings_with, outline_diagnostics,
    parse_heading_line,
};
pub use placeholder::{
    DEFAULT_PLACEHOLDER, PlaceholderScan, locate_placeholder, locate_token, split_at_placeholders,
    strip_placeholders,
};
pub use posts::{Post, PostMeta, PostQuery, SortOrder, query_posts, tag_counts};
pub use segment::{Segment, Span, segment, segment_with_diagnostics};
pub use slug::{SlugMode, Slugger, slugify};
