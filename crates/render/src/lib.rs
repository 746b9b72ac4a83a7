#![deny(missing_docs)]
//! Folio rendering: heading anchors, prose HTML, tables of contents and the
//! render plan handed to the page shell.

/// Parallel rendering of many posts.
pub mod batch;
/// Heading rendering with anchor ids.
pub mod heading;
/// In-page anchor checking.
pub mod links;
/// Render options.
pub mod options;
/// Render plan composition.
pub mod plan;
/// Prose rendering through markdown-rs.
pub mod prose;
/// Table of contents rendering and active-section tracking.
pub mod toc;

pub use batch::{BatchInput, BatchOutcome, BatchResult, render_batch};
pub use heading::{HeadingRenderer, render_heading};
pub use links::{LinkReport, check_anchor_links};
pub use options::{CodeTheme, RenderOptions, TocFallback};
pub use plan::{RenderBlock, RenderPlan, build_plan};
pub use prose::{ProseOrigin, ProsePart, render_prose};
pub use toc::{AnchorOffset, DEFAULT_ACTIVE_THRESHOLD, active_section, render_toc};
