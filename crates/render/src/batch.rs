//! Parallel rendering of many posts.

use folio_core::Post;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::options::RenderOptions;
use crate::plan::{RenderPlan, build_plan};

/// A single post source to render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchInput {
    /// Post identifier (typically the file stem).
    pub id: String,
    /// Markdown source including front matter.
    pub source: String,
}

/// Result for a single post in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    /// Identifier matching the input.
    pub id: String,
    /// Parsed post (present on success).
    pub post: Option<Post>,
    /// Render plan (present on success).
    pub plan: Option<RenderPlan>,
    /// Error message (present on failure).
    pub error: Option<String>,
}

/// Results of a batch, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    /// One entry per input.
    pub results: Vec<BatchResult>,
    /// Number of posts rendered successfully.
    pub succeeded: usize,
    /// Number of posts that failed.
    pub failed: usize,
}

/// Renders every input on the rayon pool. A failing post does not stop the rest.
pub fn render_batch(inputs: &[BatchInput], options: &RenderOptions) -> BatchOutcome {
    let results: Vec<BatchResult> = inputs
        .par_iter()
        .map(|input| render_one(input, options))
        .collect();

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        log::warn!("batch: {} of {} posts failed", failed, results.len());
    }

    BatchOutcome {
        succeeded: results.len() - failed,
        failed,
        results,
    }
}

fn render_one(input: &BatchInput, options: &RenderOptions) -> BatchResult {
    let rendered = Post::from_source(input.id.clone(), &input.source)
        .map_err(folio_core::FolioError::from)
        .and_then(|post| {
            let plan = build_plan(&post.body, &options.for_post(&post.meta))?;
            Ok((post, plan))
        });

    match rendered {
        Ok((post, plan)) => BatchResult {
            id: input.id.clone(),
            post: Some(post),
            plan: Some(plan),
            error: None,
        },
        Err(err) => BatchResult {
            id: input.id.clone(),
            post: None,
            plan: None,
            error: Some(err.to_string()),
        },
    }
}
