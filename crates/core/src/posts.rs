//! Blog post metadata and the in-memory post index used by the blog page.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::frontmatter::{FrontmatterError, extract_frontmatter};

/// Front matter fields of a blog post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostMeta {
    /// Post title.
    pub title: String,
    /// Publication date, `YYYY-MM-DD`.
    pub date: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Short teaser shown on the index.
    pub summary: Option<String>,
    /// Drafts are hidden from the index unless asked for.
    pub draft: bool,
    /// `Some(false)` disables the table of contents for this post.
    pub toc: Option<bool>,
}

/// A post: its slug, metadata and markdown body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    /// URL slug (usually the file stem).
    pub slug: String,
    /// Parsed front matter.
    pub meta: PostMeta,
    /// Markdown body after the front matter.
    pub body: String,
}

impl Post {
    /// Splits `source` into front matter and body.
    pub fn from_source(slug: impl Into<String>, source: &str) -> Result<Self, FrontmatterError> {
        let extraction = extract_frontmatter(source)?;
        let meta = serde_json::from_value(extraction.value.clone())
            .map_err(|err| FrontmatterError::Parse(err.to_string()))?;
        Ok(Self {
            slug: slug.into(),
            meta,
            body: extraction.body(source).to_string(),
        })
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.meta.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    fn matches_search(&self, needle: &str) -> bool {
        let contains = |haystack: &str| haystack.to_lowercase().contains(needle);
        contains(&self.meta.title)
            || self.meta.summary.as_deref().is_some_and(contains)
            || self.meta.tags.iter().any(|t| contains(t))
    }
}

/// Ordering of index results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    /// Most recent first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
    /// Alphabetical by title, case-insensitive.
    Title,
}

/// Filters applied to the post index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostQuery {
    /// Only posts carrying this tag (case-insensitive).
    pub tag: Option<String>,
    /// Case-insensitive substring matched against title, summary and tags.
    pub search: Option<String>,
    /// Result ordering.
    pub sort: SortOrder,
    /// Include posts marked `draft`.
    pub include_drafts: bool,
}

/// Returns the posts matching `query`, ordered by `query.sort`.
///
/// Blank tag or search strings are treated as absent. Ties keep input order.
pub fn query_posts<'a>(posts: &'a [Post], query: &PostQuery) -> Vec<&'a Post> {
    let tag = query.tag.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let needle = query
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut matched: Vec<&Post> = posts
        .iter()
        .filter(|post| query.include_drafts || !post.meta.draft)
        .filter(|post| tag.is_none_or(|t| post.has_tag(t)))
        .filter(|post| needle.as_deref().is_none_or(|n| post.matches_search(n)))
        .collect();

    match query.sort {
        SortOrder::Newest => matched.sort_by(|a, b| b.meta.date.cmp(&a.meta.date)),
        SortOrder::Oldest => matched.sort_by(|a, b| a.meta.date.cmp(&b.meta.date)),
        SortOrder::Title => {
            matched.sort_by_cached_key(|post| post.meta.title.to_lowercase());
        }
    }
    matched
}

/// Counts published posts per tag, tags sorted alphabetically.
pub fn tag_counts(posts: &[Post]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for post in posts.iter().filter(|post| !post.meta.draft) {
        for tag in &post.meta.tags {
            *counts.entry(tag.to_lowercase()).or_insert(0) += 1;
        }
    }
    counts.into_iter().collect()
}
