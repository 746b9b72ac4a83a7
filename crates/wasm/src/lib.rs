use folio_core::{
    DEFAULT_PLACEHOLDER, HeadingEntry, Post, PostQuery, SlugMode, extract_frontmatter,
    extract_headings, locate_token, query_posts, segment, tag_counts,
};
use folio_render::{
    AnchorOffset, DEFAULT_ACTIVE_THRESHOLD, RenderOptions, RenderPlan, TocFallback,
    active_section, build_plan,
};
use serde::{Deserialize, Deserializer, Serialize};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

// ============================================================================
// Render Config
// ============================================================================

/// Configuration accepted by `render_document`.
///
/// Every field is optional; unknown or malformed objects fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WasmRenderConfig {
    #[serde(default, alias = "lightMode")]
    pub light_mode: Option<bool>,
    #[serde(default)]
    pub placeholder: Option<String>,
    /// `None` keeps the default title; `Some(None)` (JS `null`) hides it.
    #[serde(default, alias = "tocTitle", deserialize_with = "present")]
    pub toc_title: Option<Option<String>>,
    #[serde(default, alias = "tocFallback")]
    pub toc_fallback: Option<TocFallback>,
    #[serde(default, alias = "headingAutolinks")]
    pub heading_autolinks: Option<bool>,
    #[serde(default, alias = "slugMode")]
    pub slug_mode: Option<SlugMode>,
}

/// Marks a field as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn parse_config(config: JsValue) -> WasmRenderConfig {
    if config.is_undefined() || config.is_null() {
        return WasmRenderConfig::default();
    }
    serde_wasm_bindgen::from_value(config).unwrap_or_default()
}

fn build_render_options(cfg: &WasmRenderConfig) -> RenderOptions {
    let defaults = RenderOptions::default();
    RenderOptions {
        light_mode: cfg.light_mode.unwrap_or(defaults.light_mode),
        placeholder: cfg.placeholder.clone().unwrap_or(defaults.placeholder),
        toc_title: cfg.toc_title.clone().unwrap_or(defaults.toc_title),
        toc_fallback: cfg.toc_fallback.unwrap_or(defaults.toc_fallback),
        heading_autolinks: cfg.heading_autolinks.unwrap_or(defaults.heading_autolinks),
        slug_mode: cfg.slug_mode.unwrap_or(defaults.slug_mode),
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

// ============================================================================
// Document API
// ============================================================================

/// Result of rendering one document.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResult {
    /// Front matter as a JSON string (`"{}"` when absent).
    pub frontmatter_json: String,
    /// The render plan for the body.
    pub plan: RenderPlan,
}

/// Renders a markdown document (front matter allowed) into a render plan.
///
/// A front matter `toc: false` suppresses the fallback table of contents.
#[wasm_bindgen]
pub fn render_document(source: &str, config: JsValue) -> Result<JsValue, JsError> {
    let cfg = parse_config(config);
    let options = build_render_options(&cfg);

    let extraction = extract_frontmatter(source)
        .map_err(|e| JsError::new(&format!("Frontmatter error: {}", e)))?;
    let frontmatter_json =
        serde_json::to_string(&extraction.value).unwrap_or_else(|_| "{}".to_string());
    let options = match serde_json::from_value(extraction.value.clone()) {
        Ok(meta) => options.for_post(&meta),
        Err(_) => options,
    };

    let plan = build_plan(extraction.body(source), &options)
        .map_err(|e| JsError::new(&format!("Render error: {}", e)))?;

    to_js(&RenderResult {
        frontmatter_json,
        plan,
    })
}

/// Splits a document into `{type: "code" | "prose", ...}` segments.
#[wasm_bindgen(js_name = segment_document)]
pub fn segment_document(source: &str) -> Result<JsValue, JsError> {
    to_js(&segment(source))
}

/// Returns the heading outline `[{level, text, slug, line}]`.
#[wasm_bindgen(js_name = extract_outline)]
pub fn extract_outline(source: &str) -> Result<JsValue, JsError> {
    to_js(&extract_headings(source))
}

/// Reports placeholder occurrences; `token` defaults to `[[toc]]`.
#[wasm_bindgen(js_name = locate_placeholders)]
pub fn locate_placeholders(source: &str, token: Option<String>) -> Result<JsValue, JsError> {
    let token = token.as_deref().unwrap_or(DEFAULT_PLACEHOLDER);
    to_js(&locate_token(source, token))
}

/// Picks the outline entry to highlight for the measured anchor offsets.
///
/// Returns `undefined` when nothing is active yet.
#[wasm_bindgen(js_name = active_heading)]
pub fn active_heading(
    outline: JsValue,
    offsets: JsValue,
    threshold: Option<f64>,
) -> Result<JsValue, JsError> {
    let outline: Vec<OutlineEntry> = serde_wasm_bindgen::from_value(outline)
        .map_err(|e| JsError::new(&format!("Invalid outline: {}", e)))?;
    let outline: Vec<HeadingEntry> = outline.into_iter().map(HeadingEntry::from).collect();
    let offsets: Vec<AnchorOffset> = serde_wasm_bindgen::from_value(offsets)
        .map_err(|e| JsError::new(&format!("Invalid offsets: {}", e)))?;

    match active_section(&outline, &offsets, threshold.unwrap_or(DEFAULT_ACTIVE_THRESHOLD)) {
        Some(entry) => to_js(entry),
        None => Ok(JsValue::UNDEFINED),
    }
}

/// Outline entry as sent back from JavaScript.
#[derive(Deserialize)]
struct OutlineEntry {
    level: u8,
    text: String,
    slug: String,
    #[serde(default)]
    line: usize,
}

impl From<OutlineEntry> for HeadingEntry {
    fn from(entry: OutlineEntry) -> Self {
        HeadingEntry {
            level: entry.level,
            text: entry.text,
            slug: entry.slug,
            line: entry.line,
        }
    }
}

// ============================================================================
// Post Index API
// ============================================================================

/// A post source handed over by the page shell.
#[derive(Deserialize)]
struct PostSource {
    slug: String,
    source: String,
}

/// Blog index page data.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostIndex {
    /// Matching posts, without bodies.
    pub posts: Vec<PostSummary>,
    /// `[tag, count]` pairs for the tag filter.
    pub tags: Vec<(String, usize)>,
    /// Slugs of posts whose front matter failed to parse.
    pub skipped: Vec<String>,
}

/// A post as listed on the index.
#[derive(Serialize)]
pub struct PostSummary {
    /// URL slug.
    pub slug: String,
    /// Post title.
    pub title: String,
    /// Publication date.
    pub date: String,
    /// Tags.
    pub tags: Vec<String>,
    /// Teaser text.
    pub summary: Option<String>,
}

/// Filters, searches and sorts the blog index.
///
/// `sources` is `[{slug, source}]`; `query` is `{tag?, search?, sort?, includeDrafts?}`.
#[wasm_bindgen(js_name = query_post_index)]
pub fn query_post_index(sources: JsValue, query: JsValue) -> Result<JsValue, JsError> {
    let sources: Vec<PostSource> = serde_wasm_bindgen::from_value(sources)
        .map_err(|e| JsError::new(&format!("Invalid post list: {}", e)))?;
    let query: PostQuery = if query.is_undefined() || query.is_null() {
        PostQuery::default()
    } else {
        serde_wasm_bindgen::from_value(query)
            .map_err(|e| JsError::new(&format!("Invalid query: {}", e)))?
    };

    let mut posts = Vec::with_capacity(sources.len());
    let mut skipped = Vec::new();
    for PostSource { slug, source } in sources {
        match Post::from_source(slug.clone(), &source) {
            Ok(post) => posts.push(post),
            Err(_) => skipped.push(slug),
        }
    }

    let index = PostIndex {
        posts: query_posts(&posts, &query)
            .into_iter()
            .map(|post| PostSummary {
                slug: post.slug.clone(),
                title: post.meta.title.clone(),
                date: post.meta.date.clone(),
                tags: post.meta.tags.clone(),
                summary: post.meta.summary.clone(),
            })
            .collect(),
        tags: tag_counts(&posts),
        skipped,
    };
    to_js(&index)
}
