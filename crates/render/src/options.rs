use folio_core::{DEFAULT_PLACEHOLDER, FolioError, PostMeta, SlugMode};
use serde::{Deserialize, Serialize};

/// What to do with a non-empty outline when the document has no placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TocFallback {
    /// Render the table of contents once, before all content.
    #[default]
    Prepend,
    /// Render no table of contents.
    Omit,
}

/// Rendering options for a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    /// Whether the page is shown with the light color scheme.
    /// Selects the code block theme.
    #[serde(default)]
    pub light_mode: bool,
    /// Literal marker replaced by the table of contents.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    /// Optional heading shown above the table of contents.
    #[serde(default = "default_toc_title")]
    pub toc_title: Option<String>,
    /// Behavior when no placeholder is present.
    #[serde(default)]
    pub toc_fallback: TocFallback,
    /// Wrap heading text in a link to its own anchor.
    #[serde(default)]
    pub heading_autolinks: bool,
    /// Slug collision handling, shared by the outline and the headings.
    #[serde(default)]
    pub slug_mode: SlugMode,
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

fn default_toc_title() -> Option<String> {
    Some("Table of Contents".to_string())
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            light_mode: false,
            placeholder: default_placeholder(),
            toc_title: default_toc_title(),
            toc_fallback: TocFallback::default(),
            heading_autolinks: false,
            slug_mode: SlugMode::default(),
        }
    }
}

impl RenderOptions {
    /// Parses options from a JSON object; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, FolioError> {
        serde_json::from_str(json).map_err(|err| FolioError::Config(err.to_string()))
    }

    /// Applies per-post overrides from front matter.
    pub fn for_post(&self, meta: &PostMeta) -> Self {
        let mut options = self.clone();
        if meta.toc == Some(false) {
            options.toc_fallback = TocFallback::Omit;
        }
        options
    }

    /// Code block theme matching the color scheme.
    pub fn code_theme(&self) -> CodeTheme {
        if self.light_mode {
            CodeTheme::Light
        } else {
            CodeTheme::Dark
        }
    }
}

/// Syntax highlighting theme requested for code blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CodeTheme {
    /// Theme for the light color scheme.
    Light,
    /// Theme for the dark color scheme.
    Dark,
}

impl CodeTheme {
    /// CSS class applied to the `<pre>` element.
    pub fn class_name(self) -> &'static str {
        match self {
            CodeTheme::Light => "code-light",
            CodeTheme::Dark => "code-dark",
        }
    }
}
