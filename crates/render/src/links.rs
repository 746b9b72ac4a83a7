//! In-page anchor checking for rendered HTML.

use folio_core::FolioError;
use lol_html::{RewriteStrSettings, element, rewrite_str};
use serde::Serialize;
use std::collections::BTreeSet;

/// Element ids and in-page link targets found in a rendered page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    /// Every `id` attribute, in document order.
    pub ids: Vec<String>,
    /// Every `href="#..."` fragment, in document order, without the `#`.
    pub fragments: Vec<String>,
    /// Fragments with no matching element id.
    pub broken: Vec<String>,
}

impl LinkReport {
    /// Whether every in-page link resolves.
    pub fn is_clean(&self) -> bool {
        self.broken.is_empty()
    }
}

/// Collects ids and fragment links from `html` and reports unresolved links.
pub fn check_anchor_links(html: &str) -> Result<LinkReport, FolioError> {
    let mut ids = Vec::new();
    let mut fragments = Vec::new();

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("*", |el| {
                if let Some(id) = el.get_attribute("id") {
                    ids.push(id);
                }
                if el.tag_name() == "a"
                    && let Some(href) = el.get_attribute("href")
                    && let Some(fragment) = href.strip_prefix('#')
                {
                    fragments.push(fragment.to_string());
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )
    .map_err(|err| FolioError::LinkCheck(err.to_string()))?;

    let known: BTreeSet<&str> = ids.iter().map(String::as_str).collect();
    let broken = fragments
        .iter()
        .filter(|fragment| !known.contains(fragment.as_str()))
        .cloned()
        .collect();

    Ok(LinkReport {
        ids,
        fragments,
        broken,
    })
}
