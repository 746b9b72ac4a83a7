use serde::Serialize;

/// Marker that asks for the table of contents at its position.
pub const DEFAULT_PLACEHOLDER: &str = "[[toc]]";

/// Occurrences of a placeholder token in a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderScan {
    /// Token that was searched for.
    pub token: String,
    /// Byte offset of every non-overlapping occurrence, ascending.
    pub positions: Vec<usize>,
}

impl PlaceholderScan {
    /// Number of occurrences.
    pub fn count(&self) -> usize {
        self.positions.len()
    }

    /// Whether the token occurs at all.
    pub fn is_present(&self) -> bool {
        !self.positions.is_empty()
    }
}

/// Scans `text` for the default placeholder.
pub fn locate_placeholder(text: &str) -> PlaceholderScan {
    locate_token(text, DEFAULT_PLACEHOLDER)
}

/// Scans `text` for `token`. An empty token never matches.
pub fn locate_token(text: &str, token: &str) -> PlaceholderScan {
    let positions = if token.is_empty() {
        Vec::new()
    } else {
        text.match_indices(token).map(|(pos, _)| pos).collect()
    };
    PlaceholderScan {
        token: token.to_string(),
        positions,
    }
}

/// Splits `text` at every occurrence of `token`, dropping the token.
///
/// Always yields `count + 1` pieces; pieces may be empty.
pub fn split_at_placeholders<'a>(text: &'a str, token: &str) -> Vec<&'a str> {
    if token.is_empty() {
        return vec![text];
    }
    text.split(token).collect()
}

/// Removes every occurrence of `token` from `text`.
pub fn strip_placeholders(text: &str, token: &str) -> String {
    if token.is_empty() {
        return text.to_string();
    }
    text.replace(token, "")
}
