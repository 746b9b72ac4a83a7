use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How repeated slugs are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlugMode {
    /// Identical headings share one anchor id.
    #[default]
    Preserve,
    /// Repeats get `-1`, `-2`, ... suffixes in document order.
    Deduplicate,
}

/// Slug generator for one document outline.
///
/// Suffixes depend on every earlier heading, so the outline is the single
/// place slugs are drawn from; the heading renderer reuses them by line.
#[derive(Debug, Default)]
pub struct Slugger {
    mode: SlugMode,
    counts: HashMap<String, usize>,
}

impl Slugger {
    /// Creates a new slugger.
    pub fn new(mode: SlugMode) -> Self {
        Self {
            mode,
            counts: HashMap::new(),
        }
    }

    /// Returns the configured mode.
    pub fn mode(&self) -> SlugMode {
        self.mode
    }

    /// Generates the next slug for the given heading text.
    ///
    /// In `Deduplicate` mode the suffix keeps growing until the slug is
    /// unused, so a literal `a-1` heading cannot collide with a suffixed `a`.
    pub fn next_slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        if self.mode == SlugMode::Preserve {
            return base;
        }

        let mut slug = base.clone();
        while self.counts.contains_key(&slug) {
            let count = self.counts.entry(base.clone()).or_insert(0);
            *count += 1;
            slug = format!("{base}-{count}");
        }
        self.counts.insert(slug.clone(), 0);
        slug
    }
}

/// Derives an anchor id from heading text.
///
/// 1. Lowercase
/// 2. Drop every character that is not a letter, digit, whitespace or hyphen
///    (combining marks count as part of the letter they follow)
/// 3. Replace each run of whitespace with a single hyphen
///
/// Leading and trailing hyphens are kept; there is no uniqueness suffix.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_whitespace = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
                in_whitespace = true;
            }
        } else if ch.is_alphanumeric() || ch == '-' || is_combining_mark(ch) {
            slug.push(ch);
            in_whitespace = false;
        }
        // Punctuation is removed before whitespace runs are collapsed, so
        // "a , b" still yields a single hyphen.
    }

    slug
}

/// Whether `ch` is a combining mark (general categories Mn, Mc, Me) in one
/// of the blocks headings are likely to use.
///
/// Vowel signs and viramas in Indic scripts, Arabic harakat and Hebrew points
/// are not alphanumeric on their own; dropping them would change the word.
fn is_combining_mark(ch: char) -> bool {
    const MARKS: &[(u32, u32)] = &[
        (0x0300, 0x036F), // combining diacritical marks
        (0x0483, 0x0489), // Cyrillic
        (0x0591, 0x05BD), // Hebrew points
        (0x05BF, 0x05C7),
        (0x0610, 0x061A), // Arabic
        (0x064B, 0x065F),
        (0x0670, 0x0670),
        (0x06D6, 0x06ED),
        (0x0900, 0x0903), // Devanagari
        (0x093A, 0x094F),
        (0x0951, 0x0957),
        (0x0962, 0x0963),
        (0x0981, 0x0983), // Bengali
        (0x09BC, 0x09D7),
        (0x0A01, 0x0A03), // Gurmukhi
        (0x0A3C, 0x0A51),
        (0x0A81, 0x0A83), // Gujarati
        (0x0ABC, 0x0ACD),
        (0x0B82, 0x0B82), // Tamil
        (0x0BBE, 0x0BCD),
        (0x0C00, 0x0C04), // Telugu
        (0x0C3E, 0x0C56),
        (0x0E31, 0x0E31), // Thai
        (0x0E34, 0x0E3A),
        (0x0E47, 0x0E4E),
        (0x1AB0, 0x1AFF), // diacritical marks extended
        (0x1DC0, 0x1DFF), // diacritical marks supplement
        (0x20D0, 0x20FF), // marks for symbols
        (0x302A, 0x302F), // ideographic tone marks
        (0x3099, 0x309A), // kana voicing marks
        (0xFE20, 0xFE2F), // half marks
    ];

    let cp = u32::from(ch);
    MARKS.iter().any(|&(start, end)| (start..=end).contains(&cp))
}
