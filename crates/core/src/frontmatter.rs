use serde_json::Value as JsonValue;
use thiserror::Error;

/// Front matter split off a post.
#[derive(Debug)]
pub struct FrontmatterExtraction {
    /// Parsed front matter as a JSON object (empty when absent).
    pub value: JsonValue,
    /// Byte offset where the markdown body begins.
    pub body_start: usize,
}

impl FrontmatterExtraction {
    fn empty() -> Self {
        Self {
            value: JsonValue::Object(Default::default()),
            body_start: 0,
        }
    }

    /// Returns the markdown body of `input`.
    pub fn body<'a>(&self, input: &'a str) -> &'a str {
        &input[self.body_start..]
    }
}

/// Errors emitted while extracting front matter.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// Opening `---` without a closing one.
    #[error("Unterminated YAML frontmatter block: expected closing '---'")]
    Unterminated,
    /// YAML failed to parse.
    #[error("Frontmatter parse error: {0}")]
    Parse(String),
    /// Top-level YAML node was not a mapping.
    #[error("Frontmatter must be a YAML mapping at the top level")]
    InvalidRootType,
}

/// Extracts a leading `---` fenced YAML block from a post.
///
/// A byte order mark and blank lines before the opening fence are skipped.
pub fn extract_frontmatter(input: &str) -> Result<FrontmatterExtraction, FrontmatterError> {
    let offset = input.strip_prefix('\u{feff}').map_or(0, |_| '\u{feff}'.len_utf8());
    let mut lines = LineCursor::new(input, offset);

    let opened = loop {
        match lines.next_line() {
            Some(line) if line.text.trim().is_empty() => {}
            Some(line) => break is_fence(line.text),
            None => break false,
        }
    };
    if !opened {
        return Ok(FrontmatterExtraction::empty());
    }

    let block_start = lines.position();
    loop {
        let Some(line) = lines.next_line() else {
            return Err(FrontmatterError::Unterminated);
        };
        if is_fence(line.text) {
            let block = &input[block_start..line.start];
            let value = parse_block(block)?;
            return Ok(FrontmatterExtraction {
                value,
                body_start: lines.position(),
            });
        }
    }
}

fn parse_block(block: &str) -> Result<JsonValue, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(JsonValue::Object(Default::default()));
    }

    let yaml: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|err| FrontmatterError::Parse(err.to_string()))?;
    match serde_json::to_value(yaml).map_err(|err| FrontmatterError::Parse(err.to_string()))? {
        JsonValue::Null => Ok(JsonValue::Object(Default::default())),
        value @ JsonValue::Object(_) => Ok(value),
        _ => Err(FrontmatterError::InvalidRootType),
    }
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches('\r') == "---"
}

struct Line<'a> {
    text: &'a str,
    start: usize,
}

/// Walks `\n`-terminated lines while tracking byte offsets.
struct LineCursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    fn new(input: &'a str, pos: usize) -> Self {
        Self { input, pos }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn next_line(&mut self) -> Option<Line<'a>> {
        if self.pos >= self.input.len() {
            return None;
        }
        let start = self.pos;
        let rest = &self.input[start..];
        let (text, consumed) = match rest.find('\n') {
            Some(newline) => (&rest[..newline], newline + 1),
            None => (rest, rest.len()),
        };
        self.pos += consumed;
        Some(Line { text, start })
    }
}
