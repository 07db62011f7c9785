//! Leading YAML frontmatter: locate, parse, strip, and splice back.
//!
//! A block is a `---` line, any number of YAML lines, and a closing `---`
//! line, at the very start of the document (leading whitespace allowed).
//! Nothing after the closing marker is inspected.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Value;

use llmsgen_shared::{FrontmatterConfig, LlmsGenError, Metadata, Result};

/// The marker line opening and closing a frontmatter block.
pub const MARKER: &str = "---";

// The inner capture keeps its final line break; block scalars depend on it.
static FRONTMATTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A\s*---[ \t]*\r?\n(?:((?s:.*?)\r?\n))?---[ \t]*(?:\r?\n|\z)")
        .expect("valid regex")
});

static LEADING_BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A(?:[ \t]*\r?\n)+").expect("valid regex"));

/// Byte range of the whole block (markers included) and its inner YAML text.
fn locate(raw: &str) -> Option<(Range<usize>, &str)> {
    let caps = FRONTMATTER_RE.captures(raw)?;
    let whole = caps.get(0)?;
    let inner = caps.get(1).map_or("", |m| m.as_str());
    Some((whole.range(), inner))
}

/// Parse the document's frontmatter. A document without a block yields an empty mapping.
pub fn extract(raw: &str) -> Result<Metadata> {
    match locate(raw) {
        Some((_, inner)) => parse_block(inner),
        None => Ok(Metadata::new()),
    }
}

/// Parse the inner text of a block into a mapping.
fn parse_block(inner: &str) -> Result<Metadata> {
    if inner.trim().is_empty() {
        return Ok(Metadata::new());
    }

    let value: Value =
        serde_yaml::from_str(inner).map_err(|e| LlmsGenError::parse(e.to_string()))?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Metadata::new()),
        other => Err(LlmsGenError::parse(format!(
            "frontmatter must be a mapping, found {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// The document with its frontmatter block removed. Unchanged if there is none.
pub fn strip(raw: &str) -> &str {
    match locate(raw) {
        Some((range, _)) => &raw[range.end..],
        None => raw,
    }
}

/// Render metadata as a marker-wrapped block, ending with the closing marker line.
pub fn render(metadata: &Metadata) -> Result<String> {
    let yaml = serde_yaml::to_string(metadata).map_err(|e| LlmsGenError::Serialize {
        message: e.to_string(),
    })?;
    Ok(format!("{MARKER}\n{yaml}{MARKER}\n"))
}

/// Prepend a freshly rendered block to `body`, separated by exactly one blank line.
pub fn compose(metadata: &Metadata, body: &str) -> Result<String> {
    let block = render(metadata)?;
    let body = match LEADING_BLANK_LINES_RE.find(body) {
        Some(blank) => &body[blank.end()..],
        None => body,
    };
    Ok(format!("{block}\n{body}"))
}

/// Replace the document's block with `metadata`, or prepend one if it has none.
pub fn replace(raw: &str, metadata: &Metadata) -> Result<String> {
    compose(metadata, strip(raw))
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Whitelist/blacklist remap of frontmatter keys.
#[derive(Debug, Clone, Default)]
pub struct FrontmatterFilter {
    keep: Option<Vec<String>>,
    drop: Vec<String>,
}

impl FrontmatterFilter {
    pub fn new(keep: Option<Vec<String>>, drop: Vec<String>) -> Self {
        Self { keep, drop }
    }

    /// Build a new mapping from `metadata`; the input is never modified.
    ///
    /// With a `keep` list, keys come out in `keep` order and missing keys are
    /// skipped. Otherwise source order is preserved.
    pub fn apply(&self, metadata: &Metadata) -> Metadata {
        let selected: Metadata = match &self.keep {
            Some(keep) => keep
                .iter()
                .filter_map(|key| {
                    metadata
                        .get(key.as_str())
                        .map(|value| (Value::String(key.clone()), value.clone()))
                })
                .collect(),
            None => metadata.clone(),
        };

        selected
            .into_iter()
            .filter(|(key, _)| match key.as_str() {
                Some(key) => !self.drop.iter().any(|d| d == key),
                None => true,
            })
            .collect()
    }
}

impl From<&FrontmatterConfig> for FrontmatterFilter {
    fn from(config: &FrontmatterConfig) -> Self {
        Self::new(config.keep.clone(), config.drop.clone())
    }
}
