//! Built-in body transforms.
//!
//! Text passes work on the raw string; Markdown-aware passes parse with
//! `pulldown-cmark` and write back with `pulldown-cmark-to-cmark`.

use std::sync::LazyLock;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use pulldown_cmark_to_cmark::cmark;
use regex::Regex;
use serde_yaml::Value;

use llmsgen_shared::{LlmsGenError, Result, TransformSpec};

use crate::transform::{Transform, TransformChain, TransformContext};

/// Turn configured transform specs into a runnable chain, preserving order.
pub fn build_chain(specs: &[TransformSpec]) -> Result<TransformChain> {
    let mut chain = TransformChain::new();

    for spec in specs {
        match spec {
            TransformSpec::Replace { from, to } => chain.push(ReplaceText::new(from, to)),
            TransformSpec::Regex {
                pattern,
                replacement,
            } => chain.push(RegexReplace::new(pattern, replacement)?),
            TransformSpec::ShiftHeadings { by } => chain.push(ShiftHeadings { by: *by }),
            TransformSpec::TitleHeading { key } => chain.push(TitleHeading { key: key.clone() }),
            TransformSpec::Normalize => chain.push(NormalizeMarkdown),
            TransformSpec::CollapseBlankLines => chain.push(CollapseBlankLines),
            TransformSpec::TrailingNewline => chain.push(TrailingNewline),
        }
    }

    Ok(chain)
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Serialize parsed events back to Markdown text.
fn render<'a>(step: &str, events: impl Iterator<Item = Event<'a>>) -> Result<String> {
    let mut out = String::new();
    cmark(events, &mut out)
        .map_err(|e| LlmsGenError::transform(step, format!("markdown serialization failed: {e}")))?;
    Ok(out)
}

// ---------------------------------------------------------------------------
// Text passes
// ---------------------------------------------------------------------------

/// Literal find-and-replace.
#[derive(Debug, Clone)]
pub struct ReplaceText {
    from: String,
    to: String,
}

impl ReplaceText {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Transform for ReplaceText {
    fn name(&self) -> &str {
        "replace"
    }

    fn apply(&self, body: &str, _ctx: &TransformContext<'_>) -> Result<String> {
        if self.from.is_empty() {
            return Ok(body.to_string());
        }
        Ok(body.replace(&self.from, &self.to))
    }
}

/// Regex find-and-replace with `$name` / `$1` expansion.
#[derive(Debug, Clone)]
pub struct RegexReplace {
    pattern: Regex,
    replacement: String,
}

impl RegexReplace {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| LlmsGenError::config(format!("invalid regex '{pattern}': {e}")))?;
        Ok(Self {
            pattern,
            replacement: replacement.into(),
        })
    }
}

impl Transform for RegexReplace {
    fn name(&self) -> &str {
        "regex"
    }

    fn apply(&self, body: &str, _ctx: &TransformContext<'_>) -> Result<String> {
        Ok(self
            .pattern
            .replace_all(body, self.replacement.as_str())
            .into_owned())
    }
}

/// Collapse runs of two or more blank lines into one.
#[derive(Debug, Clone, Copy)]
pub struct CollapseBlankLines;

impl Transform for CollapseBlankLines {
    fn name(&self) -> &str {
        "collapse_blank_lines"
    }

    fn apply(&self, body: &str, _ctx: &TransformContext<'_>) -> Result<String> {
        static MULTI_BLANK_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\n[ \t]*(?:\n[ \t]*)+\n").expect("valid regex"));

        Ok(MULTI_BLANK_RE.replace_all(body, "\n\n").into_owned())
    }
}

/// Trim trailing whitespace and end with exactly one newline.
#[derive(Debug, Clone, Copy)]
pub struct TrailingNewline;

impl Transform for TrailingNewline {
    fn name(&self) -> &str {
        "trailing_newline"
    }

    fn apply(&self, body: &str, _ctx: &TransformContext<'_>) -> Result<String> {
        let trimmed = body.trim_end();
        if trimmed.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("{trimmed}\n"))
    }
}

// ---------------------------------------------------------------------------
// Markdown passes
// ---------------------------------------------------------------------------

/// Parse and re-serialize, normalizing list markers, emphasis, and spacing.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeMarkdown;

impl Transform for NormalizeMarkdown {
    fn name(&self) -> &str {
        "normalize"
    }

    fn apply(&self, body: &str, _ctx: &TransformContext<'_>) -> Result<String> {
        render(self.name(), Parser::new_ext(body, parser_options()))
    }
}

/// Shift every heading by `by` levels, clamped to H1..=H6.
#[derive(Debug, Clone, Copy)]
pub struct ShiftHeadings {
    pub by: i8,
}

fn shift_level(level: HeadingLevel, by: i8) -> HeadingLevel {
    let shifted = (level as i16 + i16::from(by)).clamp(1, 6);
    HeadingLevel::try_from(shifted as usize).unwrap_or(level)
}

impl Transform for ShiftHeadings {
    fn name(&self) -> &str {
        "shift_headings"
    }

    fn apply(&self, body: &str, _ctx: &TransformContext<'_>) -> Result<String> {
        if self.by == 0 {
            return Ok(body.to_string());
        }

        let by = self.by;
        let events = Parser::new_ext(body, parser_options()).map(|event| match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => Event::Start(Tag::Heading {
                level: shift_level(level, by),
                id,
                classes,
                attrs,
            }),
            Event::End(TagEnd::Heading(level)) => {
                Event::End(TagEnd::Heading(shift_level(level, by)))
            }
            other => other,
        });

        render(self.name(), events)
    }
}

/// Prepend `# <title>` taken from the original frontmatter when the body has no H1.
#[derive(Debug, Clone)]
pub struct TitleHeading {
    pub key: String,
}

impl Default for TitleHeading {
    fn default() -> Self {
        Self {
            key: "title".into(),
        }
    }
}

fn has_h1(body: &str) -> bool {
    Parser::new_ext(body, parser_options()).any(|event| {
        matches!(
            event,
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            })
        )
    })
}

impl Transform for TitleHeading {
    fn name(&self) -> &str {
        "title_heading"
    }

    fn apply(&self, body: &str, ctx: &TransformContext<'_>) -> Result<String> {
        let title = match ctx.frontmatter.get(self.key.as_str()) {
            Some(Value::String(title)) if !title.trim().is_empty() => title.trim(),
            _ => return Ok(body.to_string()),
        };

        if has_h1(body) {
            return Ok(body.to_string());
        }

        let body = body.trim_start_matches(['\r', '\n']);
        Ok(format!("# {title}\n\n{body}"))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use llmsgen_shared::Metadata;

    fn run(step: &dyn Transform, body: &str) -> String {
        let meta = Metadata::new();
        let ctx = TransformContext {
            frontmatter: &meta,
            path: Path::new("doc.md"),
        };
        step.apply(body, &ctx).unwrap()
    }

    fn run_with_title(step: &dyn Transform, body: &str, title: &str) -> String {
        let mut meta = Metadata::new();
        meta.insert(Value::from("title"), Value::from(title));
        let ctx = TransformContext {
            frontmatter: &meta,
            path: Path::new("doc.md"),
        };
        step.apply(body, &ctx).unwrap()
    }

    #[test]
    fn replace_text() {
        let step = ReplaceText::new("TRANSFORM_THIS", "NICE_TRANSFORMATION");
        assert_eq!(run(&step, "a TRANSFORM_THIS b"), "a NICE_TRANSFORMATION b");
        assert_eq!(run(&ReplaceText::new("", "x"), "abc"), "abc");
    }

    #[test]
    fn regex_replace_expands_captures() {
        let step = RegexReplace::new(r"\]\((/[^)]*)\)", "](https://example.com$1)").unwrap();
        assert_eq!(
            run(&step, "see [intro](/docs/intro)"),
            "see [intro](https://example.com/docs/intro)"
        );
    }

    #[test]
    fn invalid_regex_is_config_error() {
        let err = RegexReplace::new("(unclosed", "").unwrap_err();
        assert!(matches!(err, LlmsGenError::Config { .. }));
    }

    #[test]
    fn collapse_blank_lines() {
        assert_eq!(run(&CollapseBlankLines, "a\n\n\n\nb\n\nc"), "a\n\nb\n\nc");
        assert_eq!(run(&CollapseBlankLines, "a\n \n\t\n\nb"), "a\n\nb");
    }

    #[test]
    fn trailing_newline() {
        assert_eq!(run(&TrailingNewline, "text  \n\n\n"), "text\n");
        assert_eq!(run(&TrailingNewline, "text"), "text\n");
        assert_eq!(run(&TrailingNewline, "  \n"), "");
    }

    #[test]
    fn shift_headings_down() {
        let out = run(&ShiftHeadings { by: 1 }, "# Title\n\n## Sub\n\ntext\n");
        assert!(out.contains("## Title"));
        assert!(out.contains("### Sub"));
        assert!(!out.lines().any(|l| l == "# Title"));
    }

    #[test]
    fn shift_headings_clamps() {
        assert_eq!(shift_level(HeadingLevel::H6, 2), HeadingLevel::H6);
        assert_eq!(shift_level(HeadingLevel::H2, -3), HeadingLevel::H1);
        assert_eq!(run(&ShiftHeadings { by: 0 }, "# Same"), "# Same");
    }

    #[test]
    fn normalize_keeps_content() {
        let out = run(&NormalizeMarkdown, "# Test\n\nSome *text*.\n\n* one\n* two\n");
        assert!(out.contains("# Test"));
        assert!(out.contains("text"));
        assert!(out.contains("one"));
        assert!(out.contains("two"));
    }

    #[test]
    fn title_heading_added_when_missing() {
        let out = run_with_title(&TitleHeading::default(), "\nIntro text.\n", "Guide");
        assert_eq!(out, "# Guide\n\nIntro text.\n");
    }

    #[test]
    fn title_heading_skipped_when_present_or_absent() {
        let body = "# Already\n\ntext\n";
        assert_eq!(run_with_title(&TitleHeading::default(), body, "Guide"), body);
        assert_eq!(run(&TitleHeading::default(), "text\n"), "text\n");
    }

    #[test]
    fn build_chain_preserves_order() {
        let specs = vec![
            TransformSpec::Replace {
                from: "X".into(),
                to: "Y".into(),
            },
            TransformSpec::Regex {
                pattern: "Y".into(),
                replacement: "Z".into(),
            },
            TransformSpec::TrailingNewline,
        ];
        let chain = build_chain(&specs).unwrap();
        assert_eq!(chain.names(), ["replace", "regex", "trailing_newline"]);

        let meta = Metadata::new();
        let ctx = TransformContext {
            frontmatter: &meta,
            path: Path::new("doc.md"),
        };
        assert_eq!(chain.run("X", &ctx).unwrap(), "Z\n");
    }

    #[test]
    fn build_chain_rejects_bad_regex() {
        let specs = vec![TransformSpec::Regex {
            pattern: "[".into(),
            replacement: String::new(),
        }];
        assert!(build_chain(&specs).is_err());
    }
}
