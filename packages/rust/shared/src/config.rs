//! Project configuration for llmsgen.
//!
//! The config lives at `./llmsgen.toml` (or any file passed with `--config`).
//! CLI flags override config file values, which override defaults.
//! Relative paths are resolved against the working directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LlmsGenError, Result};
use crate::types::SectionList;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "llmsgen.toml";

// ---------------------------------------------------------------------------
// Config structs (matching llmsgen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level project config, deserialized from TOML (or JSON).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where and what to write.
    #[serde(default)]
    pub output: OutputConfig,

    /// Which documents to rewrite.
    #[serde(default)]
    pub content: ContentConfig,

    /// Frontmatter filtering applied before re-serialization.
    #[serde(default)]
    pub frontmatter: FrontmatterConfig,

    /// Sections of the generated llms.txt.
    #[serde(default)]
    pub llms: SectionList,

    /// Ordered body transforms.
    #[serde(default)]
    pub transforms: Vec<TransformSpec>,
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output root directory.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Whether rewritten content files are written.
    #[serde(default = "default_true")]
    pub markdown: bool,

    /// Whether `llms.txt` is written.
    #[serde(default = "default_true")]
    pub llms_txt: bool,

    /// Replacement extension for rewritten content files (e.g. `md`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    /// Leading content path component(s) dropped from output paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_prefix: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            markdown: true,
            llms_txt: true,
            extension: None,
            strip_prefix: None,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public")
}
fn default_true() -> bool {
    true
}

/// `[content]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Explicit content files, processed first and in the given order.
    #[serde(default)]
    pub paths: Vec<PathBuf>,

    /// Directories walked recursively for content files.
    #[serde(default)]
    pub dirs: Vec<PathBuf>,

    /// File extensions picked up while walking `dirs`.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            dirs: Vec::new(),
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["md".into(), "mdx".into()]
}

/// `[frontmatter]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrontmatterConfig {
    /// Keys to keep. `None` keeps every key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep: Option<Vec<String>>,

    /// Keys to remove (applied after `keep`).
    #[serde(default)]
    pub drop: Vec<String>,
}

impl FrontmatterConfig {
    /// True when the filter would leave metadata untouched.
    pub fn is_identity(&self) -> bool {
        self.keep.is_none() && self.drop.is_empty()
    }
}

/// `[[transforms]]` entry: one built-in body transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformSpec {
    /// Literal text replacement.
    Replace { from: String, to: String },
    /// Regex replacement; `$1`-style capture references are expanded.
    Regex { pattern: String, replacement: String },
    /// Shift every heading level by `by` (clamped to 1..=6).
    ShiftHeadings { by: i8 },
    /// Prepend `# <title>` from frontmatter when the body has no H1.
    TitleHeading {
        #[serde(default = "default_title_key")]
        key: String,
    },
    /// Parse and re-serialize the Markdown.
    Normalize,
    /// Collapse runs of blank lines.
    CollapseBlankLines,
    /// Ensure the body ends with exactly one newline.
    TrailingNewline,
}

fn default_title_key() -> String {
    "title".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load `llmsgen.toml` from the working directory. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = PathBuf::from(CONFIG_FILE_NAME);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the project config from a specific file path.
///
/// Files with a `.json` extension are parsed as JSON, everything else as TOML.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LlmsGenError::io(path, e))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&content).map_err(|e| {
            LlmsGenError::config(format!("failed to parse {}: {e}", path.display()))
        })
    } else {
        toml::from_str(&content).map_err(|e| {
            LlmsGenError::config(format!("failed to parse {}: {e}", path.display()))
        })
    }
}

/// Write a default config file into `dir`.
/// Returns the path to the created file. Refuses to overwrite an existing one.
pub fn init_config(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| LlmsGenError::io(dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(LlmsGenError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = to_toml(&AppConfig::default())?;
    std::fs::write(&path, content).map_err(|e| LlmsGenError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Render a config as pretty TOML.
pub fn to_toml(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| LlmsGenError::config(e.to_string()))
}
