//! Error types for llmsgen.
//!
//! Library crates use [`LlmsGenError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::{Path, PathBuf};

/// Top-level error type for all llmsgen operations.
///
/// Every variant is fatal for the batch it occurs in: one bad document
/// fails the whole run.
#[derive(Debug, thiserror::Error)]
pub enum LlmsGenError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// A content file could not be read.
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The frontmatter block is not valid YAML, or not a mapping.
    #[error("metadata parse error: {message}")]
    MetadataParse { message: String },

    /// A transform step failed.
    #[error("transform '{step}' failed: {message}")]
    Transform { step: String, message: String },

    /// A destination directory or file could not be written.
    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Metadata could not be rendered back to YAML.
    #[error("serialize error: {message}")]
    Serialize { message: String },

    /// Any other filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LlmsGenError>;

impl LlmsGenError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a metadata parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::MetadataParse {
            message: msg.into(),
        }
    }

    /// Create a transform error for the named step.
    pub fn transform(step: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transform {
            step: step.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Prefix per-document errors with the document they came from.
    ///
    /// Path-carrying variants are returned unchanged.
    pub fn in_document(self, path: &Path) -> Self {
        match self {
            Self::MetadataParse { message } => Self::MetadataParse {
                message: format!("{}: {message}", path.display()),
            },
            Self::Transform { step, message } => Self::Transform {
                step,
                message: format!("{}: {message}", path.display()),
            },
            Self::Serialize { message } => Self::Serialize {
                message: format!("{}: {message}", path.display()),
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = LlmsGenError::config("unknown transform kind");
        assert_eq!(err.to_string(), "config error: unknown transform kind");

        let err = LlmsGenError::transform("regex", "bad capture");
        assert_eq!(err.to_string(), "transform 'regex' failed: bad capture");
    }

    #[test]
    fn in_document_prefixes_message() {
        let err = LlmsGenError::parse("mapping values are not allowed")
            .in_document(Path::new("docs/intro.mdx"));
        assert!(err.to_string().contains("docs/intro.mdx: mapping values"));

        let err = LlmsGenError::io("a.md", std::io::Error::other("boom"))
            .in_document(Path::new("b.md"));
        assert!(err.to_string().contains("a.md"));
        assert!(!err.to_string().contains("b.md"));
    }
}
