//! Core pipeline for llmsgen.
//!
//! This crate ties frontmatter handling and body transforms together into
//! the two outputs: rewritten content files and the aggregate llms.txt.
//! All filesystem access goes through [`fs::FileSystem`] and all output
//! locations come from an [`router::OutputRouter`].

pub mod content;
pub mod fs;
pub mod llms_txt;
pub mod pipeline;
pub mod rewriter;
pub mod router;

pub use content::resolve_content;
pub use fs::{FileSystem, FsCall, MemoryFs, StdFs};
pub use llms_txt::{generate_llms_txt, render_llms_txt};
pub use pipeline::{GenerateOptions, GenerateReport, ProgressReporter, SilentProgress, generate};
pub use rewriter::{RewriteResult, generate_markdown_files, rewrite_document};
pub use router::{DirRouter, OutputRouter};
