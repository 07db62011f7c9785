//! End-to-end `generate` pipeline: rewrite content files, then write llms.txt.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use llmsgen_markdown::TransformChain;
use llmsgen_shared::{ContentDescriptor, Metadata, Result, SectionList};

use crate::fs::FileSystem;
use crate::llms_txt::generate_llms_txt;
use crate::rewriter::generate_markdown_files;
use crate::router::OutputRouter;

/// Everything one generation run needs.
///
/// Collaborators are borrowed; the caller owns the router, filesystem,
/// transforms, and remap function.
pub struct GenerateOptions<'a> {
    /// Documents to rewrite, in processing order.
    pub content: &'a [ContentDescriptor],
    /// Sections of the llms.txt document.
    pub sections: &'a SectionList,
    /// Output path per document id; `None` skips it.
    pub router: &'a dyn OutputRouter,
    /// Filesystem used for every read and write.
    pub fs: &'a dyn FileSystem,
    /// Body transforms, applied in order.
    pub transforms: Option<&'a TransformChain>,
    /// Frontmatter remap applied before re-serialization (identity when `None`).
    pub format_frontmatter: Option<&'a dyn Fn(&Metadata) -> Metadata>,
}

impl<'a> GenerateOptions<'a> {
    /// Options with no transforms and identity frontmatter.
    pub fn new(
        content: &'a [ContentDescriptor],
        sections: &'a SectionList,
        router: &'a dyn OutputRouter,
        fs: &'a dyn FileSystem,
    ) -> Self {
        Self {
            content,
            sections,
            router,
            fs,
            transforms: None,
            format_frontmatter: None,
        }
    }
}

/// Result of a full generation run.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    /// Rewritten content files, in input order.
    pub written: Vec<PathBuf>,
    /// Content descriptors the router skipped.
    pub skipped: usize,
    /// Where llms.txt was written, if it was.
    pub llms_txt: Option<PathBuf>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after a content file is written.
    fn document_written(&self, target: &Path, current: usize, total: usize);
    /// Called when the router skips a content file.
    fn document_skipped(&self, id: &str);
    /// Called when the pipeline completes.
    fn done(&self, report: &GenerateReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn document_written(&self, _target: &Path, _current: usize, _total: usize) {}
    fn document_skipped(&self, _id: &str) {}
    fn done(&self, _report: &GenerateReport) {}
}

/// Run the full pipeline.
///
/// 1. Rewrite every content descriptor
/// 2. Render and write llms.txt
///
/// Either step failing aborts the run.
#[instrument(skip_all, fields(documents = options.content.len()))]
pub fn generate(
    options: &GenerateOptions<'_>,
    progress: &dyn ProgressReporter,
) -> Result<GenerateReport> {
    let start = Instant::now();

    progress.phase("Rewriting content");
    let rewrite = generate_markdown_files(options, progress)?;

    progress.phase("Writing llms.txt");
    let llms_txt = generate_llms_txt(options.sections, options.router, options.fs)?;

    let report = GenerateReport {
        written: rewrite.written,
        skipped: rewrite.skipped,
        llms_txt,
        elapsed: start.elapsed(),
    };

    info!(
        written = report.written.len(),
        skipped = report.skipped,
        llms_txt = report.llms_txt.is_some(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "generation complete"
    );
    progress.done(&report);

    Ok(report)
}
