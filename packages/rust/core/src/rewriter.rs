//! Content rewriting: frontmatter filtering, body transforms, write-out.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use llmsgen_markdown::{TransformChain, TransformContext, frontmatter};
use llmsgen_shared::{LlmsGenError, Metadata, Result};

use crate::pipeline::{GenerateOptions, ProgressReporter};

/// Outcome of rewriting a batch of content files.
#[derive(Debug, Clone, Default)]
pub struct RewriteResult {
    /// Output paths written, in input order.
    pub written: Vec<PathBuf>,
    /// Descriptors the router skipped.
    pub skipped: usize,
}

/// Rewrite a single document's text.
///
/// 1. Extract the original frontmatter
/// 2. Remap it with `format_frontmatter` (identity when `None`)
/// 3. Strip the block and run the transform chain over the body, with the
///    *original* frontmatter as context
/// 4. Re-attach the remapped frontmatter, one blank line before the body
pub fn rewrite_document(
    raw: &str,
    path: &Path,
    transforms: Option<&TransformChain>,
    format_frontmatter: Option<&dyn Fn(&Metadata) -> Metadata>,
) -> Result<String> {
    let original = frontmatter::extract(raw)?;
    let metadata = match format_frontmatter {
        Some(format) => Cow::Owned(format(&original)),
        None => Cow::Borrowed(&original),
    };

    let mut body = Cow::Borrowed(frontmatter::strip(raw));

    if let Some(chain) = transforms.filter(|chain| !chain.is_empty()) {
        let ctx = TransformContext {
            frontmatter: &original,
            path,
        };
        body = Cow::Owned(chain.run(&body, &ctx)?);
    }

    frontmatter::compose(&metadata, &body)
}

/// Rewrite every content descriptor to its routed output path.
///
/// Descriptors are processed in input order. A skipped descriptor is never
/// read. The first error aborts the batch; nothing is written for the
/// failing document.
#[instrument(skip_all, fields(documents = options.content.len()))]
pub fn generate_markdown_files(
    options: &GenerateOptions<'_>,
    progress: &dyn ProgressReporter,
) -> Result<RewriteResult> {
    let total = options.content.len();
    let mut result = RewriteResult::default();

    for (index, descriptor) in options.content.iter().enumerate() {
        let id = descriptor.id();
        let Some(target) = options.router.route(&id) else {
            debug!(%id, "router skipped document");
            result.skipped += 1;
            progress.document_skipped(&id);
            continue;
        };

        let source = descriptor.path.as_path();
        let raw = options
            .fs
            .read_to_string(source)
            .map_err(|e| LlmsGenError::Read {
                path: source.to_path_buf(),
                source: e,
            })?;

        let rewritten = rewrite_document(
            &raw,
            source,
            options.transforms,
            options.format_frontmatter,
        )
        .map_err(|e| e.in_document(source))?;

        write_document(options, &target, &rewritten)?;

        debug!(
            source = %source.display(),
            target = %target.display(),
            bytes = rewritten.len(),
            "wrote document"
        );
        progress.document_written(&target, index + 1, total);
        result.written.push(target);
    }

    info!(
        written = result.written.len(),
        skipped = result.skipped,
        "content rewrite complete"
    );

    Ok(result)
}

fn write_document(options: &GenerateOptions<'_>, target: &Path, text: &str) -> Result<()> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        options
            .fs
            .create_dir_all(parent)
            .map_err(|e| LlmsGenError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }

    options.fs.write(target, text).map_err(|e| LlmsGenError::Write {
        path: target.to_path_buf(),
        source: e,
    })
}
