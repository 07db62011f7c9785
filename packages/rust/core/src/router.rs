//! Output routing: logical document id → output path, or skip.

use std::path::{Component, Path, PathBuf};

use llmsgen_shared::{LLMS_TXT_FILENAME, OutputConfig};

/// Maps a document id (a content path, or [`LLMS_TXT_FILENAME`]) to where it is written.
///
/// `None` means skip: nothing is read or written for that id.
pub trait OutputRouter {
    fn route(&self, id: &str) -> Option<PathBuf>;
}

impl<F> OutputRouter for F
where
    F: Fn(&str) -> Option<PathBuf>,
{
    fn route(&self, id: &str) -> Option<PathBuf> {
        self(id)
    }
}

/// Routes everything under one output directory.
///
/// Content paths keep their relative layout; `..`, root, and drive
/// components are dropped so nothing lands outside `out_dir`.
#[derive(Debug, Clone)]
pub struct DirRouter {
    out_dir: PathBuf,
    markdown: bool,
    llms_txt: bool,
    extension: Option<String>,
    strip_prefix: Option<PathBuf>,
}

impl DirRouter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            markdown: true,
            llms_txt: true,
            extension: None,
            strip_prefix: None,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self {
            out_dir: config.dir.clone(),
            markdown: config.markdown,
            llms_txt: config.llms_txt,
            extension: config.extension.clone(),
            strip_prefix: config.strip_prefix.clone(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Enable or disable rewritten content output.
    pub fn markdown(mut self, enabled: bool) -> Self {
        self.markdown = enabled;
        self
    }

    /// Enable or disable llms.txt output.
    pub fn llms_txt(mut self, enabled: bool) -> Self {
        self.llms_txt = enabled;
        self
    }

    /// Replace content file extensions (e.g. `mdx` → `md`).
    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.extension = Some(ext.into());
        self
    }

    /// Drop a leading path prefix from content paths.
    pub fn strip_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.strip_prefix = Some(prefix.into());
        self
    }

    fn content_path(&self, id: &str) -> Option<PathBuf> {
        let path = Path::new(id);
        let path = self
            .strip_prefix
            .as_deref()
            .and_then(|prefix| path.strip_prefix(prefix).ok())
            .unwrap_or(path);

        let mut relative: PathBuf = path
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect();

        if relative.as_os_str().is_empty() {
            return None;
        }
        if let Some(ext) = &self.extension {
            relative.set_extension(ext);
        }

        Some(self.out_dir.join(relative))
    }
}

impl OutputRouter for DirRouter {
    fn route(&self, id: &str) -> Option<PathBuf> {
        if id == LLMS_TXT_FILENAME {
            return self.llms_txt.then(|| self.out_dir.join(LLMS_TXT_FILENAME));
        }
        if !self.markdown {
            return None;
        }
        self.content_path(id)
    }
}
