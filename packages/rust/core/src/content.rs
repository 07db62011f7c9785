//! Content discovery: turn `[content]` config into an ordered descriptor list.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use llmsgen_shared::{ContentConfig, ContentDescriptor, LlmsGenError, Result};

/// Resolve configured content into descriptors.
///
/// Explicit `paths` come first in the given order, then each directory's
/// matching files in sorted order. Duplicates keep their first position.
/// Hidden files and directories (leading `.`) are skipped while walking.
#[instrument(skip_all, fields(paths = config.paths.len(), dirs = config.dirs.len()))]
pub fn resolve_content(config: &ContentConfig) -> Result<Vec<ContentDescriptor>> {
    let mut seen = HashSet::new();
    let mut descriptors = Vec::new();

    let mut push = |path: PathBuf| {
        if seen.insert(path.clone()) {
            descriptors.push(ContentDescriptor::new(path));
        }
    };

    for path in &config.paths {
        push(path.clone());
    }

    for dir in &config.dirs {
        let mut found = Vec::new();
        walk(dir, &config.extensions, &mut found)?;
        found.sort();
        debug!(dir = %dir.display(), files = found.len(), "walked content directory");
        for path in found {
            push(path);
        }
    }

    Ok(descriptors)
}

fn walk(dir: &Path, extensions: &[String], found: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| LlmsGenError::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| LlmsGenError::io(dir, e))?;
        let path = entry.path();

        if is_hidden(&path) {
            continue;
        }

        let file_type = entry.file_type().map_err(|e| LlmsGenError::io(&path, e))?;
        if file_type.is_dir() {
            walk(&path, extensions, found)?;
        } else if has_extension(&path, extensions) {
            found.push(path);
        }
    }

    Ok(())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}
