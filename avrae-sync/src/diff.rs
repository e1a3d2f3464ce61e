//! Read-only unified diffs of what pull would change.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use crate::compare::{GvarComparison, ItemComparison, SyncReport};
use crate::error::{io_err, SyncError};

/// A single file diff, local content on the left, Avrae content on the right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Render a unified diff for every comparison pull would act on.
///
/// No files are written. Headers are relative to `base_path` where possible.
pub fn diff_report(report: &SyncReport, base_path: &Path) -> Result<Vec<FileDiff>, SyncError> {
    let mut diffs = Vec::new();

    for collection in &report.collections {
        for comparison in &collection.items {
            let remote = match comparison {
                ItemComparison::CodeModified { item, .. }
                | ItemComparison::CodeMissing { item, .. } => &item.code,
                ItemComparison::DocsModified { item, .. }
                | ItemComparison::DocsMissing { item, .. } => &item.docs,
                _ => continue,
            };
            diffs.push(render_diff(comparison.path(), remote, base_path)?);
        }
    }

    for comparison in &report.gvars {
        let remote = match comparison {
            GvarComparison::Modified { gvar, .. } | GvarComparison::MissingLocally { gvar, .. } => {
                &gvar.value
            }
            _ => continue,
        };
        diffs.push(render_diff(comparison.path(), remote, base_path)?);
    }

    Ok(diffs)
}

fn render_diff(path: &Path, remote: &str, base_path: &Path) -> Result<FileDiff, SyncError> {
    let existing = read_existing_or_empty(path)?;
    let relative = path.strip_prefix(base_path).unwrap_or(path);
    let old_header = format!("a/{}", relative.display());
    let new_header = format!("b/{}", relative.display());
    let unified = TextDiff::from_lines(existing.as_str(), remote)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string();

    Ok(FileDiff {
        path: path.to_path_buf(),
        unified_diff: unified,
    })
}

fn read_existing_or_empty(path: &Path) -> Result<String, SyncError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
