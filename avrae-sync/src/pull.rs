//! Pull application — overwrite local files with fetched Avrae content.
//!
//! Applies every comparison where the repository is behind: modified or
//! missing code, docs and gvar files. Untracked local files are reported
//! but never deleted, and nothing is sent to Avrae.

use crate::compare::{GvarComparison, ItemComparison, SyncReport};
use crate::error::SyncError;
use crate::writer::{write_file, WriteResult};

/// Outcome of applying a pull.
#[derive(Debug)]
pub struct PullOutcome {
    /// Per-file write results, in report order.
    pub writes: Vec<WriteResult>,
    /// Comparisons pull cannot act on (untracked files, unknown gvars).
    pub skipped: Vec<String>,
}

/// Write remote content over the local tree for every out-of-date entry.
pub fn apply(report: &SyncReport, dry_run: bool) -> Result<PullOutcome, SyncError> {
    let mut writes = Vec::new();
    let mut skipped = Vec::new();

    for collection in &report.collections {
        for comparison in &collection.items {
            match comparison {
                ItemComparison::CodeModified { path, item }
                | ItemComparison::CodeMissing { path, item } => {
                    writes.push(write_file(path, &item.code, dry_run)?);
                }
                ItemComparison::DocsModified { path, item }
                | ItemComparison::DocsMissing { path, item } => {
                    writes.push(write_file(path, &item.docs, dry_run)?);
                }
                ItemComparison::CodeMatches { path, .. }
                | ItemComparison::DocsMatch { path, .. } => {
                    writes.push(WriteResult::Unchanged { path: path.clone() });
                }
                ItemComparison::Untracked { .. } => skipped.push(comparison.summary()),
            }
        }
    }

    for comparison in &report.gvars {
        match comparison {
            GvarComparison::Modified { path, gvar }
            | GvarComparison::MissingLocally { path, gvar } => {
                writes.push(write_file(path, &gvar.value, dry_run)?);
            }
            GvarComparison::Matches { path, .. } => {
                writes.push(WriteResult::Unchanged { path: path.clone() });
            }
            GvarComparison::NotOnAvrae { .. } => skipped.push(comparison.summary()),
        }
    }

    Ok(PullOutcome { writes, skipped })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
