//! Push application — bring Avrae in sync with the repository.
//!
//! Planning is pure: a [`SyncReport`] maps to the set of API mutations push
//! would perform. Applying executes them one blocking call at a time.
//!
//! Code pushes reuse Avrae's version history where possible: if a recent
//! version already holds exactly the local content it is re-activated,
//! otherwise a new version is created and activated. This keeps the history
//! clean when an item was edited on Avrae and then reverted in the repo.

use std::path::{Path, PathBuf};

use avrae_api::AvraeClient;
use avrae_core::types::GvarKey;

use crate::compare::{GvarComparison, ItemComparison, SyncReport, WorkshopItem};
use crate::error::{io_err, SyncError};

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// One API mutation push intends to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushAction {
    /// Activate or create a code version holding the local file's content.
    UpdateCode { path: PathBuf, item: WorkshopItem },
    /// Replace the item's docs with the local doc file's content.
    UpdateDocs { path: PathBuf, item: WorkshopItem },
    /// Replace the gvar's value with the local file's content.
    UpdateGvar { path: PathBuf, key: GvarKey },
}

impl PushAction {
    /// One-line description, suitable for CLI output.
    pub fn describe(&self) -> String {
        match self {
            PushAction::UpdateCode { path, item } => {
                format!("push {} '{}' code from {}", item.kind, item.name, path.display())
            }
            PushAction::UpdateDocs { path, item } => {
                format!("push {} '{}' docs from {}", item.kind, item.name, path.display())
            }
            PushAction::UpdateGvar { path, key } => {
                format!("push gvar '{key}' from {}", path.display())
            }
        }
    }
}

/// The mutations push would perform, plus everything it must leave alone.
#[derive(Debug)]
pub struct PushPlan {
    pub actions: Vec<PushAction>,
    /// Comparisons push cannot act on, with the reason.
    pub skipped: Vec<String>,
}

/// Derive the push plan from a comparison report.
///
/// Only locally-modified files become actions. Files missing locally are
/// skipped (there is nothing to push; pull first), as are untracked files
/// and gvars unknown to the account — the workshop API offers no
/// create-by-name for them here.
pub fn plan(report: &SyncReport) -> PushPlan {
    let mut actions = Vec::new();
    let mut skipped = Vec::new();

    for collection in &report.collections {
        for comparison in &collection.items {
            match comparison {
                ItemComparison::CodeModified { path, item } => actions.push(PushAction::UpdateCode {
                    path: path.clone(),
                    item: item.clone(),
                }),
                ItemComparison::DocsModified { path, item } => actions.push(PushAction::UpdateDocs {
                    path: path.clone(),
                    item: item.clone(),
                }),
                ItemComparison::CodeMissing { .. }
                | ItemComparison::DocsMissing { .. }
                | ItemComparison::Untracked { .. } => {
                    skipped.push(comparison.summary());
                }
                ItemComparison::CodeMatches { .. } | ItemComparison::DocsMatch { .. } => {}
            }
        }
    }

    for comparison in &report.gvars {
        match comparison {
            GvarComparison::Modified { path, gvar } => actions.push(PushAction::UpdateGvar {
                path: path.clone(),
                key: gvar.key.clone(),
            }),
            GvarComparison::MissingLocally { .. } | GvarComparison::NotOnAvrae { .. } => {
                skipped.push(comparison.summary());
            }
            GvarComparison::Matches { .. } => {}
        }
    }

    PushPlan { actions, skipped }
}

// ---------------------------------------------------------------------------
// Apply
// ---------------------------------------------------------------------------

/// Outcome of one applied (or planned, under `--dry-run`) push action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushResult {
    Pushed { description: String },
    WouldPush { description: String },
}

impl PushResult {
    pub fn description(&self) -> &str {
        match self {
            PushResult::Pushed { description } | PushResult::WouldPush { description } => {
                description
            }
        }
    }
}

/// Execute the planned mutations against Avrae, in plan order.
pub fn apply(
    client: &AvraeClient,
    actions: &[PushAction],
    dry_run: bool,
) -> Result<Vec<PushResult>, SyncError> {
    let mut results = Vec::new();
    for action in actions {
        if dry_run {
            tracing::info!("[dry-run] {}", action.describe());
            results.push(PushResult::WouldPush {
                description: action.describe(),
            });
            continue;
        }
        let description = match action {
            PushAction::UpdateCode { path, item } => {
                let code = read_local(path)?;
                let version = match client.recent_matching_version(item.kind, &item.id, &code)? {
                    Some(existing) => {
                        client.set_active_code_version(item.kind, &item.id, existing.version)?;
                        existing.version
                    }
                    None => {
                        let created = client.create_code_version(item.kind, &item.id, &code)?;
                        client.set_active_code_version(item.kind, &item.id, created.version)?;
                        created.version
                    }
                };
                format!(
                    "{} '{}' now at code version {version}",
                    item.kind, item.name
                )
            }
            PushAction::UpdateDocs { path, item } => {
                let docs = read_local(path)?;
                client.update_docs(item.kind, &item.id, &item.name, &docs)?;
                format!("{} '{}' docs updated", item.kind, item.name)
            }
            PushAction::UpdateGvar { path, key } => {
                let value = read_local(path)?;
                client.update_gvar(key, &value)?;
                format!("gvar '{key}' updated")
            }
        };
        tracing::info!("{description}");
        results.push(PushResult::Pushed { description });
    }
    Ok(results)
}

fn read_local(path: &Path) -> Result<String, SyncError> {
    std::fs::read_to_string(path).map_err(|e| io_err(path, e))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
