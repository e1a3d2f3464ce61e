//! `avrae-sync status` — sync state visibility.
//!
//! Drift is data, not an error: status always exits 0 and leaves both the
//! repository and Avrae untouched.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use avrae_sync::{GvarComparison, ItemComparison, SyncReport};

use super::{build_context, ConnectionArgs, RepoArgs};

/// Arguments for `avrae-sync status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub repo: RepoArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let ctx = build_context(&self.connection, &self.repo)?;
        let entries = build_entries(&ctx.report);

        if self.json {
            let report = StatusJson {
                clean: ctx.report.is_clean(),
                entries,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        print_table(ctx.report.is_clean(), entries);
        Ok(())
    }
}

#[derive(Serialize)]
struct StatusJson {
    clean: bool,
    entries: Vec<StatusEntry>,
}

#[derive(Serialize, Tabled)]
struct StatusEntry {
    #[tabled(rename = "resource")]
    resource: String,
    #[tabled(rename = "state")]
    state: String,
    #[tabled(rename = "path")]
    path: String,
}

fn build_entries(report: &SyncReport) -> Vec<StatusEntry> {
    let mut entries = Vec::new();
    for collection in &report.collections {
        for comparison in &collection.items {
            let (resource, state) = match comparison {
                ItemComparison::CodeMatches { item, .. } => {
                    (format!("{} '{}'", item.kind, item.name), "ok")
                }
                ItemComparison::CodeModified { item, .. } => {
                    (format!("{} '{}'", item.kind, item.name), "modified")
                }
                ItemComparison::CodeMissing { item, .. } => {
                    (format!("{} '{}'", item.kind, item.name), "missing")
                }
                ItemComparison::DocsMatch { item, .. } => {
                    (format!("{} '{}' docs", item.kind, item.name), "ok")
                }
                ItemComparison::DocsModified { item, .. } => {
                    (format!("{} '{}' docs", item.kind, item.name), "modified")
                }
                ItemComparison::DocsMissing { item, .. } => {
                    (format!("{} '{}' docs", item.kind, item.name), "missing")
                }
                ItemComparison::Untracked { kind, .. } => {
                    (format!("untracked {kind}"), "untracked")
                }
            };
            entries.push(StatusEntry {
                resource,
                state: state.to_string(),
                path: comparison.path().display().to_string(),
            });
        }
    }
    for comparison in &report.gvars {
        let (resource, state) = match comparison {
            GvarComparison::Matches { gvar, .. } => (format!("gvar '{}'", gvar.key), "ok"),
            GvarComparison::Modified { gvar, .. } => (format!("gvar '{}'", gvar.key), "modified"),
            GvarComparison::MissingLocally { gvar, .. } => {
                (format!("gvar '{}'", gvar.key), "missing")
            }
            GvarComparison::NotOnAvrae { key, .. } => (format!("gvar '{key}'"), "not on avrae"),
        };
        entries.push(StatusEntry {
            resource,
            state: state.to_string(),
            path: comparison.path().display().to_string(),
        });
    }
    entries
}

fn print_table(clean: bool, entries: Vec<StatusEntry>) {
    if entries.is_empty() {
        println!("Nothing tracked; both configs are empty.");
        return;
    }

    let drifted = entries.iter().filter(|e| e.state != "ok").count();
    let mut table = Table::new(&entries);
    table.with(Style::sharp());
    println!("{table}");

    if clean {
        println!("{}", "✓ repository matches avrae".green());
    } else {
        println!(
            "{}",
            format!("{drifted} file(s) out of sync; run pull or push").yellow()
        );
    }
}
