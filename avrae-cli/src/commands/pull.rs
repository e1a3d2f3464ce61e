//! `avrae-sync pull` — overwrite local files with Avrae content.

use anyhow::{Context, Result};
use clap::Args;

use avrae_sync::{pull, WriteResult};

use super::{build_context, ConnectionArgs, RepoArgs};

/// Arguments for `avrae-sync pull`.
#[derive(Args, Debug)]
pub struct PullArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub repo: RepoArgs,

    /// Show what would be written without actually writing any files.
    #[arg(long)]
    pub dry_run: bool,
}

impl PullArgs {
    pub fn run(self) -> Result<()> {
        let ctx = build_context(&self.connection, &self.repo)?;
        let outcome = pull::apply(&ctx.report, self.dry_run).context("pull failed")?;
        print_outcome(&outcome.writes, &outcome.skipped, self.dry_run);
        Ok(())
    }
}

fn print_outcome(writes: &[WriteResult], skipped: &[String], dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let written = writes
        .iter()
        .filter(|w| matches!(w, WriteResult::Written { .. } | WriteResult::WouldWrite { .. }))
        .count();
    let unchanged = writes.len() - written;

    if writes.is_empty() && skipped.is_empty() {
        println!("{prefix}✓ nothing tracked, nothing to do");
        return;
    }

    println!("{prefix}✓ pulled ({written} written, {unchanged} unchanged)");
    for w in writes {
        match w {
            WriteResult::Written { path } => println!("  ✎  {}", path.display()),
            WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
            WriteResult::Unchanged { path } => println!("  ·  {}", path.display()),
        }
    }
    for reason in skipped {
        println!("  !  skipped: {reason}");
    }
}
