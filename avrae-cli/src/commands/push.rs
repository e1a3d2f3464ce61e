//! `avrae-sync push` — upload local changes to Avrae.

use anyhow::{Context, Result};
use clap::Args;

use avrae_sync::push::{self, PushResult};

use super::{build_context, ConnectionArgs, RepoArgs};

/// Arguments for `avrae-sync push`.
#[derive(Args, Debug)]
pub struct PushArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub repo: RepoArgs,

    /// Show what would be uploaded without sending anything to Avrae.
    #[arg(long)]
    pub dry_run: bool,
}

impl PushArgs {
    pub fn run(self) -> Result<()> {
        let ctx = build_context(&self.connection, &self.repo)?;
        let plan = push::plan(&ctx.report);
        let results = push::apply(&ctx.client, &plan.actions, self.dry_run)
            .context("push failed")?;
        print_outcome(&results, &plan.skipped, self.dry_run);
        Ok(())
    }
}

fn print_outcome(results: &[PushResult], skipped: &[String], dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };

    if results.is_empty() && skipped.is_empty() {
        println!("{prefix}✓ avrae already matches the repository");
        return;
    }

    println!("{prefix}✓ pushed {} change(s)", results.len());
    for result in results {
        match result {
            PushResult::Pushed { description } => println!("  ↑  {description}"),
            PushResult::WouldPush { description } => println!("  ~  {description}"),
        }
    }
    for reason in skipped {
        println!("  !  skipped: {reason}");
    }
}
