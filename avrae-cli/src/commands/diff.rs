//! `avrae-sync diff` — unified diffs of what pull would change.

use anyhow::{Context, Result};
use clap::Args;

use avrae_sync::diff::diff_report;

use super::{build_context, ConnectionArgs, RepoArgs};

/// Arguments for `avrae-sync diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub repo: RepoArgs,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let ctx = build_context(&self.connection, &self.repo)?;
        let diffs = diff_report(&ctx.report, &ctx.base_path).context("diff failed")?;

        if diffs.is_empty() {
            println!("No differences.");
            return Ok(());
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }
        Ok(())
    }
}
