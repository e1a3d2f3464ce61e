//! Avrae sync — keep a repository and Avrae collections/gvars in step.
//!
//! # Usage
//!
//! ```text
//! avrae-sync pull   [--dry-run]    overwrite local files with Avrae content
//! avrae-sync push   [--dry-run]    upload local changes to Avrae
//! avrae-sync status [--json]       show the sync state of every tracked file
//! avrae-sync diff                  unified diffs of what pull would change
//! ```
//!
//! Connection and repository settings come from flags or the environment:
//! `AVRAE_TOKEN`, `COLLECTIONS_CONFIG` (default `collections.json`),
//! `GVARS_CONFIG` (default `gvars.json`), `GITHUB_WORKSPACE` (base path).

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{diff::DiffArgs, pull::PullArgs, push::PushArgs, status::StatusArgs};

#[derive(Parser, Debug)]
#[command(
    name = "avrae-sync",
    version,
    about = "Synchronize local files with Avrae collections and gvars",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Overwrite local files with the current content from Avrae.
    Pull(PullArgs),

    /// Upload locally modified code, docs and gvars to Avrae.
    Push(PushArgs),

    /// Show the sync state of every tracked file.
    Status(StatusArgs),

    /// Show unified diffs of what pull would change.
    Diff(DiffArgs),
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Pull(args) => args.run(),
        Commands::Push(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::Diff(args) => args.run(),
    }
}
