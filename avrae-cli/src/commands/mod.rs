//! Subcommand implementations and shared fetch/compare plumbing.

pub mod diff;
pub mod pull;
pub mod push;
pub mod status;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use avrae_api::AvraeClient;
use avrae_core::config::{
    CollectionsConfig, GvarsConfig, DEFAULT_COLLECTIONS_CONFIG, DEFAULT_GVARS_CONFIG,
};
use avrae_sync::{compare_all, SyncReport};

/// Connection settings shared by every subcommand.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Avrae account API token.
    #[arg(long, env = "AVRAE_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Avrae API base URL.
    #[arg(long, env = "AVRAE_API_BASE", default_value = avrae_api::DEFAULT_BASE_URL, hide = true)]
    pub api_base: String,
}

/// Repository settings shared by every subcommand.
#[derive(Args, Debug)]
pub struct RepoArgs {
    /// Collections config file (collection id to directory), relative to the base path.
    #[arg(long, env = "COLLECTIONS_CONFIG", default_value = DEFAULT_COLLECTIONS_CONFIG)]
    pub collections: PathBuf,

    /// Gvars config file (gvar key to file), relative to the base path.
    #[arg(long, env = "GVARS_CONFIG", default_value = DEFAULT_GVARS_CONFIG)]
    pub gvars: PathBuf,

    /// Repository root that config paths are resolved against.
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
    pub base_path: PathBuf,
}

/// Fetched remote state compared against the local tree.
pub struct SyncContext {
    pub client: AvraeClient,
    pub report: SyncReport,
    pub base_path: PathBuf,
}

/// Load both configs, fetch the referenced remote state and compare.
pub fn build_context(connection: &ConnectionArgs, repo: &RepoArgs) -> Result<SyncContext> {
    let (collections_config, gvars_config) = load_configs(repo)?;
    let client = AvraeClient::with_base_url(&connection.token, &connection.api_base);

    let mut collections = Vec::new();
    for (id, dir) in &collections_config.0 {
        let collection = client
            .get_collection(id)
            .with_context(|| format!("failed to fetch collection {id}"))?;
        collections.push((collection, repo.base_path.join(dir)));
    }
    let gvars = if gvars_config.0.is_empty() {
        Vec::new()
    } else {
        client.get_gvars().context("failed to fetch gvars")?
    };

    let report = compare_all(&collections, &gvars, &gvars_config, &repo.base_path)
        .context("comparison failed")?;
    Ok(SyncContext {
        client,
        report,
        base_path: repo.base_path.clone(),
    })
}

/// Load both mapping files, emitting GitHub Actions error annotations when
/// a file is absent so CI surfaces the cause next to the failed step.
fn load_configs(repo: &RepoArgs) -> Result<(CollectionsConfig, GvarsConfig)> {
    let collections_path = repo.base_path.join(&repo.collections);
    if !collections_path.exists() {
        eprintln!(
            "::error title=Missing collections config file.::Collections config not found at \
             {}; create the file or specify a path using the 'collections' workflow input.",
            collections_path.display()
        );
        bail!("collections config not found at {}", collections_path.display());
    }
    let collections = CollectionsConfig::load(&collections_path)
        .with_context(|| format!("failed to load {}", collections_path.display()))?;

    let gvars_path = repo.base_path.join(&repo.gvars);
    if !gvars_path.exists() {
        eprintln!(
            "::error title=Missing gvars config file.::Gvar config not found at {}; create the \
             file or specify a path using the 'gvars' workflow input.",
            gvars_path.display()
        );
        bail!("gvars config not found at {}", gvars_path.display());
    }
    let gvars = GvarsConfig::load(&gvars_path)
        .with_context(|| format!("failed to load {}", gvars_path.display()))?;

    Ok((collections, gvars))
}
