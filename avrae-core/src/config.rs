//! Mapping config files driving a sync run.
//!
//! Two flat JSON objects, string keys to string values:
//!
//! ```text
//! collections.json   { "<collection id>": "<local directory path>", ... }
//! gvars.json         { "<gvar key>": "<local file path>", ... }
//! ```
//!
//! Paths are relative to the repository base path. Both files are read once
//! at process start and never mutated.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::{CollectionId, GvarKey};

/// Default collections config file name, relative to the repository root.
pub const DEFAULT_COLLECTIONS_CONFIG: &str = "collections.json";

/// Default gvars config file name, relative to the repository root.
pub const DEFAULT_GVARS_CONFIG: &str = "gvars.json";

/// Collection id → local directory, as loaded from `collections.json`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct CollectionsConfig(pub BTreeMap<CollectionId, PathBuf>);

/// Gvar key → local file, as loaded from `gvars.json`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct GvarsConfig(pub BTreeMap<GvarKey, PathBuf>);

impl CollectionsConfig {
    /// Load from `path`.
    ///
    /// Returns `ConfigError::ConfigNotFound` if absent,
    /// `ConfigError::Parse` (with path context) if malformed JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        load_json(path)
    }

    /// Collection ids in deterministic (sorted) order.
    pub fn ids(&self) -> impl Iterator<Item = &CollectionId> {
        self.0.keys()
    }
}

impl GvarsConfig {
    /// Load from `path`.
    ///
    /// Returns `ConfigError::ConfigNotFound` if absent,
    /// `ConfigError::Parse` (with path context) if malformed JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        load_json(path)
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
