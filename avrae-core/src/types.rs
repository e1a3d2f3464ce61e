//! Domain types for the Avrae workshop API.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Response structs mirror the JSON shapes returned by `api.avrae.io`; the
//! API's `_id` fields are renamed to `id`. Timestamps stay as strings because
//! Avrae emits naive ISO-8601 values without a zone offset.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed Avrae workshop collection identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CollectionId(pub String);

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for CollectionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CollectionId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed key for an Avrae global variable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GvarKey(pub String);

impl fmt::Display for GvarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for GvarKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for GvarKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The kind of a workshop code item; selects the API path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Alias,
    Snippet,
}

impl ItemKind {
    /// Path segment used by the workshop API (`/workshop/{kind}/...`).
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Alias => "alias",
            ItemKind::Snippet => "snippet",
        }
    }

    /// File extension for local source files of this kind.
    pub fn extension(self) -> &'static str {
        match self {
            ItemKind::Alias => "alias",
            ItemKind::Snippet => "snippet",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication state of a workshop collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublishState {
    #[default]
    Private,
    Unlisted,
    Published,
    #[serde(other)]
    Unknown,
}

// ---------------------------------------------------------------------------
// API response objects
// ---------------------------------------------------------------------------

/// An Avrae workshop alias, possibly with nested subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Alias {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub docs: String,
    #[serde(default)]
    pub entitlements: Vec<String>,
    pub collection_id: CollectionId,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub subcommand_ids: Vec<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub subcommands: Vec<Alias>,
}

/// An Avrae workshop snippet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Snippet {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub docs: String,
    #[serde(default)]
    pub entitlements: Vec<String>,
    pub collection_id: CollectionId,
    #[serde(rename = "_id")]
    pub id: String,
}

/// An Avrae workshop collection with its embedded aliases and snippets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Collection {
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub owner: String,
    pub alias_ids: Vec<String>,
    pub snippet_ids: Vec<String>,
    pub publish_state: PublishState,
    pub num_subscribers: u64,
    pub num_guild_subscribers: u64,
    pub last_edited: String,
    pub created_at: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "_id")]
    pub id: CollectionId,
    pub aliases: Vec<Alias>,
    pub snippets: Vec<Snippet>,
}

/// An Avrae global variable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Gvar {
    pub owner: String,
    pub key: GvarKey,
    pub owner_name: String,
    pub value: String,
    #[serde(default)]
    pub editors: Vec<String>,
}

/// One entry in a workshop item's code version history.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CodeVersion {
    pub version: u64,
    pub content: String,
    pub created_at: String,
    pub is_current: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
