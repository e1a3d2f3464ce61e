//! Avrae sync core library — domain types, config loading, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and Avrae API response structs
//! - [`error`] — [`ConfigError`]
//! - [`config`] — collections / gvars mapping files

pub mod config;
pub mod error;
pub mod types;

pub use config::{CollectionsConfig, GvarsConfig};
pub use error::ConfigError;
pub use types::{
    Alias, Collection, CollectionId, CodeVersion, Gvar, GvarKey, ItemKind, PublishState, Snippet,
};
