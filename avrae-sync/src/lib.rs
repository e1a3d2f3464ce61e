//! # avrae-sync
//!
//! Comparison engine and sync application for Avrae collections and gvars.
//!
//! Fetch remote state with `avrae-api`, classify it against the local tree
//! with [`compare::compare_all`], then hand the resulting [`SyncReport`] to
//! [`pull::apply`] (remote → repository), [`push::plan`]/[`push::apply`]
//! (repository → remote) or [`diff::diff_report`] (read-only unified diffs).

pub mod compare;
pub mod diff;
pub mod error;
pub mod layout;
pub mod pull;
pub mod push;
pub mod writer;

pub use compare::{
    compare_all, CollectionReport, GvarComparison, ItemComparison, SyncReport, WorkshopItem,
};
pub use error::SyncError;
pub use writer::WriteResult;
