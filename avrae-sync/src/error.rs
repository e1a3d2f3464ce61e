//! Error types for avrae-sync.

use std::path::PathBuf;

use thiserror::Error;

use avrae_api::ApiError;
use avrae_core::ConfigError;

/// All errors that can arise from compare / pull / push operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the Avrae API client.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// An error from config file loading.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
