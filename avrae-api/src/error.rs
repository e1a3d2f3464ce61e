//! Error types for avrae-api.

use thiserror::Error;

/// All errors that can arise from Avrae API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    /// Connection, DNS, TLS or timeout failure before a response arrived.
    #[error("transport error: {0}")]
    Transport(#[from] ureq::Transport),

    /// The response body was not the JSON shape we expected.
    #[error("invalid JSON in response from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// A 2xx response whose envelope reported `success: false`, or a
    /// mutation acknowledgement that did not match the documented reply.
    #[error("avrae rejected request to {url}: {message}")]
    Rejected { url: String, message: String },
}
