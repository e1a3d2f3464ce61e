//! # avrae-api
//!
//! Blocking HTTP client for the Avrae platform API.
//!
//! Construct an [`AvraeClient`] with an account token and call its methods
//! directly; every call is one synchronous request with a short timeout and
//! no retries. Errors surface as [`ApiError`].

pub mod client;
pub mod error;

pub use client::{AvraeClient, DEFAULT_BASE_URL};
pub use error::ApiError;
