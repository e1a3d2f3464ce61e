//! Token-authenticated client for `api.avrae.io`.
//!
//! One blocking request per call, 3-second timeout, no retries and no
//! response caching — every method reflects the remote state at call time.

use std::time::Duration;

use serde::Deserialize;

use avrae_core::types::{CodeVersion, Collection, CollectionId, Gvar, GvarKey, ItemKind};

use crate::error::ApiError;

/// Production Avrae API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.avrae.io";

/// Per-request timeout.
const API_TIMEOUT: Duration = Duration::from_secs(3);

/// Code versions fetched per history page.
const VERSION_PAGE_SIZE: usize = 10;

/// Maximum history pages scanned per item; better to skip the oldest
/// versions than flood Avrae with requests.
const VERSION_PAGE_LIMIT: usize = 5;

// ---------------------------------------------------------------------------
// Wire envelopes
// ---------------------------------------------------------------------------

/// Standard workshop API reply: `{success, data, error?}`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    data: Option<T>,
}

/// Reply shape of `GET /customizations/gvars` (no success envelope).
#[derive(Debug, Deserialize)]
struct GvarIndex {
    owned: Vec<Gvar>,
    editable: Vec<Gvar>,
}

impl GvarIndex {
    /// All gvars the account can write: owned first, then editable.
    fn into_gvars(self) -> Vec<Gvar> {
        let mut gvars = self.owned;
        gvars.extend(self.editable);
        gvars
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// A client for the Avrae API acting on behalf of a specific account.
pub struct AvraeClient {
    agent: ureq::Agent,
    token: String,
    base_url: String,
}

impl AvraeClient {
    /// Client against the production endpoint.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Client against an explicit base URL — used by tests and for
    /// `--api-base` overrides. Trailing slashes are trimmed.
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(API_TIMEOUT).build();
        Self {
            agent,
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch a collection with its embedded aliases and snippets.
    pub fn get_collection(&self, id: &CollectionId) -> Result<Collection, ApiError> {
        let url = format!("{}/workshop/collection/{id}/full", self.base_url);
        tracing::debug!("GET {url}");
        let response = self.execute(self.request("GET", &url).call(), &url)?;
        parse_envelope(&url, response)
    }

    /// Fetch every gvar the account owns or can edit.
    pub fn get_gvars(&self) -> Result<Vec<Gvar>, ApiError> {
        let url = format!("{}/customizations/gvars", self.base_url);
        tracing::debug!("GET {url}");
        let response = self.execute(self.request("GET", &url).call(), &url)?;
        let index: GvarIndex = response.into_json().map_err(|e| ApiError::Json {
            url: url.clone(),
            source: e,
        })?;
        Ok(index.into_gvars())
    }

    /// Scan an item's recent code version history for one whose content is
    /// exactly `code`. Returns `None` when no recent version matches.
    pub fn recent_matching_version(
        &self,
        kind: ItemKind,
        item_id: &str,
        code: &str,
    ) -> Result<Option<CodeVersion>, ApiError> {
        let mut skip = 0;
        for _ in 0..VERSION_PAGE_LIMIT {
            let versions = self.code_versions(kind, item_id, skip, VERSION_PAGE_SIZE)?;
            if let Some(found) = versions.iter().find(|v| v.content == code) {
                return Ok(Some(found.clone()));
            }
            let fetched = versions.len();
            skip += fetched;
            if fetched < VERSION_PAGE_SIZE {
                break;
            }
        }
        Ok(None)
    }

    /// Create a new code version holding `content` on the given item.
    ///
    /// The new version is not active until
    /// [`set_active_code_version`](Self::set_active_code_version) is called.
    pub fn create_code_version(
        &self,
        kind: ItemKind,
        item_id: &str,
        content: &str,
    ) -> Result<CodeVersion, ApiError> {
        let url = format!("{}/workshop/{kind}/{item_id}/code", self.base_url);
        tracing::info!("POST {url}");
        let response = self.execute(
            self.request("POST", &url)
                .send_json(serde_json::json!({ "content": content })),
            &url,
        )?;
        parse_envelope(&url, response)
    }

    /// Make a specific code version of an item the active one.
    pub fn set_active_code_version(
        &self,
        kind: ItemKind,
        item_id: &str,
        version: u64,
    ) -> Result<(), ApiError> {
        let url = format!("{}/workshop/{kind}/{item_id}/active-code", self.base_url);
        tracing::info!("PUT {url} (version {version})");
        let response = self.execute(
            self.request("PUT", &url)
                .send_json(serde_json::json!({ "version": version })),
            &url,
        )?;
        parse_envelope::<serde_json::Value>(&url, response)?;
        Ok(())
    }

    /// Replace an item's docs. Docs are not tied to a code version; the
    /// item name must be sent alongside them.
    pub fn update_docs(
        &self,
        kind: ItemKind,
        item_id: &str,
        name: &str,
        docs: &str,
    ) -> Result<(), ApiError> {
        let url = format!("{}/workshop/{kind}/{item_id}", self.base_url);
        tracing::info!("PATCH {url}");
        let response = self.execute(
            self.request("PATCH", &url)
                .send_json(serde_json::json!({ "docs": docs, "name": name })),
            &url,
        )?;
        parse_envelope::<serde_json::Value>(&url, response)?;
        Ok(())
    }

    /// Replace a gvar's value. The endpoint acknowledges with a literal
    /// `Gvar updated.` body rather than a JSON envelope.
    pub fn update_gvar(&self, key: &GvarKey, value: &str) -> Result<(), ApiError> {
        let url = format!("{}/customizations/gvars/{key}", self.base_url);
        tracing::info!("POST {url}");
        let response = self.execute(
            self.request("POST", &url)
                .send_json(serde_json::json!({ "value": value })),
            &url,
        )?;
        let body = response.into_string().map_err(|e| ApiError::Json {
            url: url.clone(),
            source: e,
        })?;
        if body != "Gvar updated." {
            return Err(ApiError::Rejected { url, message: body });
        }
        Ok(())
    }

    // -- internals ----------------------------------------------------------

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .set("Authorization", &self.token)
    }

    /// One page of an item's code version history.
    fn code_versions(
        &self,
        kind: ItemKind,
        item_id: &str,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<CodeVersion>, ApiError> {
        let url = format!(
            "{}/workshop/{kind}/{item_id}/code?skip={skip}&limit={limit}",
            self.base_url
        );
        tracing::debug!("GET {url}");
        let response = self.execute(self.request("GET", &url).call(), &url)?;
        parse_envelope(&url, response)
    }

    fn execute(
        &self,
        result: Result<ureq::Response, ureq::Error>,
        url: &str,
    ) -> Result<ureq::Response, ApiError> {
        match result {
            Ok(response) => Ok(response),
            Err(ureq::Error::Status(status, response)) => Err(ApiError::Status {
                status,
                url: url.to_string(),
                body: response.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(transport)) => Err(ApiError::Transport(transport)),
        }
    }
}

/// Unwrap a `{success, data, error?}` envelope into its data.
fn parse_envelope<T: serde::de::DeserializeOwned>(
    url: &str,
    response: ureq::Response,
) -> Result<T, ApiError> {
    let envelope: Envelope<T> = response.into_json().map_err(|e| ApiError::Json {
        url: url.to_string(),
        source: e,
    })?;
    if !envelope.success {
        return Err(ApiError::Rejected {
            url: url.to_string(),
            message: envelope
                .error
                .unwrap_or_else(|| "no error message supplied".to_string()),
        });
    }
    envelope.data.ok_or_else(|| ApiError::Rejected {
        url: url.to_string(),
        message: "success response carried no data".to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
