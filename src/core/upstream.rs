//! Reusable upstream relay.
//!
//! Every endpoint talks to exactly one hosted API. [`UpstreamClient`] owns the
//! pooled HTTP client, the API root and the bearer credential, performs a single
//! call and maps the outcome uniformly:
//!
//! - 2xx: an [`UpstreamResponse`] with the status and the untouched body
//! - any other status: [`UpstreamError::Status`] carrying the upstream status and body
//! - transport failures: [`UpstreamError::Request`]
//!
//! There are no retries. The first failure is returned to the caller.

use std::time::Duration;

use bytes::Bytes;
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors produced by an upstream call
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Upstream answered with a non-success status
    #[error("Upstream returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The request could not be sent or the response could not be read
    #[error("Upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A success body did not match the expected shape
    #[error("Failed to decode upstream response: {0}")]
    Decode(String),

    /// A success body lacked a required field
    #[error("Upstream response is missing {0}")]
    MissingField(&'static str),

    /// The outbound request could not be built
    #[error("Invalid upstream request: {0}")]
    InvalidRequest(String),

    /// The client was used without a credential
    #[error("Upstream credential is not configured")]
    MissingCredential,
}

impl UpstreamError {
    /// Upstream status code, when the failure came from a response
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            UpstreamError::Request(err) => err.status(),
            _ => None,
        }
    }
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// A successful upstream response
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    /// Raw body, never re-serialized
    pub body: Bytes,
}

/// HTTP client bound to a single upstream API root
#[derive(Clone)]
pub struct UpstreamClient {
    /// HTTP client (reused for connection pooling)
    client: Client,
    /// API root without trailing slash, e.g. `https://api.openai.com/v1`
    base_url: String,
    /// Bearer credential attached to every call
    api_key: Option<String>,
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl UpstreamClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - API root; a trailing slash is ignored
    /// * `api_key` - Bearer credential, `None` when not configured
    /// * `timeout` - Per-call timeout
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> UpstreamResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// API root this client targets
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a credential is available
    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }

    /// Absolute URL for an API path (leading slash required)
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized_post(&self, path: &str) -> UpstreamResult<RequestBuilder> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(UpstreamError::MissingCredential)?;

        Ok(self.client.post(self.url(path)).bearer_auth(api_key))
    }

    /// POST a JSON body
    ///
    /// `extra_headers` are appended after the authorization header.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        extra_headers: &[(&str, &str)],
    ) -> UpstreamResult<UpstreamResponse> {
        let mut request = self.authorized_post(path)?.json(body);
        for (name, value) in extra_headers {
            request = request.header(*name, *value);
        }
        self.execute(path, request).await
    }

    /// POST an SDP offer; the answer body is returned verbatim
    pub async fn post_sdp(&self, path: &str, sdp: &str) -> UpstreamResult<UpstreamResponse> {
        let request = self
            .authorized_post(path)?
            .header(reqwest::header::CONTENT_TYPE, "application/sdp")
            .body(sdp.to_owned());
        self.execute(path, request).await
    }

    /// POST a multipart form
    pub async fn post_multipart(&self, path: &str, form: Form) -> UpstreamResult<UpstreamResponse> {
        let request = self.authorized_post(path)?.multipart(form);
        self.execute(path, request).await
    }

    async fn execute(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> UpstreamResult<UpstreamResponse> {
        debug!("Calling upstream {}", path);

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            warn!("Upstream {} returned {}: {}", path, status, body);
            return Err(UpstreamError::Status { status, body });
        }

        debug!("Upstream {} returned {} ({} bytes)", path, status, body.len());
        Ok(UpstreamResponse { status, body })
    }
}
