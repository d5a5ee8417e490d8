//! HTTP implementation of [`Platform`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use sourcebridge_shared::{PlatformIdentity, Result, SourceBridgeError};

use crate::{Platform, USER_AGENT};

/// Default timeout in seconds for platform requests.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Longest slice of an error body echoed back to the caller.
const ERROR_BODY_PREVIEW: usize = 500;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Connection settings for [`HttpPlatform`].
#[derive(Debug, Clone)]
pub struct PlatformOptions {
    /// Dispatch endpoint URL.
    pub endpoint: String,
    /// Timeout for HTTP requests in seconds.
    pub timeout_secs: u64,
}

impl PlatformOptions {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<RemoteErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct RemoteErrorEntry {
    message: String,
}

// ---------------------------------------------------------------------------
// HttpPlatform
// ---------------------------------------------------------------------------

/// Platform client posting `{operation, variables}` to a single endpoint.
pub struct HttpPlatform {
    client: Client,
    endpoint: url::Url,
    identity: PlatformIdentity,
}

impl HttpPlatform {
    /// Build a client for `identity` against `opts.endpoint`.
    pub fn new(identity: PlatformIdentity, opts: &PlatformOptions) -> Result<Self> {
        let endpoint = url::Url::parse(&opts.endpoint).map_err(|e| {
            SourceBridgeError::config(format!("invalid platform endpoint '{}': {e}", opts.endpoint))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| SourceBridgeError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            identity,
        })
    }

    /// The endpoint this client posts to.
    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }
}

impl std::fmt::Debug for HttpPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPlatform")
            .field("endpoint", &self.endpoint.as_str())
            .field("identity", &self.identity)
            .finish()
    }
}

#[async_trait]
impl Platform for HttpPlatform {
    #[instrument(skip_all, fields(operation = %operation))]
    async fn execute(&self, operation: &str, variables: Value) -> Result<Value> {
        let body = json!({ "operation": operation, "variables": variables });

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.identity.secret)
            .header("X-Organization-Id", &self.identity.organization_id)
            .header("X-Environment-Id", &self.identity.environment_id)
            .json(&body)
            .send()
            .await
            .map_err(|e| SourceBridgeError::Network(format!("{operation}: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SourceBridgeError::Network(format!("{operation}: failed to read body: {e}")))?;

        debug!(%status, bytes = text.len(), "platform responded");

        if !status.is_success() {
            // Prefer the platform's own error messages when the body carries them.
            if let Ok(envelope) = serde_json::from_str::<ResponseEnvelope>(&text) {
                if !envelope.errors.is_empty() {
                    return Err(remote_error(&envelope.errors));
                }
            }
            return Err(SourceBridgeError::Remote(format!(
                "{operation}: HTTP {status}: {}",
                preview(&text)
            )));
        }

        let envelope: ResponseEnvelope = serde_json::from_str(&text).map_err(|e| {
            SourceBridgeError::parse(format!("{operation}: invalid response body: {e}"))
        })?;

        if !envelope.errors.is_empty() {
            return Err(remote_error(&envelope.errors));
        }

        envelope
            .data
            .ok_or_else(|| SourceBridgeError::parse(format!("{operation}: response has no data")))
    }
}

fn remote_error(errors: &[RemoteErrorEntry]) -> SourceBridgeError {
    let joined = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    SourceBridgeError::Remote(joined)
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(ERROR_BODY_PREVIEW) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
