//! Fetching caller-referenced external resources (e.g. an image URL for
//! similarity search) before handing their bytes to the platform.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument};

use sourcebridge_shared::{Result, SourceBridgeError};

use crate::USER_AGENT;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// Timeout in seconds for resource fetches.
const FETCH_TIMEOUT_SECS: u64 = 30;

/// Largest resource we accept (20 MB).
const MAX_RESOURCE_SIZE: u64 = 20 * 1024 * 1024;

/// Bytes and declared media type of a fetched resource.
#[derive(Debug, Clone)]
pub struct FetchedResource {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// GET `url` and return its body.
///
/// Unreachable resources and non-2xx statuses are validation errors: the
/// caller pointed at something unusable.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch_resource(url: &str) -> Result<FetchedResource> {
    let parsed = url::Url::parse(url)
        .map_err(|e| SourceBridgeError::validation(format!("invalid URL '{url}': {e}")))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(SourceBridgeError::validation(format!(
            "unsupported URL scheme '{}': expected http or https",
            parsed.scheme()
        )));
    }

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .map_err(|e| SourceBridgeError::Network(format!("failed to build HTTP client: {e}")))?;

    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| SourceBridgeError::validation(format!("failed to fetch {url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceBridgeError::validation(format!(
            "failed to fetch {url}: HTTP {status}"
        )));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());

    let bytes = read_capped(response, url, MAX_RESOURCE_SIZE).await?;

    debug!(bytes = bytes.len(), ?content_type, "resource fetched");

    Ok(FetchedResource {
        bytes,
        content_type,
    })
}

/// Read the body chunk by chunk, failing as soon as it passes `limit`.
///
/// `Content-Length` is only a hint: chunked and length-less bodies are
/// counted as they arrive.
async fn read_capped(mut response: reqwest::Response, url: &str, limit: u64) -> Result<Vec<u8>> {
    let too_large = |len: u64| {
        SourceBridgeError::validation(format!(
            "{url}: resource too large ({len} bytes, max {limit})"
        ))
    };

    let declared = response.content_length();
    if let Some(len) = declared.filter(|len| *len > limit) {
        return Err(too_large(len));
    }

    let mut bytes = Vec::with_capacity(declared.unwrap_or(0) as usize);
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| SourceBridgeError::validation(format!("{url}: failed to read body: {e}")))?
    {
        let total = (bytes.len() + chunk.len()) as u64;
        if total > limit {
            debug!(total, limit, "body passed the size cap, aborting");
            return Err(too_large(total));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}
