//! Remote content-intelligence platform client.
//!
//! Every operation SourceBridge exposes ends in exactly one call through the
//! [`Platform`] trait: a named operation plus JSON variables in, a JSON
//! `data` payload out. [`HttpPlatform`] is the production implementation;
//! tests substitute scripted in-memory platforms.
//!
//! The platform owns all job lifecycles. This crate never retries.

mod client;
mod fetch;
pub mod requests;

use async_trait::async_trait;
use serde_json::Value;
use sourcebridge_shared::Result;

pub use client::{HttpPlatform, PlatformOptions};
pub use fetch::{FetchedResource, fetch_resource};
pub use requests::UsageQuery;

/// User-Agent string for platform and resource requests.
const USER_AGENT: &str = concat!("SourceBridge/", env!("CARGO_PKG_VERSION"));

/// The remote platform, as seen by the dispatch layer.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Execute `operation` with `variables`, returning the `data` payload.
    ///
    /// Transport failures map to `Network`; platform-side rejections map to
    /// `Remote` with the platform's message forwarded verbatim.
    async fn execute(&self, operation: &str, variables: Value) -> Result<Value>;
}
