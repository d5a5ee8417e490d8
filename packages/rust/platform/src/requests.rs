//! Typed helpers for the platform operations the dispatch layer relies on.
//!
//! Everything else goes through [`Platform::execute`] as a pass-through.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use sourcebridge_shared::{EntityRef, Result, SourceBridgeError};

use crate::Platform;

/// Operation names understood by the platform.
pub mod op {
    pub const CREATE_FEED: &str = "createFeed";
    pub const IS_FEED_DONE: &str = "isFeedDone";
    pub const IS_CONTENT_DONE: &str = "isContentDone";
    pub const QUERY_PROJECT_USAGE: &str = "queryProjectUsage";
}

/// One page request against the usage ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageQuery {
    pub start_date: DateTime<Utc>,
    /// ISO-8601 window length starting at `start_date`.
    pub duration: String,
    pub offset: u32,
    pub limit: u32,
}

/// Submit a feed creation request; returns the new feed reference.
pub async fn create_feed<T: Serialize + Sync>(
    platform: &dyn Platform,
    feed: &T,
) -> Result<EntityRef> {
    let variables = json!({ "feed": feed });
    let data = platform.execute(op::CREATE_FEED, variables).await?;
    entity_ref(op::CREATE_FEED, data)
}

/// Point-in-time completion check for a feed.
pub async fn is_feed_done(platform: &dyn Platform, id: &str) -> Result<bool> {
    let data = platform
        .execute(op::IS_FEED_DONE, json!({ "id": id }))
        .await?;
    boolean_result(op::IS_FEED_DONE, &data)
}

/// Point-in-time completion check for a content item.
pub async fn is_content_done(platform: &dyn Platform, id: &str) -> Result<bool> {
    let data = platform
        .execute(op::IS_CONTENT_DONE, json!({ "id": id }))
        .await?;
    boolean_result(op::IS_CONTENT_DONE, &data)
}

/// Fetch one page of raw usage records.
pub async fn query_usage(platform: &dyn Platform, query: &UsageQuery) -> Result<Vec<Value>> {
    let variables = serde_json::to_value(query)
        .map_err(|e| SourceBridgeError::parse(format!("usage query: {e}")))?;
    let data = platform.execute(op::QUERY_PROJECT_USAGE, variables).await?;

    match data.get("usage") {
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(other) => Err(SourceBridgeError::parse(format!(
            "{}: expected usage array, got {other}",
            op::QUERY_PROJECT_USAGE
        ))),
    }
}

/// Extract an `{id}` reference from a `data` payload.
pub fn entity_ref(operation: &str, data: Value) -> Result<EntityRef> {
    serde_json::from_value(data)
        .map_err(|e| SourceBridgeError::parse(format!("{operation}: expected {{id}}: {e}")))
}

fn boolean_result(operation: &str, data: &Value) -> Result<bool> {
    data.get("result")
        .and_then(Value::as_bool)
        .ok_or_else(|| SourceBridgeError::parse(format!("{operation}: expected boolean result")))
}
