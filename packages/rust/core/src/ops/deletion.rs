//! Per-entity and bulk deletion.

use serde_json::{Value, json};
use tracing::warn;

use sourcebridge_shared::{Args, DefaultsConfig, ParamSpec, Result};

use super::call;
use crate::filter::{filter_from_args, filter_params};
use crate::registry::Dispatcher;

/// Feed types accepted by `delete_feeds`.
const FEED_TYPES: &[&str] = &[
    "Discord", "Email", "Issue", "MicrosoftTeams", "Notion", "Reddit", "Rss", "Search", "Site",
    "Slack", "Twitter", "Web",
];

pub fn delete_contents_params(defaults: &DefaultsConfig) -> Vec<ParamSpec> {
    filter_params(defaults.query_limit)
}

pub fn delete_feeds_params() -> Vec<ParamSpec> {
    let mut params = vec![ParamSpec::enumeration(
        "feedType",
        "Only delete feeds of this type.",
        FEED_TYPES,
    )];
    params.extend(limit_params());
    params
}

pub fn limit_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::integer("limit", "Maximum number of entities to delete.")
            .default_value(100)
            .range(1.0, 10_000.0),
    ]
}

pub async fn delete_one(d: &Dispatcher, operation: &str, args: &Args) -> Result<Value> {
    let id = args.str("id")?;
    call(d, operation, json!({ "id": id })).await?;
    Ok(json!({ "id": id, "deleted": true }))
}

/// Delete every content item matching the filter.
pub async fn delete_contents(d: &Dispatcher, args: &Args) -> Result<Value> {
    let filter = filter_from_args(args, d.now())?;
    if filter.is_unrestricted() {
        warn!("deleting contents without a restricting filter");
    }
    call(
        d,
        "deleteAllContents",
        json!({ "filter": filter, "isSynchronous": true }),
    )
    .await
}

pub async fn delete_feeds(d: &Dispatcher, args: &Args) -> Result<Value> {
    let mut filter = json!({ "limit": args.opt_u32("limit") });
    if let Some(feed_type) = args.opt_str("feedType") {
        filter["types"] = json!([feed_type]);
    }
    call(
        d,
        "deleteAllFeeds",
        json!({ "filter": filter, "isSynchronous": true }),
    )
    .await
}

pub async fn delete_all(d: &Dispatcher, operation: &str, args: &Args) -> Result<Value> {
    call(
        d,
        operation,
        json!({ "filter": { "limit": args.opt_u32("limit") }, "isSynchronous": true }),
    )
    .await
}
