//! Project configuration and usage.

use serde_json::{Map, Value, json};
use tracing::info;

use sourcebridge_shared::{Args, ParamSpec, Result, SourceBridgeError, duration};

use super::{call, field_or_whole};
use crate::pagination::collect_usage;
use crate::registry::Dispatcher;

pub fn configure_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("name", "New project name."),
        ParamSpec::string("callbackUri", "URL the platform calls when ingestion events occur."),
        ParamSpec::string("specificationId", "Default LLM specification for conversations."),
        ParamSpec::string("workflowId", "Default workflow applied to new content."),
    ]
}

pub async fn configure(d: &Dispatcher, args: &Args) -> Result<Value> {
    let mut project = Map::new();
    if let Some(name) = args.opt_str("name") {
        project.insert("name".into(), json!(name));
    }
    if let Some(uri) = args.opt_str("callbackUri") {
        project.insert("callbackUri".into(), json!(uri));
    }
    if let Some(id) = args.opt_str("specificationId") {
        project.insert("specification".into(), json!({ "id": id }));
    }
    if let Some(id) = args.opt_str("workflowId") {
        project.insert("workflow".into(), json!({ "id": id }));
    }
    if project.is_empty() {
        return Err(SourceBridgeError::validation(
            "nothing to configure: pass name, callbackUri, specificationId or workflowId",
        ));
    }

    let data = call(d, "updateProject", json!({ "project": project })).await?;
    Ok(field_or_whole(data, "project"))
}

pub async fn get(d: &Dispatcher) -> Result<Value> {
    let data = call(d, "getProject", json!({})).await?;
    Ok(field_or_whole(data, "project"))
}

pub fn usage_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string(
            "inLast",
            "Window ending now, as an ISO-8601 duration, e.g. PT1H or P1D.",
        )
        .default_value("PT1H"),
    ]
}

/// Every usage record in the last `inLast`, across as many pages as needed.
pub async fn usage(d: &Dispatcher, args: &Args) -> Result<Value> {
    let window = args.str("inLast")?.trim().to_string();
    let millis = duration::parse_millis(&window)?;
    let span = i64::try_from(millis)
        .ok()
        .and_then(chrono::Duration::try_milliseconds)
        .ok_or_else(|| SourceBridgeError::validation(format!("inLast '{window}' is too large")))?;
    let start = d
        .now()
        .checked_sub_signed(span)
        .ok_or_else(|| SourceBridgeError::validation(format!("inLast '{window}' is too large")))?;

    let defaults = d.defaults();
    let records = collect_usage(
        d.platform(),
        start,
        &window,
        defaults.usage_page_size,
        defaults.max_usage_pages,
    )
    .await?;

    info!(records = records.len(), window = %window, "usage collected");
    Ok(Value::Array(records.into_iter().map(Value::Object).collect()))
}
