//! Retrieval, queries and completion checks.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde_json::{Value, json};
use tracing::debug;

use sourcebridge_connectors::http_url;
use sourcebridge_platform::fetch_resource;
use sourcebridge_shared::{Args, DefaultsConfig, ParamSpec, Result, SourceBridgeError};

use super::{call, field_or_whole};
use crate::filter::{filter_from_args, filter_params};
use crate::polling::{CompletionTarget, check_completion};
use crate::registry::Dispatcher;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

pub fn id_params(description: &'static str) -> Vec<ParamSpec> {
    vec![ParamSpec::string("id", description).required()]
}

pub fn retrieve_sources_params(defaults: &DefaultsConfig) -> Vec<ParamSpec> {
    let mut params = vec![ParamSpec::string("prompt", "What to retrieve sources for.").required()];
    params.extend(filter_params(defaults.query_limit));
    params
}

pub fn retrieve_images_params(defaults: &DefaultsConfig) -> Vec<ParamSpec> {
    let mut params = vec![ParamSpec::string("url", "URL of the reference image.").required()];
    params.extend(filter_params(defaults.query_limit));
    params
}

pub fn prompt_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("prompt", "Question or instruction.").required(),
        ParamSpec::string("conversationId", "Continue this conversation instead of starting one."),
    ]
}

pub fn query_contents_params(defaults: &DefaultsConfig) -> Vec<ParamSpec> {
    let mut params = vec![ParamSpec::string("search", "Text to search for.")];
    params.extend(filter_params(defaults.query_limit));
    params
}

pub fn named_query_params(defaults: &DefaultsConfig) -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("name", "Only entries whose name contains this text."),
        limit_param(defaults),
    ]
}

pub fn conversation_query_params(defaults: &DefaultsConfig) -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("search", "Only conversations matching this text."),
        limit_param(defaults),
    ]
}

fn limit_param(defaults: &DefaultsConfig) -> ParamSpec {
    ParamSpec::integer("limit", "Maximum number of results.")
        .default_value(defaults.query_limit)
        .range(1.0, 10_000.0)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn retrieve_sources(d: &Dispatcher, args: &Args) -> Result<Value> {
    let filter = filter_from_args(args, d.now())?;
    let data = call(
        d,
        "retrieveSources",
        json!({ "prompt": args.str("prompt")?, "filter": filter }),
    )
    .await?;
    Ok(field_or_whole(data, "retrieveSources"))
}

/// Fetch the reference image, then search for similar ingested images.
pub async fn retrieve_images(d: &Dispatcher, args: &Args) -> Result<Value> {
    let url = http_url(args, "url")?;
    let filter = filter_from_args(args, d.now())?;

    let resource = fetch_resource(url).await?;
    let mime_type = resource
        .content_type
        .filter(|ct| ct.starts_with("image/"))
        .ok_or_else(|| {
            SourceBridgeError::validation(format!("{url} did not return an image content type"))
        })?;
    debug!(bytes = resource.bytes.len(), %mime_type, "reference image fetched");

    let data = call(
        d,
        "retrieveImages",
        json!({
            "uri": url,
            "mimeType": mime_type,
            "data": BASE64.encode(&resource.bytes),
            "filter": filter,
        }),
    )
    .await?;
    Ok(field_or_whole(data, "retrieveImages"))
}

pub async fn prompt_conversation(d: &Dispatcher, args: &Args) -> Result<Value> {
    let mut variables = json!({ "prompt": args.str("prompt")? });
    if let Some(id) = args.opt_str("conversationId") {
        variables["id"] = json!(id);
    }
    let data = call(d, "promptConversation", variables).await?;
    Ok(field_or_whole(data, "promptConversation"))
}

pub async fn query_contents(d: &Dispatcher, args: &Args) -> Result<Value> {
    let filter = filter_from_args(args, d.now())?;
    let data = call(d, "queryContents", json!({ "filter": filter })).await?;
    Ok(field_or_whole(data, "contents"))
}

/// Name-filtered listing of collections or feeds.
pub async fn named_query(d: &Dispatcher, operation: &str, args: &Args) -> Result<Value> {
    let mut filter = json!({ "limit": args.opt_u32("limit") });
    if let Some(name) = args.opt_str("name") {
        filter["name"] = json!(name);
    }
    call(d, operation, json!({ "filter": filter })).await
}

pub async fn query_conversations(d: &Dispatcher, args: &Args) -> Result<Value> {
    let mut filter = json!({ "limit": args.opt_u32("limit") });
    if let Some(search) = args.opt_str("search") {
        filter["search"] = json!(search);
    }
    let data = call(d, "queryConversations", json!({ "filter": filter })).await?;
    Ok(field_or_whole(data, "conversations"))
}

pub async fn is_done(d: &Dispatcher, args: &Args, feed: bool) -> Result<Value> {
    let id = args.str("id")?.to_string();
    let target = if feed {
        CompletionTarget::Feed(id)
    } else {
        CompletionTarget::Content(id)
    };
    let state = check_completion(d.platform(), &target).await?;
    Ok(json!({ "id": target.id(), "done": state.is_done(), "state": state }))
}
