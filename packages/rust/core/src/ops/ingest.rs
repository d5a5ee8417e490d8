//! Connector feeds and single-shot ingestion.

use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde_json::{Value, json};
use tracing::{info, instrument};

use sourcebridge_connectors::{SourceKind, build_feed, http_url};
use sourcebridge_platform::requests::{self, entity_ref};
use sourcebridge_shared::{Args, ParamSpec, Result, SourceBridgeError, duration};

use super::{call, id_payload};
use crate::registry::Dispatcher;

/// Text formats accepted for raw text.
const TEXT_TYPES: &[&str] = &["Plain", "Markdown", "Html"];

/// Largest local file accepted for upload (100 MB).
const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Connector feeds
// ---------------------------------------------------------------------------

/// Build the feed request for `kind`, submit it, return `{id}`.
#[instrument(skip_all, fields(kind = %kind))]
pub async fn feed(d: &Dispatcher, kind: SourceKind, args: &Args) -> Result<Value> {
    let request = build_feed(kind, args, d.credentials(), d.defaults(), d.now())?;
    let feed = requests::create_feed(d.platform(), &request).await?;
    info!(
        feed = %feed,
        name = %request.name,
        recurring = request.schedule_policy.is_some(),
        "feed created"
    );
    Ok(id_payload(&feed))
}

// ---------------------------------------------------------------------------
// Single-shot ingestion
// ---------------------------------------------------------------------------

pub fn url_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("url", "URL of the page or file to ingest.").required(),
        ParamSpec::string("name", "Content name. Defaults to the URL."),
    ]
}

pub async fn url(d: &Dispatcher, args: &Args) -> Result<Value> {
    let uri = http_url(args, "url")?;
    let mut variables = json!({ "uri": uri });
    if let Some(name) = args.opt_str("name") {
        variables["name"] = json!(name);
    }
    let data = call(d, "ingestUri", variables).await?;
    Ok(id_payload(&entity_ref("ingestUri", data)?))
}

pub fn text_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("text", "Text to ingest.").required(),
        ParamSpec::string("name", "Content name.").required(),
        ParamSpec::enumeration("textType", "Format of the text.", TEXT_TYPES)
            .default_value("Markdown"),
        ParamSpec::string("url", "Original location of the text, if any."),
    ]
}

pub async fn text(d: &Dispatcher, args: &Args) -> Result<Value> {
    let mut variables = json!({
        "name": args.str("name")?,
        "text": args.str("text")?,
        "textType": args.opt_str("textType").unwrap_or("Markdown"),
    });
    if let Some(uri) = args.opt_str("url") {
        variables["uri"] = json!(uri);
    }
    let data = call(d, "ingestText", variables).await?;
    Ok(id_payload(&entity_ref("ingestText", data)?))
}

pub fn file_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("filePath", "Absolute path of the local file.").required(),
        ParamSpec::string("name", "Content name. Defaults to the file name."),
    ]
}

/// Read a local file and upload it base64-encoded.
pub async fn file(d: &Dispatcher, args: &Args) -> Result<Value> {
    let path = Path::new(args.str("filePath")?);

    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| SourceBridgeError::io(path, e))?;
    if !meta.is_file() {
        return Err(SourceBridgeError::validation(format!(
            "{} is not a regular file",
            path.display()
        )));
    }
    if meta.len() > MAX_FILE_SIZE {
        return Err(SourceBridgeError::validation(format!(
            "{} is too large ({} bytes, max {MAX_FILE_SIZE})",
            path.display(),
            meta.len()
        )));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| SourceBridgeError::io(path, e))?;

    let name = args
        .opt_str("name")
        .map(String::from)
        .or_else(|| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "upload".to_string());

    let data = call(
        d,
        "ingestEncodedFile",
        json!({
            "name": name,
            "mimeType": mime_type(path),
            "data": BASE64.encode(&bytes),
        }),
    )
    .await?;
    Ok(id_payload(&entity_ref("ingestEncodedFile", data)?))
}

pub fn memory_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("text", "Memory text.").required(),
        ParamSpec::string("name", "Memory name."),
        ParamSpec::string(
            "expiration",
            "Forget the memory after this ISO-8601 duration, e.g. P30D.",
        ),
    ]
}

pub async fn memory(d: &Dispatcher, args: &Args) -> Result<Value> {
    let mut variables = json!({ "text": args.str("text")?, "textType": "Plain" });
    if let Some(name) = args.opt_str("name") {
        variables["name"] = json!(name);
    }
    if let Some(expiration) = args.opt_str("expiration").map(str::trim) {
        if duration::parse_millis(expiration)? == 0 {
            return Err(SourceBridgeError::validation("expiration must be longer than zero"));
        }
        variables["expiration"] = json!(expiration);
    }
    let data = call(d, "ingestMemory", variables).await?;
    Ok(id_payload(&entity_ref("ingestMemory", data)?))
}

/// Media type from the file extension; the platform sniffs anything unknown.
fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("pptx") => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("html") | Some("htm") => "text/html",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}
