//! Screenshots, image description and generated media.

use serde_json::{Value, json};

use sourcebridge_connectors::http_url;
use sourcebridge_platform::requests::entity_ref;
use sourcebridge_shared::{Args, ParamSpec, Result};

use super::{call, field_or_whole, id_payload};
use crate::registry::Dispatcher;

pub fn screenshot_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("url", "Page to capture.").required(),
        ParamSpec::integer("maximumHeight", "Crop the capture to this many pixels.")
            .range(100.0, 20_000.0),
    ]
}

pub async fn screenshot(d: &Dispatcher, args: &Args) -> Result<Value> {
    let mut variables = json!({ "uri": http_url(args, "url")? });
    if let Some(height) = args.opt_u32("maximumHeight") {
        variables["maximumHeight"] = json!(height);
    }
    let data = call(d, "screenshotPage", variables).await?;
    Ok(id_payload(&entity_ref("screenshotPage", data)?))
}

pub fn describe_image_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("url", "Image URL.").required(),
        ParamSpec::string("prompt", "What to describe.")
            .default_value("Describe this image in detail."),
    ]
}

pub async fn describe_image(d: &Dispatcher, args: &Args) -> Result<Value> {
    let data = call(
        d,
        "describeImageUrl",
        json!({ "uri": http_url(args, "url")?, "prompt": args.str("prompt")? }),
    )
    .await?;
    Ok(field_or_whole(data, "describeImageUrl"))
}

pub fn audio_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("text", "Text to narrate.").required(),
        ParamSpec::string("name", "Name of the generated content."),
        ParamSpec::string("voice", "Voice identifier of the speech model."),
    ]
}

pub async fn audio(d: &Dispatcher, args: &Args) -> Result<Value> {
    let mut variables = json!({ "text": args.str("text")? });
    if let Some(name) = args.opt_str("name") {
        variables["name"] = json!(name);
    }
    if let Some(voice) = args.opt_str("voice") {
        variables["voice"] = json!(voice);
    }
    call(d, "publishAudio", variables).await
}

pub fn image_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("prompt", "What to draw.").required(),
        ParamSpec::string("name", "Name of the generated content."),
        ParamSpec::integer("count", "Number of images.")
            .default_value(1)
            .range(1.0, 4.0),
    ]
}

pub async fn image(d: &Dispatcher, args: &Args) -> Result<Value> {
    let mut variables = json!({
        "prompt": args.str("prompt")?,
        "count": args.opt_u32("count").unwrap_or(1),
    });
    if let Some(name) = args.opt_str("name") {
        variables["name"] = json!(name);
    }
    call(d, "publishImage", variables).await
}

