//! Notification side effects.

use serde_json::{Value, json};

use sourcebridge_connectors::{SourceKind, http_url, requirements};
use sourcebridge_shared::{Args, ParamSpec, Result, SourceBridgeError};

use super::{call, credentials_for, credentials_with};
use crate::registry::Dispatcher;

const TEXT_TYPES: &[&str] = &["Plain", "Markdown", "Html"];

/// X/Twitter post length limit.
const MAX_TWEET_CHARS: usize = 280;

fn text_param() -> ParamSpec {
    ParamSpec::string("text", "Message text.").required()
}

pub fn webhook_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("url", "Webhook URL.").required(),
        text_param(),
    ]
}

pub async fn webhook(d: &Dispatcher, args: &Args) -> Result<Value> {
    let url = http_url(args, "url")?;
    call(
        d,
        "sendWebHookNotification",
        json!({ "uri": url, "text": args.str("text")? }),
    )
    .await
}

pub fn slack_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("channelName", "Slack channel name without '#'.").required(),
        text_param(),
        ParamSpec::enumeration("textType", "Format of the text.", TEXT_TYPES)
            .default_value("Markdown"),
    ]
}

pub async fn slack(d: &Dispatcher, args: &Args) -> Result<Value> {
    let creds = credentials_for(d, SourceKind::Slack)?;
    call(
        d,
        "sendSlackNotification",
        json!({
            "token": creds.require("SLACK_BOT_TOKEN")?.expose(),
            "channel": args.str("channelName")?.trim_start_matches('#'),
            "text": args.str("text")?,
            "textType": args.opt_str("textType").unwrap_or("Markdown"),
        }),
    )
    .await
}

pub fn twitter_params() -> Vec<ParamSpec> {
    vec![text_param()]
}

pub async fn twitter(d: &Dispatcher, args: &Args) -> Result<Value> {
    let text = args.str("text")?;
    let chars = text.chars().count();
    if chars > MAX_TWEET_CHARS {
        return Err(SourceBridgeError::validation(format!(
            "post is {chars} characters, the limit is {MAX_TWEET_CHARS}"
        )));
    }
    let creds = credentials_with(d, &requirements::TWITTER_NOTIFICATION)?;
    call(
        d,
        "sendTwitterNotification",
        json!({
            "consumerKey": creds.require("TWITTER_CONSUMER_API_KEY")?.expose(),
            "consumerSecret": creds.require("TWITTER_CONSUMER_API_SECRET")?.expose(),
            "accessTokenKey": creds.require("TWITTER_ACCESS_TOKEN_KEY")?.expose(),
            "accessTokenSecret": creds.require("TWITTER_ACCESS_TOKEN_SECRET")?.expose(),
            "text": text,
        }),
    )
    .await
}

pub fn email_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string_list("to", "Recipient email addresses.").required(),
        ParamSpec::string("subject", "Subject line.").required(),
        text_param(),
        ParamSpec::enumeration("textType", "Format of the text.", TEXT_TYPES)
            .default_value("Markdown"),
    ]
}

pub async fn email(d: &Dispatcher, args: &Args) -> Result<Value> {
    let to = args.str_list("to");
    if to.is_empty() {
        return Err(SourceBridgeError::validation("parameter 'to' needs at least one address"));
    }
    if let Some(bad) = to.iter().find(|addr| !looks_like_email(addr)) {
        return Err(SourceBridgeError::validation(format!(
            "'{bad}' is not an email address"
        )));
    }
    call(
        d,
        "sendEmailNotification",
        json!({
            "to": to,
            "subject": args.str("subject")?,
            "text": args.str("text")?,
            "textType": args.opt_str("textType").unwrap_or("Markdown"),
        }),
    )
    .await
}

fn looks_like_email(addr: &str) -> bool {
    match addr.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !addr.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_check() {
        assert!(looks_like_email("ops@example.com"));
        assert!(!looks_like_email("ops@localhost"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("a b@example.com"));
    }
}
