//! Web crawl, RSS and web search.

use serde::Serialize;

use sourcebridge_shared::{ParamSpec, Result};

use super::BuildContext;
use crate::{ConnectorConfig, address};

/// Web search backends the platform can query.
pub const SEARCH_SERVICES: &[&str] = &["Tavily", "Exa", "Podscan"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebProperties {
    pub uri: String,
    pub include_files: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_paths: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded_paths: Vec<String>,
    pub read_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RssProperties {
    pub uri: String,
    pub read_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProperties {
    pub text: String,
    pub service_type: String,
    pub read_limit: u32,
}

pub fn web_crawl_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("url", "Site URL to crawl, e.g. https://example.com.").required(),
        ParamSpec::boolean("includeFiles", "Also ingest linked files (PDF, DOCX, ...).")
            .default_value(false),
        ParamSpec::string_list(
            "allowedPaths",
            "Only crawl URL paths matching these regular expressions.",
        ),
        ParamSpec::string_list("excludedPaths", "Skip URL paths matching these regular expressions."),
    ]
}

pub fn web_crawl(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    Ok(ConnectorConfig::Web(WebProperties {
        uri: http_url(ctx, "url")?,
        include_files: ctx.args.flag("includeFiles"),
        allowed_paths: ctx.args.str_list("allowedPaths"),
        excluded_paths: ctx.args.str_list("excludedPaths"),
        read_limit: ctx.read_limit,
    }))
}

pub fn rss_params() -> Vec<ParamSpec> {
    vec![ParamSpec::string("url", "RSS or Atom feed URL.").required()]
}

pub fn rss(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    Ok(ConnectorConfig::Rss(RssProperties {
        uri: http_url(ctx, "url")?,
        read_limit: ctx.read_limit,
    }))
}

pub fn web_search_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("query", "Search query.").required(),
        ParamSpec::enumeration("searchService", "Search backend.", SEARCH_SERVICES)
            .default_value("Tavily"),
    ]
}

pub fn web_search(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    Ok(ConnectorConfig::Search(SearchProperties {
        text: ctx.required("query")?,
        service_type: ctx
            .optional("searchService")
            .unwrap_or_else(|| SEARCH_SERVICES[0].to_string()),
        read_limit: ctx.read_limit,
    }))
}

fn http_url(ctx: &BuildContext<'_>, name: &str) -> Result<String> {
    address::http_url(ctx.args, name).map(str::to_string)
}
