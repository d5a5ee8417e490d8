//! Social feeds.

use serde::Serialize;

use sourcebridge_shared::{ParamSpec, Result};

use super::BuildContext;
use crate::ConnectorConfig;
use crate::credentials::Secret;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterPostsProperties {
    pub token: Secret,
    pub user_name: String,
    pub read_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterSearchProperties {
    pub token: Secret,
    pub query: String,
    pub read_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedditProperties {
    pub subreddit_name: String,
    pub read_limit: u32,
}

pub fn twitter_posts_params() -> Vec<ParamSpec> {
    vec![ParamSpec::string("userName", "X/Twitter handle, with or without '@'.").required()]
}

pub fn twitter_posts(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    let user = ctx.required("userName")?;
    Ok(ConnectorConfig::TwitterPosts(TwitterPostsProperties {
        token: ctx.secret("TWITTER_TOKEN")?,
        user_name: user.trim_start_matches('@').to_string(),
        read_limit: ctx.read_limit,
    }))
}

pub fn twitter_search_params() -> Vec<ParamSpec> {
    vec![ParamSpec::string("query", "X/Twitter search query, e.g. #rustlang -is:retweet.").required()]
}

pub fn twitter_search(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    Ok(ConnectorConfig::TwitterSearch(TwitterSearchProperties {
        token: ctx.secret("TWITTER_TOKEN")?,
        query: ctx.required("query")?,
        read_limit: ctx.read_limit,
    }))
}

pub fn reddit_params() -> Vec<ParamSpec> {
    vec![ParamSpec::string("subredditName", "Subreddit name, with or without 'r/'.").required()]
}

pub fn reddit(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    let name = ctx.required("subredditName")?;
    Ok(ConnectorConfig::Reddit(RedditProperties {
        subreddit_name: name.trim_start_matches("r/").to_string(),
        read_limit: ctx.read_limit,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::testing::*;
    use crate::credentials::{CredentialRequirement, requirements};
    use sourcebridge_shared::Args;

    #[test]
    fn reddit_needs_no_credentials() {
        let creds = resolved(&CredentialRequirement::none(), &[]);
        let args = Args::new().with("subredditName", "r/rust");

        let json = serde_json::to_value(reddit(&context(&args, &creds)).unwrap()).unwrap();
        assert_eq!(json["type"], "Reddit");
        assert_eq!(json["subredditName"], "rust");
    }

    #[test]
    fn twitter_posts_strips_at_sign() {
        let creds = resolved(&requirements::TWITTER, &[("TWITTER_TOKEN", "tt")]);
        let args = Args::new().with("userName", "@rustlang");

        let json = serde_json::to_value(twitter_posts(&context(&args, &creds)).unwrap()).unwrap();
        assert_eq!(json["userName"], "rustlang");
        assert_eq!(json["token"], "tt");
    }

    #[test]
    fn twitter_search_forwards_query_verbatim() {
        let creds = resolved(&requirements::TWITTER, &[("TWITTER_TOKEN", "tt")]);
        let args = Args::new().with("query", "#rustlang -is:retweet");

        let json =
            serde_json::to_value(twitter_search(&context(&args, &creds)).unwrap()).unwrap();
        assert_eq!(json["type"], "TwitterSearch");
        assert_eq!(json["query"], "#rustlang -is:retweet");
    }
}
