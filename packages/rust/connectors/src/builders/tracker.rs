//! Issue trackers and the Notion knowledge base.

use serde::Serialize;

use sourcebridge_shared::{ParamSpec, Result, SourceBridgeError};

use super::BuildContext;
use super::storage::github_repository;
use crate::ConnectorConfig;
use crate::credentials::Secret;

// ---------------------------------------------------------------------------
// Linear
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearProperties {
    pub key: Secret,
    pub project: String,
    pub read_limit: u32,
}

pub fn linear_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("projectName", "Linear project name (see list_linear_projects).")
            .required(),
    ]
}

pub fn linear(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    Ok(ConnectorConfig::Linear(LinearProperties {
        key: ctx.secret("LINEAR_API_KEY")?,
        project: ctx.required("projectName")?,
        read_limit: ctx.read_limit,
    }))
}

// ---------------------------------------------------------------------------
// GitHub issues
// ---------------------------------------------------------------------------

pub fn github_issues(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    github_repository(ctx).map(ConnectorConfig::GitHubIssues)
}

// ---------------------------------------------------------------------------
// Jira
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraProperties {
    pub uri: String,
    pub project: String,
    pub email: Secret,
    pub token: Secret,
    pub read_limit: u32,
}

pub fn jira_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("url", "Atlassian site URL, e.g. https://example.atlassian.net.")
            .required(),
        ParamSpec::string("projectKey", "Jira project key, e.g. PROJ.").required(),
    ]
}

pub fn jira(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    Ok(ConnectorConfig::Jira(JiraProperties {
        uri: ctx.required("url")?,
        project: ctx.required("projectKey")?,
        email: ctx.secret("JIRA_EMAIL")?,
        token: ctx.secret("JIRA_TOKEN")?,
        read_limit: ctx.read_limit,
    }))
}

// ---------------------------------------------------------------------------
// Notion
// ---------------------------------------------------------------------------

/// What the Notion identifiers point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotionType {
    Page,
    Database,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotionProperties {
    pub token: Secret,
    pub notion_type: NotionType,
    pub identifiers: Vec<String>,
    pub is_recursive: bool,
    pub read_limit: u32,
}

pub fn notion_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("pageId", "Notion page identifier. Provide this or databaseId."),
        ParamSpec::string(
            "databaseId",
            "Notion database identifier (see list_notion_databases). Provide this or pageId.",
        ),
        ParamSpec::boolean("recursive", "Also read child pages.").default_value(true),
    ]
}

pub fn notion(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    let (notion_type, id) = match (ctx.optional("pageId"), ctx.optional("databaseId")) {
        (Some(page), None) => (NotionType::Page, page),
        (None, Some(db)) => (NotionType::Database, db),
        (Some(_), Some(_)) => {
            return Err(SourceBridgeError::validation(
                "provide either 'pageId' or 'databaseId', not both",
            ));
        }
        (None, None) => {
            return Err(SourceBridgeError::validation(
                "one of 'pageId' or 'databaseId' is required",
            ));
        }
    };

    Ok(ConnectorConfig::Notion(NotionProperties {
        token: ctx.secret("NOTION_API_KEY")?,
        notion_type,
        identifiers: vec![id],
        is_recursive: ctx.recursive(),
        read_limit: ctx.read_limit,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::testing::*;
    use crate::credentials::requirements;
    use sourcebridge_shared::Args;

    #[test]
    fn jira_forwards_site_and_project() {
        let creds = resolved(
            &requirements::JIRA,
            &[("JIRA_EMAIL", "me@example.com"), ("JIRA_TOKEN", "jt")],
        );
        let args = Args::new()
            .with("url", "https://example.atlassian.net")
            .with("projectKey", "PROJ");

        let json = serde_json::to_value(jira(&context(&args, &creds)).unwrap()).unwrap();
        assert_eq!(json["type"], "Jira");
        assert_eq!(json["uri"], "https://example.atlassian.net");
        assert_eq!(json["project"], "PROJ");
        assert_eq!(json["email"], "me@example.com");
    }

    #[test]
    fn github_issues_shares_repository_shape() {
        let creds = resolved(&requirements::GITHUB, &[("GITHUB_PERSONAL_ACCESS_TOKEN", "ghp")]);
        let args = Args::new().with("repoOwner", "tokio-rs").with("repoName", "tokio");

        let json = serde_json::to_value(github_issues(&context(&args, &creds)).unwrap()).unwrap();
        assert_eq!(json["type"], "GitHubIssues");
        assert_eq!(json["repositoryName"], "tokio");
    }

    #[test]
    fn notion_needs_exactly_one_identifier() {
        let creds = resolved(&requirements::NOTION, &[("NOTION_API_KEY", "secret_x")]);

        let args = Args::new();
        assert!(notion(&context(&args, &creds)).is_err());

        let args = Args::new().with("pageId", "p").with("databaseId", "d");
        assert!(notion(&context(&args, &creds)).is_err());

        let args = Args::new().with("databaseId", "d");
        let config = notion(&context(&args, &creds)).unwrap();
        match config {
            ConnectorConfig::Notion(props) => {
                assert_eq!(props.notion_type, NotionType::Database);
                assert_eq!(props.identifiers, vec!["d".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
