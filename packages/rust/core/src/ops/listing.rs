//! Enumerate what a connector can see before ingesting from it.

use serde_json::{Value, json};

use sourcebridge_connectors::{ResolvedCredentials, SourceKind};
use sourcebridge_shared::{Args, ParamSpec, Result};

use super::{call, credentials_for};
use crate::registry::Dispatcher;

pub fn sharepoint_folder_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("libraryId", "Library id from list_sharepoint_libraries.").required(),
    ]
}

pub async fn slack_channels(d: &Dispatcher) -> Result<Value> {
    let creds = credentials_for(d, SourceKind::Slack)?;
    let properties = json!({ "token": creds.require("SLACK_BOT_TOKEN")?.expose() });
    call(d, "querySlackChannels", json!({ "properties": properties })).await
}

pub async fn microsoft_teams(d: &Dispatcher) -> Result<Value> {
    let creds = credentials_for(d, SourceKind::MicrosoftTeams)?;
    let properties = oauth_properties(&creds, "MICROSOFT_TEAMS")?;
    call(d, "queryMicrosoftTeamsTeams", json!({ "properties": properties })).await
}

pub async fn notion_databases(d: &Dispatcher) -> Result<Value> {
    let creds = credentials_for(d, SourceKind::Notion)?;
    let properties = json!({ "token": creds.require("NOTION_API_KEY")?.expose() });
    call(d, "queryNotionDatabases", json!({ "properties": properties })).await
}

pub async fn linear_projects(d: &Dispatcher) -> Result<Value> {
    let creds = credentials_for(d, SourceKind::Linear)?;
    let properties = json!({ "key": creds.require("LINEAR_API_KEY")?.expose() });
    call(d, "queryLinearProjects", json!({ "properties": properties })).await
}

pub async fn sharepoint_libraries(d: &Dispatcher) -> Result<Value> {
    let properties = sharepoint_properties(d)?;
    call(d, "querySharePointLibraries", json!({ "properties": properties })).await
}

pub async fn sharepoint_folders(d: &Dispatcher, args: &Args) -> Result<Value> {
    let properties = sharepoint_properties(d)?;
    call(
        d,
        "querySharePointFolders",
        json!({ "properties": properties, "libraryId": args.str("libraryId")? }),
    )
    .await
}

fn sharepoint_properties(d: &Dispatcher) -> Result<Value> {
    let creds = credentials_for(d, SourceKind::SharePoint)?;
    let mut properties = oauth_properties(&creds, "SHAREPOINT")?;
    properties["accountName"] = json!(creds.require("SHAREPOINT_ACCOUNT_NAME")?.expose());
    Ok(properties)
}

fn oauth_properties(creds: &ResolvedCredentials, prefix: &str) -> Result<Value> {
    Ok(json!({
        "clientId": creds.require(&format!("{prefix}_CLIENT_ID"))?.expose(),
        "clientSecret": creds.require(&format!("{prefix}_CLIENT_SECRET"))?.expose(),
        "refreshToken": creds.require(&format!("{prefix}_REFRESH_TOKEN"))?.expose(),
    }))
}
