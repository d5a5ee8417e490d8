//! Cloud-drive and repository file sources.

use serde::Serialize;

use sourcebridge_shared::{ParamSpec, Result, SourceBridgeError};

use super::{BuildContext, OAuthApp};
use crate::ConnectorConfig;
use crate::credentials::Secret;

// ---------------------------------------------------------------------------
// Google Drive
// ---------------------------------------------------------------------------

/// How a Google Drive feed authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GoogleDriveAuth {
    ServiceAccount,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleDriveProperties {
    pub authentication_type: GoogleDriveAuth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account_json: Option<Secret>,
    #[serde(flatten)]
    pub oauth: Option<OAuthApp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    pub is_recursive: bool,
    pub read_limit: u32,
}

pub fn google_drive_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string(
            "folderId",
            "Google Drive folder identifier. Omit to read the whole drive.",
        ),
        ParamSpec::string_list("files", "Specific Google Drive file identifiers to ingest."),
        recursive_param(),
    ]
}

/// The service-account form takes precedence over the user OAuth triple.
pub fn google_drive(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    let (authentication_type, service_account_json, oauth) = match ctx.credentials.alternative() {
        0 => (
            GoogleDriveAuth::ServiceAccount,
            Some(ctx.secret("GOOGLE_DRIVE_SERVICE_ACCOUNT_JSON")?),
            None,
        ),
        _ => (
            GoogleDriveAuth::User,
            None,
            Some(ctx.oauth("GOOGLE_DRIVE")?),
        ),
    };

    Ok(ConnectorConfig::GoogleDrive(GoogleDriveProperties {
        authentication_type,
        service_account_json,
        oauth,
        folder_id: ctx.optional("folderId"),
        files: ctx.args.str_list("files"),
        is_recursive: ctx.recursive(),
        read_limit: ctx.read_limit,
    }))
}

// ---------------------------------------------------------------------------
// OneDrive
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OneDriveProperties {
    #[serde(flatten)]
    pub oauth: OAuthApp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    pub is_recursive: bool,
    pub read_limit: u32,
}

pub fn onedrive_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("folderId", "OneDrive folder identifier. Omit to read the root."),
        ParamSpec::string_list("files", "Specific OneDrive file identifiers to ingest."),
        recursive_param(),
    ]
}

pub fn onedrive(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    Ok(ConnectorConfig::OneDrive(OneDriveProperties {
        oauth: ctx.oauth("ONEDRIVE")?,
        folder_id: ctx.optional("folderId"),
        files: ctx.args.str_list("files"),
        is_recursive: ctx.recursive(),
        read_limit: ctx.read_limit,
    }))
}

// ---------------------------------------------------------------------------
// SharePoint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePointProperties {
    pub account_name: Secret,
    #[serde(flatten)]
    pub oauth: OAuthApp,
    pub library_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    pub is_recursive: bool,
    pub read_limit: u32,
}

pub fn sharepoint_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string(
            "libraryId",
            "SharePoint document library identifier (see list_sharepoint_libraries).",
        )
        .required(),
        ParamSpec::string(
            "folderId",
            "Folder within the library (see list_sharepoint_folders). Omit for the library root.",
        ),
        recursive_param(),
    ]
}

pub fn sharepoint(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    Ok(ConnectorConfig::SharePoint(SharePointProperties {
        account_name: ctx.secret("SHAREPOINT_ACCOUNT_NAME")?,
        oauth: ctx.oauth("SHAREPOINT")?,
        library_id: ctx.required("libraryId")?,
        folder_id: ctx.optional("folderId"),
        is_recursive: ctx.recursive(),
        read_limit: ctx.read_limit,
    }))
}

// ---------------------------------------------------------------------------
// Dropbox
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropboxProperties {
    pub app_key: Secret,
    pub app_secret: Secret,
    pub redirect_uri: Secret,
    pub refresh_token: Secret,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub is_recursive: bool,
    pub read_limit: u32,
}

pub fn dropbox_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("path", "Dropbox folder path, e.g. /Documents. Omit for the root."),
        recursive_param(),
    ]
}

pub fn dropbox(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    let path = ctx.optional("path");
    if let Some(p) = &path {
        if !p.starts_with('/') {
            return Err(SourceBridgeError::validation(format!(
                "parameter 'path' must start with '/', got '{p}'"
            )));
        }
    }

    Ok(ConnectorConfig::Dropbox(DropboxProperties {
        app_key: ctx.secret("DROPBOX_APP_KEY")?,
        app_secret: ctx.secret("DROPBOX_APP_SECRET")?,
        redirect_uri: ctx.secret("DROPBOX_REDIRECT_URI")?,
        refresh_token: ctx.secret("DROPBOX_REFRESH_TOKEN")?,
        path,
        is_recursive: ctx.recursive(),
        read_limit: ctx.read_limit,
    }))
}

// ---------------------------------------------------------------------------
// Box
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxProperties {
    #[serde(flatten)]
    pub oauth: OAuthApp,
    pub redirect_uri: Secret,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    pub is_recursive: bool,
    pub read_limit: u32,
}

pub fn box_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("folderId", "Box folder identifier. Omit for the root folder (0)."),
        recursive_param(),
    ]
}

pub fn box_files(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    Ok(ConnectorConfig::Box(BoxProperties {
        oauth: ctx.oauth("BOX")?,
        redirect_uri: ctx.secret("BOX_REDIRECT_URI")?,
        folder_id: ctx.optional("folderId"),
        is_recursive: ctx.recursive(),
        read_limit: ctx.read_limit,
    }))
}

// ---------------------------------------------------------------------------
// GitHub repository files
// ---------------------------------------------------------------------------

/// A GitHub repository, shared by the file and issue connectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubRepositoryProperties {
    pub personal_access_token: Secret,
    pub repository_owner: String,
    pub repository_name: String,
    pub read_limit: u32,
}

pub fn github_repository_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("repoOwner", "Repository owner (user or organization).").required(),
        ParamSpec::string("repoName", "Repository name.").required(),
    ]
}

pub(crate) fn github_repository(ctx: &BuildContext<'_>) -> Result<GitHubRepositoryProperties> {
    Ok(GitHubRepositoryProperties {
        personal_access_token: ctx.secret("GITHUB_PERSONAL_ACCESS_TOKEN")?,
        repository_owner: ctx.required("repoOwner")?,
        repository_name: ctx.required("repoName")?,
        read_limit: ctx.read_limit,
    })
}

pub fn github_files(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    github_repository(ctx).map(ConnectorConfig::GitHubFiles)
}

fn recursive_param() -> ParamSpec {
    ParamSpec::boolean("recursive", "Also read sub-folders.").default_value(true)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::builders::testing::*;
    use crate::credentials::requirements;
    use sourcebridge_shared::Args;

    const DRIVE_OAUTH: &[(&str, &str)] = &[
        ("GOOGLE_DRIVE_CLIENT_ID", "cid"),
        ("GOOGLE_DRIVE_CLIENT_SECRET", "csecret"),
        ("GOOGLE_DRIVE_REFRESH_TOKEN", "rtok"),
    ];

    #[test]
    fn google_drive_prefers_service_account() {
        let mut pairs = DRIVE_OAUTH.to_vec();
        pairs.push(("GOOGLE_DRIVE_SERVICE_ACCOUNT_JSON", "{}"));
        let creds = resolved(&requirements::GOOGLE_DRIVE, &pairs);
        let args = Args::new().with("folderId", "abc");

        let config = google_drive(&context(&args, &creds)).unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["type"], "GoogleDrive");
        assert_eq!(json["authenticationType"], "ServiceAccount");
        assert_eq!(json["serviceAccountJson"], "{}");
        assert!(json.get("clientId").is_none());
        assert_eq!(json["folderId"], "abc");
        assert_eq!(json["isRecursive"], true);
        assert_eq!(json["readLimit"], 100);
    }

    #[test]
    fn google_drive_falls_back_to_user_oauth() {
        let creds = resolved(&requirements::GOOGLE_DRIVE, DRIVE_OAUTH);
        let args = Args::new().with("files", json!(["f1", "f2"]));

        let json = serde_json::to_value(google_drive(&context(&args, &creds)).unwrap()).unwrap();
        assert_eq!(json["authenticationType"], "User");
        assert_eq!(json["clientId"], "cid");
        assert_eq!(json["refreshToken"], "rtok");
        assert_eq!(json["files"], json!(["f1", "f2"]));
        assert!(json.get("folderId").is_none());
    }

    #[test]
    fn sharepoint_forwards_library_and_folder() {
        let creds = resolved(
            &requirements::SHAREPOINT,
            &[
                ("SHAREPOINT_ACCOUNT_NAME", "contoso"),
                ("SHAREPOINT_CLIENT_ID", "cid"),
                ("SHAREPOINT_CLIENT_SECRET", "cs"),
                ("SHAREPOINT_REFRESH_TOKEN", "rt"),
            ],
        );
        let args = Args::new()
            .with("libraryId", "lib-1")
            .with("folderId", "fold-1")
            .with("recursive", false);

        let json = serde_json::to_value(sharepoint(&context(&args, &creds)).unwrap()).unwrap();
        assert_eq!(json["type"], "SharePoint");
        assert_eq!(json["accountName"], "contoso");
        assert_eq!(json["libraryId"], "lib-1");
        assert_eq!(json["folderId"], "fold-1");
        assert_eq!(json["isRecursive"], false);
    }

    #[test]
    fn dropbox_requires_absolute_path() {
        let creds = resolved(
            &requirements::DROPBOX,
            &[
                ("DROPBOX_APP_KEY", "k"),
                ("DROPBOX_APP_SECRET", "s"),
                ("DROPBOX_REDIRECT_URI", "https://localhost/cb"),
                ("DROPBOX_REFRESH_TOKEN", "r"),
            ],
        );
        let args = Args::new().with("path", "Documents");
        assert!(dropbox(&context(&args, &creds)).is_err());

        let args = Args::new().with("path", "/Documents");
        let json = serde_json::to_value(dropbox(&context(&args, &creds)).unwrap()).unwrap();
        assert_eq!(json["path"], "/Documents");
        assert_eq!(json["appKey"], "k");
    }

    #[test]
    fn github_files_forwards_repository() {
        let creds = resolved(&requirements::GITHUB, &[("GITHUB_PERSONAL_ACCESS_TOKEN", "ghp")]);
        let args = Args::new().with("repoOwner", "rust-lang").with("repoName", "cargo");

        let json = serde_json::to_value(github_files(&context(&args, &creds)).unwrap()).unwrap();
        assert_eq!(json["type"], "GitHubFiles");
        assert_eq!(json["repositoryOwner"], "rust-lang");
        assert_eq!(json["repositoryName"], "cargo");
    }
}
