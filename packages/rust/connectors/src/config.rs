//! The canonical feed-creation request.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument};

use sourcebridge_shared::{Args, DefaultsConfig, Result, SchedulePolicy};

use crate::builders::BuildContext;
use crate::builders::mail::{CalendarProperties, EmailProperties};
use crate::builders::messaging::{ChannelProperties, TeamsProperties};
use crate::builders::social::{RedditProperties, TwitterPostsProperties, TwitterSearchProperties};
use crate::builders::storage::{
    BoxProperties, DropboxProperties, GitHubRepositoryProperties, GoogleDriveProperties,
    OneDriveProperties, SharePointProperties,
};
use crate::builders::tracker::{JiraProperties, LinearProperties, NotionProperties};
use crate::builders::web::{RssProperties, SearchProperties, WebProperties};
use crate::credentials::{Credentials, resolve};
use crate::kind::SourceKind;
use crate::schedule::schedule_policy;

/// Source-specific connector settings, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ConnectorConfig {
    GoogleDrive(GoogleDriveProperties),
    OneDrive(OneDriveProperties),
    SharePoint(SharePointProperties),
    Dropbox(DropboxProperties),
    Box(BoxProperties),
    GitHubFiles(GitHubRepositoryProperties),
    Slack(ChannelProperties),
    MicrosoftTeams(TeamsProperties),
    Discord(ChannelProperties),
    Linear(LinearProperties),
    GitHubIssues(GitHubRepositoryProperties),
    Jira(JiraProperties),
    GoogleEmail(EmailProperties),
    MicrosoftEmail(EmailProperties),
    GoogleCalendar(CalendarProperties),
    MicrosoftCalendar(CalendarProperties),
    TwitterPosts(TwitterPostsProperties),
    TwitterSearch(TwitterSearchProperties),
    Reddit(RedditProperties),
    Notion(NotionProperties),
    Web(WebProperties),
    Rss(RssProperties),
    Search(SearchProperties),
}

impl ConnectorConfig {
    /// The source kind this configuration was built for.
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::GoogleDrive(_) => SourceKind::GoogleDrive,
            Self::OneDrive(_) => SourceKind::OneDrive,
            Self::SharePoint(_) => SourceKind::SharePoint,
            Self::Dropbox(_) => SourceKind::Dropbox,
            Self::Box(_) => SourceKind::Box,
            Self::GitHubFiles(_) => SourceKind::GitHubFiles,
            Self::Slack(_) => SourceKind::Slack,
            Self::MicrosoftTeams(_) => SourceKind::MicrosoftTeams,
            Self::Discord(_) => SourceKind::Discord,
            Self::Linear(_) => SourceKind::Linear,
            Self::GitHubIssues(_) => SourceKind::GitHubIssues,
            Self::Jira(_) => SourceKind::Jira,
            Self::GoogleEmail(_) => SourceKind::GoogleMail,
            Self::MicrosoftEmail(_) => SourceKind::MicrosoftMail,
            Self::GoogleCalendar(_) => SourceKind::GoogleCalendar,
            Self::MicrosoftCalendar(_) => SourceKind::MicrosoftCalendar,
            Self::TwitterPosts(_) => SourceKind::TwitterPosts,
            Self::TwitterSearch(_) => SourceKind::TwitterSearch,
            Self::Reddit(_) => SourceKind::Reddit,
            Self::Notion(_) => SourceKind::Notion,
            Self::Web(_) => SourceKind::WebCrawl,
            Self::Rss(_) => SourceKind::Rss,
            Self::Search(_) => SourceKind::WebSearch,
        }
    }
}

/// A complete feed submission: name, connector settings, optional schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRequest {
    pub name: String,
    #[serde(flatten)]
    pub connector: ConnectorConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_policy: Option<SchedulePolicy>,
}

/// Assemble the feed request for `kind` from validated arguments.
///
/// Argument-shape problems surface first, then missing credentials. No
/// remote call is made.
#[instrument(skip_all, fields(kind = %kind))]
pub fn build_feed(
    kind: SourceKind,
    args: &Args,
    credentials: &Credentials,
    defaults: &DefaultsConfig,
    now: DateTime<Utc>,
) -> Result<FeedRequest> {
    let schedule = if kind.schedulable() {
        schedule_policy(args.flag("recurring"), args.opt_str("repeatInterval"))?
    } else {
        None
    };

    let resolved = resolve(credentials, &kind.credentials())?;

    let ctx = BuildContext {
        args,
        credentials: &resolved,
        read_limit: args
            .opt_u32("readLimit")
            .unwrap_or_else(|| kind.default_read_limit(defaults)),
        now,
    };
    let connector = kind.build(&ctx)?;

    let name = args
        .opt_str("name")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .unwrap_or_else(|| kind.default_feed_name(args));

    debug!(
        feed = %name,
        read_limit = ctx.read_limit,
        recurring = schedule.is_some(),
        "feed request built"
    );

    Ok(FeedRequest {
        name,
        connector,
        schedule_policy: schedule,
    })
}
