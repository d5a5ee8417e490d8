//! Supported source kinds and their static metadata.

use sourcebridge_shared::{Args, DefaultsConfig, ParamSpec, Result};

use crate::ConnectorConfig;
use crate::builders::{BuildContext, mail, messaging, social, storage, tracker, web};
use crate::credentials::{CredentialRequirement, requirements};

/// Results returned by a single web search.
const WEB_SEARCH_READ_LIMIT: u32 = 10;

/// Largest read limit a caller may request.
const MAX_READ_LIMIT: f64 = 10_000.0;

/// Grouping used for tool descriptions and listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFamily {
    CloudDrive,
    Chat,
    IssueTracker,
    Email,
    Calendar,
    Social,
    Knowledge,
    Web,
}

/// An external source the platform can ingest from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    GoogleDrive,
    OneDrive,
    SharePoint,
    Dropbox,
    Box,
    GitHubFiles,
    Slack,
    MicrosoftTeams,
    Discord,
    Linear,
    GitHubIssues,
    Jira,
    GoogleMail,
    MicrosoftMail,
    GoogleCalendar,
    MicrosoftCalendar,
    TwitterPosts,
    TwitterSearch,
    Reddit,
    Notion,
    WebCrawl,
    Rss,
    WebSearch,
}

impl SourceKind {
    pub const ALL: &'static [SourceKind] = &[
        Self::GoogleDrive,
        Self::OneDrive,
        Self::SharePoint,
        Self::Dropbox,
        Self::Box,
        Self::GitHubFiles,
        Self::Slack,
        Self::MicrosoftTeams,
        Self::Discord,
        Self::Linear,
        Self::GitHubIssues,
        Self::Jira,
        Self::GoogleMail,
        Self::MicrosoftMail,
        Self::GoogleCalendar,
        Self::MicrosoftCalendar,
        Self::TwitterPosts,
        Self::TwitterSearch,
        Self::Reddit,
        Self::Notion,
        Self::WebCrawl,
        Self::Rss,
        Self::WebSearch,
    ];

    /// Name of the ingestion operation for this kind.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::GoogleDrive => "ingest_google_drive_files",
            Self::OneDrive => "ingest_onedrive_files",
            Self::SharePoint => "ingest_sharepoint_files",
            Self::Dropbox => "ingest_dropbox_files",
            Self::Box => "ingest_box_files",
            Self::GitHubFiles => "ingest_github_files",
            Self::Slack => "ingest_slack_messages",
            Self::MicrosoftTeams => "ingest_microsoft_teams_messages",
            Self::Discord => "ingest_discord_messages",
            Self::Linear => "ingest_linear_issues",
            Self::GitHubIssues => "ingest_github_issues",
            Self::Jira => "ingest_jira_issues",
            Self::GoogleMail => "ingest_google_email",
            Self::MicrosoftMail => "ingest_microsoft_email",
            Self::GoogleCalendar => "ingest_google_calendar",
            Self::MicrosoftCalendar => "ingest_microsoft_calendar",
            Self::TwitterPosts => "ingest_twitter_posts",
            Self::TwitterSearch => "ingest_twitter_search",
            Self::Reddit => "ingest_reddit_posts",
            Self::Notion => "ingest_notion_pages",
            Self::WebCrawl => "web_crawl",
            Self::Rss => "ingest_rss",
            Self::WebSearch => "web_search",
        }
    }

    pub fn from_operation(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.operation() == name)
    }

    /// Human-readable source name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::GoogleDrive => "Google Drive",
            Self::OneDrive => "OneDrive",
            Self::SharePoint => "SharePoint",
            Self::Dropbox => "Dropbox",
            Self::Box => "Box",
            Self::GitHubFiles => "GitHub files",
            Self::Slack => "Slack",
            Self::MicrosoftTeams => "Microsoft Teams",
            Self::Discord => "Discord",
            Self::Linear => "Linear",
            Self::GitHubIssues => "GitHub issues",
            Self::Jira => "Jira",
            Self::GoogleMail => "Google Mail",
            Self::MicrosoftMail => "Microsoft Mail",
            Self::GoogleCalendar => "Google Calendar",
            Self::MicrosoftCalendar => "Microsoft Calendar",
            Self::TwitterPosts => "X/Twitter posts",
            Self::TwitterSearch => "X/Twitter search",
            Self::Reddit => "Reddit",
            Self::Notion => "Notion",
            Self::WebCrawl => "Web crawl",
            Self::Rss => "RSS",
            Self::WebSearch => "Web search",
        }
    }

    pub fn family(&self) -> SourceFamily {
        match self {
            Self::GoogleDrive
            | Self::OneDrive
            | Self::SharePoint
            | Self::Dropbox
            | Self::Box
            | Self::GitHubFiles => SourceFamily::CloudDrive,
            Self::Slack | Self::MicrosoftTeams | Self::Discord => SourceFamily::Chat,
            Self::Linear | Self::GitHubIssues | Self::Jira => SourceFamily::IssueTracker,
            Self::GoogleMail | Self::MicrosoftMail => SourceFamily::Email,
            Self::GoogleCalendar | Self::MicrosoftCalendar => SourceFamily::Calendar,
            Self::TwitterPosts | Self::TwitterSearch | Self::Reddit => SourceFamily::Social,
            Self::Notion => SourceFamily::Knowledge,
            Self::WebCrawl | Self::Rss | Self::WebSearch => SourceFamily::Web,
        }
    }

    /// Credential set the kind's builder needs.
    pub fn credentials(&self) -> CredentialRequirement {
        match self {
            Self::GoogleDrive => requirements::GOOGLE_DRIVE,
            Self::OneDrive => requirements::ONEDRIVE,
            Self::SharePoint => requirements::SHAREPOINT,
            Self::Dropbox => requirements::DROPBOX,
            Self::Box => requirements::BOX,
            Self::GitHubFiles | Self::GitHubIssues => requirements::GITHUB,
            Self::Slack => requirements::SLACK,
            Self::MicrosoftTeams => requirements::MICROSOFT_TEAMS,
            Self::Discord => requirements::DISCORD,
            Self::Linear => requirements::LINEAR,
            Self::Jira => requirements::JIRA,
            Self::GoogleMail => requirements::GOOGLE_EMAIL,
            Self::MicrosoftMail => requirements::MICROSOFT_EMAIL,
            Self::GoogleCalendar => requirements::GOOGLE_CALENDAR,
            Self::MicrosoftCalendar => requirements::MICROSOFT_CALENDAR,
            Self::TwitterPosts | Self::TwitterSearch => requirements::TWITTER,
            Self::Notion => requirements::NOTION,
            Self::Reddit | Self::WebCrawl | Self::Rss | Self::WebSearch => {
                CredentialRequirement::none()
            }
        }
    }

    pub fn default_read_limit(&self, defaults: &DefaultsConfig) -> u32 {
        match self {
            Self::Rss => defaults.rss_read_limit,
            Self::WebSearch => WEB_SEARCH_READ_LIMIT,
            _ => defaults.read_limit,
        }
    }

    /// Whether the kind accepts a recurring schedule. A web search is a
    /// one-off query.
    pub fn schedulable(&self) -> bool {
        !matches!(self, Self::WebSearch)
    }

    /// Description shown to the calling agent.
    pub fn description(&self) -> String {
        let what = match self.family() {
            SourceFamily::CloudDrive => "files",
            SourceFamily::Chat => "messages",
            SourceFamily::IssueTracker => "issues",
            SourceFamily::Email => "emails",
            SourceFamily::Calendar => "calendar events",
            SourceFamily::Social => "posts",
            SourceFamily::Knowledge => "pages",
            SourceFamily::Web => "pages",
        };
        let mut text = match self {
            Self::WebCrawl => "Crawls a website and ingests its pages.".to_string(),
            Self::Rss => "Ingests the posts of an RSS or Atom feed.".to_string(),
            Self::WebSearch => {
                "Runs a web search and ingests the result pages.".to_string()
            }
            _ => format!("Ingests {what} from {}.", self.label()),
        };
        text.push_str(
            " Creates a platform feed and returns its {id}. Ingestion is asynchronous: \
             poll is_feed_done with the returned id until it reports done.",
        );
        if self.schedulable() {
            text.push_str(
                " Set recurring=true to re-check the source every repeatInterval \
                 (minimum PT5M); recurring feeds never report done.",
            );
        }
        let requirement = self.credentials();
        if !requirement.is_empty() {
            let sets: Vec<String> = requirement
                .alternatives()
                .iter()
                .map(|names| names.join(", "))
                .collect();
            text.push_str(&format!(" Requires environment: {}.", sets.join(" or ")));
        }
        text
    }

    /// Full parameter list: source-specific parameters then the common tail.
    pub fn params(&self, defaults: &DefaultsConfig) -> Vec<ParamSpec> {
        let mut params = match self {
            Self::GoogleDrive => storage::google_drive_params(),
            Self::OneDrive => storage::onedrive_params(),
            Self::SharePoint => storage::sharepoint_params(),
            Self::Dropbox => storage::dropbox_params(),
            Self::Box => storage::box_params(),
            Self::GitHubFiles | Self::GitHubIssues => storage::github_repository_params(),
            Self::Slack => messaging::slack_params(),
            Self::MicrosoftTeams => messaging::microsoft_teams_params(),
            Self::Discord => messaging::discord_params(),
            Self::Linear => tracker::linear_params(),
            Self::Jira => tracker::jira_params(),
            Self::Notion => tracker::notion_params(),
            Self::GoogleMail | Self::MicrosoftMail => mail::email_params(),
            Self::GoogleCalendar | Self::MicrosoftCalendar => mail::calendar_params(),
            Self::TwitterPosts => social::twitter_posts_params(),
            Self::TwitterSearch => social::twitter_search_params(),
            Self::Reddit => social::reddit_params(),
            Self::WebCrawl => web::web_crawl_params(),
            Self::Rss => web::rss_params(),
            Self::WebSearch => web::web_search_params(),
        };

        params.push(ParamSpec::string(
            "name",
            "Feed name. Defaults to the source and its identifier.",
        ));
        params.push(
            ParamSpec::integer("readLimit", "Maximum number of items to read.")
                .default_value(self.default_read_limit(defaults))
                .range(1.0, MAX_READ_LIMIT),
        );
        if self.schedulable() {
            params.push(
                ParamSpec::boolean("recurring", "Keep re-checking the source on a schedule.")
                    .default_value(false),
            );
            params.push(
                ParamSpec::string(
                    "repeatInterval",
                    "ISO-8601 interval between checks when recurring, e.g. PT15M. Minimum PT5M.",
                )
                .default_value(defaults.repeat_interval.clone()),
            );
        }
        params
    }

    /// Build the connector configuration for this kind.
    pub fn build(&self, ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
        match self {
            Self::GoogleDrive => storage::google_drive(ctx),
            Self::OneDrive => storage::onedrive(ctx),
            Self::SharePoint => storage::sharepoint(ctx),
            Self::Dropbox => storage::dropbox(ctx),
            Self::Box => storage::box_files(ctx),
            Self::GitHubFiles => storage::github_files(ctx),
            Self::Slack => messaging::slack(ctx),
            Self::MicrosoftTeams => messaging::microsoft_teams(ctx),
            Self::Discord => messaging::discord(ctx),
            Self::Linear => tracker::linear(ctx),
            Self::GitHubIssues => tracker::github_issues(ctx),
            Self::Jira => tracker::jira(ctx),
            Self::Notion => tracker::notion(ctx),
            Self::GoogleMail => mail::google_email(ctx),
            Self::MicrosoftMail => mail::microsoft_email(ctx),
            Self::GoogleCalendar => mail::google_calendar(ctx),
            Self::MicrosoftCalendar => mail::microsoft_calendar(ctx),
            Self::TwitterPosts => social::twitter_posts(ctx),
            Self::TwitterSearch => social::twitter_search(ctx),
            Self::Reddit => social::reddit(ctx),
            Self::WebCrawl => web::web_crawl(ctx),
            Self::Rss => web::rss(ctx),
            Self::WebSearch => web::web_search(ctx),
        }
    }

    /// Feed name used when the caller gives none.
    pub fn default_feed_name(&self, args: &Args) -> String {
        let identifier = match self {
            Self::GitHubFiles | Self::GitHubIssues => {
                match (args.opt_str("repoOwner"), args.opt_str("repoName")) {
                    (Some(owner), Some(name)) => Some(format!("{owner}/{name}")),
                    _ => None,
                }
            }
            Self::Notion => args
                .opt_str("pageId")
                .or_else(|| args.opt_str("databaseId"))
                .map(String::from),
            _ => self
                .identifying_param()
                .and_then(|p| args.opt_str(p))
                .map(String::from),
        };
        match identifier {
            Some(id) => format!("{}: {id}", self.label()),
            None => self.label().to_string(),
        }
    }

    fn identifying_param(&self) -> Option<&'static str> {
        match self {
            Self::GoogleDrive | Self::OneDrive | Self::Box => Some("folderId"),
            Self::SharePoint => Some("libraryId"),
            Self::Dropbox => Some("path"),
            Self::Slack | Self::Discord => Some("channelName"),
            Self::MicrosoftTeams => Some("channelId"),
            Self::Linear => Some("projectName"),
            Self::Jira => Some("projectKey"),
            Self::GoogleCalendar | Self::MicrosoftCalendar => Some("calendarId"),
            Self::TwitterPosts => Some("userName"),
            Self::TwitterSearch | Self::WebSearch => Some("query"),
            Self::Reddit => Some("subredditName"),
            Self::WebCrawl | Self::Rss => Some("url"),
            Self::GitHubFiles
            | Self::GitHubIssues
            | Self::Notion
            | Self::GoogleMail
            | Self::MicrosoftMail => None,
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn operation_names_are_unique_and_resolvable() {
        let names: HashSet<_> = SourceKind::ALL.iter().map(|k| k.operation()).collect();
        assert_eq!(names.len(), SourceKind::ALL.len());
        for kind in SourceKind::ALL {
            assert_eq!(SourceKind::from_operation(kind.operation()), Some(*kind));
        }
        assert_eq!(SourceKind::from_operation("ingest_fax"), None);
    }

    #[test]
    fn read_limit_defaults() {
        let defaults = DefaultsConfig::default();
        assert_eq!(SourceKind::Slack.default_read_limit(&defaults), 100);
        assert_eq!(SourceKind::Rss.default_read_limit(&defaults), 25);
        assert_eq!(SourceKind::WebCrawl.default_read_limit(&defaults), 100);
    }

    #[test]
    fn every_kind_has_common_params() {
        let defaults = DefaultsConfig::default();
        for kind in SourceKind::ALL {
            let params = kind.params(&defaults);
            let names: Vec<_> = params.iter().map(|p| p.name).collect();
            assert!(names.contains(&"readLimit"), "{kind} lacks readLimit");
            assert_eq!(
                names.contains(&"recurring"),
                kind.schedulable(),
                "{kind} recurring mismatch"
            );
            let unique: HashSet<_> = names.iter().collect();
            assert_eq!(unique.len(), names.len(), "{kind} has duplicate params");
        }
    }

    #[test]
    fn description_names_credentials() {
        let text = SourceKind::Jira.description();
        assert!(text.contains("JIRA_EMAIL, JIRA_TOKEN"));
        assert!(!SourceKind::Reddit.description().contains("Requires environment"));
        assert!(!SourceKind::WebSearch.description().contains("recurring"));
    }

    #[test]
    fn default_feed_names() {
        let args = Args::new().with("channelName", "general");
        assert_eq!(SourceKind::Slack.default_feed_name(&args), "Slack: general");

        let args = Args::new().with("repoOwner", "rust-lang").with("repoName", "rust");
        assert_eq!(
            SourceKind::GitHubIssues.default_feed_name(&args),
            "GitHub issues: rust-lang/rust"
        );

        assert_eq!(SourceKind::GoogleMail.default_feed_name(&Args::new()), "Google Mail");
    }
}
