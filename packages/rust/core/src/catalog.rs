//! The operation catalog: every name the dispatch registry answers to.

use sourcebridge_connectors::SourceKind;
use sourcebridge_shared::{DefaultsConfig, ParamSpec};

use crate::ops::{collections, content, deletion, ingest, listing, notify, project, publish};

/// A callable operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // Project
    ConfigureProject,
    GetProject,
    QueryProjectUsage,
    // Retrieval and queries
    RetrieveSources,
    RetrieveImages,
    PromptConversation,
    QueryContents,
    QueryCollections,
    QueryFeeds,
    QueryConversations,
    // Completion
    IsContentDone,
    IsFeedDone,
    // Collections
    CreateCollection,
    AddContentsToCollection,
    RemoveContentsFromCollection,
    // Deletion
    DeleteContent,
    DeleteConversation,
    DeleteCollection,
    DeleteFeed,
    DeleteContents,
    DeleteFeeds,
    DeleteCollections,
    DeleteConversations,
    // Source listing
    ListSlackChannels,
    ListMicrosoftTeams,
    ListNotionDatabases,
    ListLinearProjects,
    ListSharePointLibraries,
    ListSharePointFolders,
    // Connector ingestion
    Ingest(SourceKind),
    // Single-shot ingestion and publishing
    IngestUrl,
    IngestText,
    IngestFile,
    IngestMemory,
    ScreenshotPage,
    DescribeImageUrl,
    PublishAudio,
    PublishImage,
    // Notifications
    SendWebhookNotification,
    SendSlackNotification,
    SendTwitterNotification,
    SendEmailNotification,
}

/// Every operation except connector ingestion, in listing order.
const FIXED: &[Operation] = &[
    Operation::ConfigureProject,
    Operation::GetProject,
    Operation::QueryProjectUsage,
    Operation::RetrieveSources,
    Operation::RetrieveImages,
    Operation::PromptConversation,
    Operation::QueryContents,
    Operation::QueryCollections,
    Operation::QueryFeeds,
    Operation::QueryConversations,
    Operation::IsContentDone,
    Operation::IsFeedDone,
    Operation::CreateCollection,
    Operation::AddContentsToCollection,
    Operation::RemoveContentsFromCollection,
    Operation::DeleteContent,
    Operation::DeleteConversation,
    Operation::DeleteCollection,
    Operation::DeleteFeed,
    Operation::DeleteContents,
    Operation::DeleteFeeds,
    Operation::DeleteCollections,
    Operation::DeleteConversations,
    Operation::ListSlackChannels,
    Operation::ListMicrosoftTeams,
    Operation::ListNotionDatabases,
    Operation::ListLinearProjects,
    Operation::ListSharePointLibraries,
    Operation::ListSharePointFolders,
    Operation::IngestUrl,
    Operation::IngestText,
    Operation::IngestFile,
    Operation::IngestMemory,
    Operation::ScreenshotPage,
    Operation::DescribeImageUrl,
    Operation::PublishAudio,
    Operation::PublishImage,
    Operation::SendWebhookNotification,
    Operation::SendSlackNotification,
    Operation::SendTwitterNotification,
    Operation::SendEmailNotification,
];

impl Operation {
    /// All operations: the fixed set followed by one ingestion per source kind.
    pub fn all() -> Vec<Operation> {
        FIXED
            .iter()
            .copied()
            .chain(SourceKind::ALL.iter().copied().map(Operation::Ingest))
            .collect()
    }

    /// Name as seen by the calling agent.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConfigureProject => "configure_project",
            Self::GetProject => "get_project",
            Self::QueryProjectUsage => "query_project_usage",
            Self::RetrieveSources => "retrieve_sources",
            Self::RetrieveImages => "retrieve_images",
            Self::PromptConversation => "prompt_conversation",
            Self::QueryContents => "query_contents",
            Self::QueryCollections => "query_collections",
            Self::QueryFeeds => "query_feeds",
            Self::QueryConversations => "query_conversations",
            Self::IsContentDone => "is_content_done",
            Self::IsFeedDone => "is_feed_done",
            Self::CreateCollection => "create_collection",
            Self::AddContentsToCollection => "add_contents_to_collection",
            Self::RemoveContentsFromCollection => "remove_contents_from_collection",
            Self::DeleteContent => "delete_content",
            Self::DeleteConversation => "delete_conversation",
            Self::DeleteCollection => "delete_collection",
            Self::DeleteFeed => "delete_feed",
            Self::DeleteContents => "delete_contents",
            Self::DeleteFeeds => "delete_feeds",
            Self::DeleteCollections => "delete_collections",
            Self::DeleteConversations => "delete_conversations",
            Self::ListSlackChannels => "list_slack_channels",
            Self::ListMicrosoftTeams => "list_microsoft_teams",
            Self::ListNotionDatabases => "list_notion_databases",
            Self::ListLinearProjects => "list_linear_projects",
            Self::ListSharePointLibraries => "list_sharepoint_libraries",
            Self::ListSharePointFolders => "list_sharepoint_folders",
            Self::Ingest(kind) => kind.operation(),
            Self::IngestUrl => "ingest_url",
            Self::IngestText => "ingest_text",
            Self::IngestFile => "ingest_file",
            Self::IngestMemory => "ingest_memory",
            Self::ScreenshotPage => "screenshot_page",
            Self::DescribeImageUrl => "describe_image_url",
            Self::PublishAudio => "publish_audio",
            Self::PublishImage => "publish_image",
            Self::SendWebhookNotification => "send_webhook_notification",
            Self::SendSlackNotification => "send_slack_notification",
            Self::SendTwitterNotification => "send_twitter_notification",
            Self::SendEmailNotification => "send_email_notification",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        SourceKind::from_operation(name)
            .map(Self::Ingest)
            .or_else(|| FIXED.iter().copied().find(|op| op.name() == name))
    }

    /// Description of intended use and constraints, shown to the calling agent.
    pub fn description(&self) -> String {
        let text = match self {
            Self::ConfigureProject => {
                "Updates project-wide settings: name, callback URL, default specification and workflow."
            }
            Self::GetProject => "Returns the current project, including its credit and storage usage.",
            Self::QueryProjectUsage => {
                "Returns every billable usage record (credits, tokens, duration) created within \
                 the inLast window, e.g. PT1H or P7D."
            }
            Self::RetrieveSources => {
                "Retrieves the content chunks most relevant to a prompt. Use before answering a \
                 question from ingested content."
            }
            Self::RetrieveImages => {
                "Finds ingested images similar to the image at the given URL."
            }
            Self::PromptConversation => {
                "Asks a question answered from ingested content (retrieval-augmented). Pass the \
                 returned conversation id to continue the same conversation."
            }
            Self::QueryContents => {
                "Searches ingested content by text, type, recency, feed, collection or location."
            }
            Self::QueryCollections => "Lists collections, optionally by name.",
            Self::QueryFeeds => "Lists feeds, optionally by name.",
            Self::QueryConversations => "Lists conversations, optionally by search text.",
            Self::IsContentDone => {
                "Reports whether a content item has finished ingesting. Poll until done."
            }
            Self::IsFeedDone => {
                "Reports whether a feed has finished ingesting. Poll until done. Recurring feeds \
                 never report done."
            }
            Self::CreateCollection => "Creates a collection, optionally seeded with content ids.",
            Self::AddContentsToCollection => "Adds content items to a collection.",
            Self::RemoveContentsFromCollection => "Removes content items from a collection.",
            Self::DeleteContent => "Deletes one content item.",
            Self::DeleteConversation => "Deletes one conversation.",
            Self::DeleteCollection => "Deletes one collection. Its content is kept.",
            Self::DeleteFeed => "Deletes one feed and the content it ingested.",
            Self::DeleteContents => {
                "Deletes every content item matching the filter. With no filter this deletes \
                 all content in the project."
            }
            Self::DeleteFeeds => "Deletes feeds, optionally of one type, up to limit.",
            Self::DeleteCollections => "Deletes collections up to limit.",
            Self::DeleteConversations => "Deletes conversations up to limit.",
            Self::ListSlackChannels => {
                "Lists Slack channels visible to SLACK_BOT_TOKEN. Use before ingest_slack_messages."
            }
            Self::ListMicrosoftTeams => {
                "Lists Microsoft Teams teams and their channels. Use before \
                 ingest_microsoft_teams_messages."
            }
            Self::ListNotionDatabases => {
                "Lists Notion databases shared with NOTION_API_KEY. Use before ingest_notion_pages."
            }
            Self::ListLinearProjects => {
                "Lists Linear projects visible to LINEAR_API_KEY. Use before ingest_linear_issues."
            }
            Self::ListSharePointLibraries => {
                "Lists SharePoint document libraries. Use before ingest_sharepoint_files."
            }
            Self::ListSharePointFolders => {
                "Lists folders within a SharePoint library. Use before ingest_sharepoint_files."
            }
            Self::Ingest(kind) => return kind.description(),
            Self::IngestUrl => {
                "Ingests a single web page or file by URL. Returns the content id; poll \
                 is_content_done."
            }
            Self::IngestText => "Ingests raw text (plain, Markdown or HTML) as a content item.",
            Self::IngestFile => {
                "Ingests a local file. The file is read and uploaded; returns the content id."
            }
            Self::IngestMemory => {
                "Stores a short memory snippet for later retrieval, optionally expiring."
            }
            Self::ScreenshotPage => "Captures a screenshot of a web page and ingests it as an image.",
            Self::DescribeImageUrl => "Describes the image at a URL using a vision model.",
            Self::PublishAudio => "Generates narrated audio from text and ingests the result.",
            Self::PublishImage => "Generates images from a prompt and ingests the result.",
            Self::SendWebhookNotification => "Posts text to a webhook URL.",
            Self::SendSlackNotification => "Posts text to a Slack channel using SLACK_BOT_TOKEN.",
            Self::SendTwitterNotification => "Posts text to X/Twitter using the TWITTER_* keys.",
            Self::SendEmailNotification => "Sends an email to one or more recipients.",
        };
        text.to_string()
    }

    /// Parameter list for validation and `tools/list`.
    pub fn params(&self, defaults: &DefaultsConfig) -> Vec<ParamSpec> {
        match self {
            Self::ConfigureProject => project::configure_params(),
            Self::GetProject => Vec::new(),
            Self::QueryProjectUsage => project::usage_params(),
            Self::RetrieveSources => content::retrieve_sources_params(defaults),
            Self::RetrieveImages => content::retrieve_images_params(defaults),
            Self::PromptConversation => content::prompt_params(),
            Self::QueryContents => content::query_contents_params(defaults),
            Self::QueryCollections | Self::QueryFeeds => content::named_query_params(defaults),
            Self::QueryConversations => content::conversation_query_params(defaults),
            Self::IsContentDone | Self::IsFeedDone => content::id_params("Identifier to check."),
            Self::CreateCollection => collections::create_params(),
            Self::AddContentsToCollection | Self::RemoveContentsFromCollection => {
                collections::membership_params()
            }
            Self::DeleteContent
            | Self::DeleteConversation
            | Self::DeleteCollection
            | Self::DeleteFeed => content::id_params("Identifier to delete."),
            Self::DeleteContents => deletion::delete_contents_params(defaults),
            Self::DeleteFeeds => deletion::delete_feeds_params(),
            Self::DeleteCollections | Self::DeleteConversations => deletion::limit_params(),
            Self::ListSlackChannels
            | Self::ListMicrosoftTeams
            | Self::ListNotionDatabases
            | Self::ListLinearProjects
            | Self::ListSharePointLibraries => Vec::new(),
            Self::ListSharePointFolders => listing::sharepoint_folder_params(),
            Self::Ingest(kind) => kind.params(defaults),
            Self::IngestUrl => ingest::url_params(),
            Self::IngestText => ingest::text_params(),
            Self::IngestFile => ingest::file_params(),
            Self::IngestMemory => ingest::memory_params(),
            Self::ScreenshotPage => publish::screenshot_params(),
            Self::DescribeImageUrl => publish::describe_image_params(),
            Self::PublishAudio => publish::audio_params(),
            Self::PublishImage => publish::image_params(),
            Self::SendWebhookNotification => notify::webhook_params(),
            Self::SendSlackNotification => notify::slack_params(),
            Self::SendTwitterNotification => notify::twitter_params(),
            Self::SendEmailNotification => notify::email_params(),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique_and_round_trip() {
        let all = Operation::all();
        let names: HashSet<_> = all.iter().map(Operation::name).collect();
        assert_eq!(names.len(), all.len());
        for op in &all {
            assert_eq!(Operation::from_name(op.name()), Some(*op));
        }
        assert!(Operation::from_name("format_disk").is_none());
    }

    #[test]
    fn every_operation_is_described() {
        let defaults = DefaultsConfig::default();
        for op in Operation::all() {
            assert!(!op.description().is_empty(), "{op} has no description");
            let params = op.params(&defaults);
            let names: HashSet<_> = params.iter().map(|p| p.name).collect();
            assert_eq!(names.len(), params.len(), "{op} has duplicate params");
        }
    }

    #[test]
    fn ingestion_operations_cover_every_source() {
        for kind in SourceKind::ALL {
            assert_eq!(
                Operation::from_name(kind.operation()),
                Some(Operation::Ingest(*kind))
            );
        }
        assert!(Operation::from_name("web_crawl").is_some());
        assert!(Operation::from_name("ingest_rss").is_some());
    }
}
