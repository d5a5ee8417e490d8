//! Operation handlers, grouped by family.
//!
//! Each handler receives validated arguments and returns the success
//! payload; the registry turns errors into envelopes.

pub mod collections;
pub mod content;
pub mod deletion;
pub mod ingest;
pub mod listing;
pub mod notify;
pub mod project;
pub mod publish;

use serde_json::{Value, json};

use sourcebridge_connectors::{
    CredentialRequirement, ResolvedCredentials, SourceKind, resolve,
};
use sourcebridge_shared::{Args, EntityRef, Result};

use crate::catalog::Operation;
use crate::registry::Dispatcher;

/// Route a validated invocation to its handler.
pub(crate) async fn dispatch(d: &Dispatcher, op: Operation, args: &Args) -> Result<Value> {
    match op {
        Operation::ConfigureProject => project::configure(d, args).await,
        Operation::GetProject => project::get(d).await,
        Operation::QueryProjectUsage => project::usage(d, args).await,
        Operation::RetrieveSources => content::retrieve_sources(d, args).await,
        Operation::RetrieveImages => content::retrieve_images(d, args).await,
        Operation::PromptConversation => content::prompt_conversation(d, args).await,
        Operation::QueryContents => content::query_contents(d, args).await,
        Operation::QueryCollections => content::named_query(d, "queryCollections", args).await,
        Operation::QueryFeeds => content::named_query(d, "queryFeeds", args).await,
        Operation::QueryConversations => content::query_conversations(d, args).await,
        Operation::IsContentDone => content::is_done(d, args, false).await,
        Operation::IsFeedDone => content::is_done(d, args, true).await,
        Operation::CreateCollection => collections::create(d, args).await,
        Operation::AddContentsToCollection => collections::add_contents(d, args).await,
        Operation::RemoveContentsFromCollection => collections::remove_contents(d, args).await,
        Operation::DeleteContent => deletion::delete_one(d, "deleteContent", args).await,
        Operation::DeleteConversation => deletion::delete_one(d, "deleteConversation", args).await,
        Operation::DeleteCollection => deletion::delete_one(d, "deleteCollection", args).await,
        Operation::DeleteFeed => deletion::delete_one(d, "deleteFeed", args).await,
        Operation::DeleteContents => deletion::delete_contents(d, args).await,
        Operation::DeleteFeeds => deletion::delete_feeds(d, args).await,
        Operation::DeleteCollections => {
            deletion::delete_all(d, "deleteAllCollections", args).await
        }
        Operation::DeleteConversations => {
            deletion::delete_all(d, "deleteAllConversations", args).await
        }
        Operation::ListSlackChannels => listing::slack_channels(d).await,
        Operation::ListMicrosoftTeams => listing::microsoft_teams(d).await,
        Operation::ListNotionDatabases => listing::notion_databases(d).await,
        Operation::ListLinearProjects => listing::linear_projects(d).await,
        Operation::ListSharePointLibraries => listing::sharepoint_libraries(d).await,
        Operation::ListSharePointFolders => listing::sharepoint_folders(d, args).await,
        Operation::Ingest(kind) => ingest::feed(d, kind, args).await,
        Operation::IngestUrl => ingest::url(d, args).await,
        Operation::IngestText => ingest::text(d, args).await,
        Operation::IngestFile => ingest::file(d, args).await,
        Operation::IngestMemory => ingest::memory(d, args).await,
        Operation::ScreenshotPage => publish::screenshot(d, args).await,
        Operation::DescribeImageUrl => publish::describe_image(d, args).await,
        Operation::PublishAudio => publish::audio(d, args).await,
        Operation::PublishImage => publish::image(d, args).await,
        Operation::SendWebhookNotification => notify::webhook(d, args).await,
        Operation::SendSlackNotification => notify::slack(d, args).await,
        Operation::SendTwitterNotification => notify::twitter(d, args).await,
        Operation::SendEmailNotification => notify::email(d, args).await,
    }
}

// ---------------------------------------------------------------------------
// Helpers shared by handlers
// ---------------------------------------------------------------------------

/// Wrap ids as `[{id}, ...]`.
pub(crate) fn entity_refs(ids: Vec<String>) -> Vec<EntityRef> {
    ids.into_iter().map(EntityRef::new).collect()
}

/// Resolve the credentials a source kind needs, from the startup snapshot.
pub(crate) fn credentials_for(d: &Dispatcher, kind: SourceKind) -> Result<ResolvedCredentials> {
    resolve(d.credentials(), &kind.credentials())
}

/// Resolve an arbitrary requirement from the startup snapshot.
pub(crate) fn credentials_with(
    d: &Dispatcher,
    requirement: &CredentialRequirement,
) -> Result<ResolvedCredentials> {
    resolve(d.credentials(), requirement)
}

/// Pass-through call: `variables` in, the platform's `data` out.
pub(crate) async fn call(d: &Dispatcher, operation: &str, variables: Value) -> Result<Value> {
    d.platform().execute(operation, variables).await
}

/// Unwrap `data.<field>` when present; otherwise return the whole payload.
pub(crate) fn field_or_whole(data: Value, field: &str) -> Value {
    match data {
        Value::Object(mut map) if map.contains_key(field) => {
            map.remove(field).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// `{ "id": ... }` as a payload.
pub(crate) fn id_payload(entity: &EntityRef) -> Value {
    json!({ "id": entity.id })
}
