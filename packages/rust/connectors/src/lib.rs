//! Source connectors for SourceBridge.
//!
//! Turns a source kind, validated caller arguments and a credential
//! snapshot into one canonical [`FeedRequest`] the platform understands.
//! Everything here is pure: the environment is read once by the caller into
//! [`Credentials`], and no function in this crate performs I/O.

pub mod address;
pub mod builders;
pub mod config;
pub mod credentials;
pub mod kind;
pub mod schedule;

pub use address::http_url;
pub use config::{ConnectorConfig, FeedRequest, build_feed};
pub use credentials::{
    CredentialRequirement, Credentials, ResolvedCredentials, Secret, requirements, resolve,
};
pub use kind::{SourceFamily, SourceKind};
pub use schedule::{DEFAULT_REPEAT_INTERVAL, MIN_REPEAT_INTERVAL_MS, schedule_policy};

/// Credential sets used outside feed ingestion (notifications).
const EXTRA_REQUIREMENTS: &[CredentialRequirement] = &[requirements::TWITTER_NOTIFICATION];

/// Every environment variable any connector or notification may read,
/// sorted and deduplicated. Used to take the startup snapshot.
pub fn known_credential_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = SourceKind::ALL
        .iter()
        .map(SourceKind::credentials)
        .chain(EXTRA_REQUIREMENTS.iter().copied())
        .flat_map(|req| req.names().collect::<Vec<_>>())
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}
