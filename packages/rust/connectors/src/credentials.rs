//! Connector credential snapshot and resolution.
//!
//! The process environment is read once, at startup, into [`Credentials`].
//! Resolving a connector's [`CredentialRequirement`] against that snapshot
//! is then a pure lookup: no hidden state, no environment access, no secret
//! values in logs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use sourcebridge_shared::{Result, SourceBridgeError};

// ---------------------------------------------------------------------------
// Secret
// ---------------------------------------------------------------------------

/// A credential value. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value, for placing into an outgoing request.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<redacted>")
    }
}

// ---------------------------------------------------------------------------
// Requirement
// ---------------------------------------------------------------------------

/// The credential set a connector needs, as ordered alternatives.
///
/// The first alternative whose names are all configured wins. An empty
/// list of alternatives means the connector needs no credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialRequirement {
    alternatives: &'static [&'static [&'static str]],
}

impl CredentialRequirement {
    /// No credentials needed.
    pub const fn none() -> Self {
        Self { alternatives: &[] }
    }

    /// Prioritised alternatives, highest priority first.
    pub const fn any(alternatives: &'static [&'static [&'static str]]) -> Self {
        Self { alternatives }
    }

    pub fn alternatives(&self) -> &'static [&'static [&'static str]] {
        self.alternatives
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Every variable name this requirement may read.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.alternatives.iter().flat_map(|alt| alt.iter().copied())
    }
}

/// Single-token and multi-part sets used by several connectors.
pub mod requirements {
    use super::CredentialRequirement;

    pub const SLACK: CredentialRequirement = CredentialRequirement::any(&[&["SLACK_BOT_TOKEN"]]);
    pub const DISCORD: CredentialRequirement =
        CredentialRequirement::any(&[&["DISCORD_BOT_TOKEN"]]);
    pub const MICROSOFT_TEAMS: CredentialRequirement = CredentialRequirement::any(&[&[
        "MICROSOFT_TEAMS_CLIENT_ID",
        "MICROSOFT_TEAMS_CLIENT_SECRET",
        "MICROSOFT_TEAMS_REFRESH_TOKEN",
    ]]);
    pub const NOTION: CredentialRequirement = CredentialRequirement::any(&[&["NOTION_API_KEY"]]);
    pub const LINEAR: CredentialRequirement = CredentialRequirement::any(&[&["LINEAR_API_KEY"]]);
    pub const GITHUB: CredentialRequirement =
        CredentialRequirement::any(&[&["GITHUB_PERSONAL_ACCESS_TOKEN"]]);
    pub const JIRA: CredentialRequirement =
        CredentialRequirement::any(&[&["JIRA_EMAIL", "JIRA_TOKEN"]]);
    pub const GOOGLE_EMAIL: CredentialRequirement = CredentialRequirement::any(&[&[
        "GOOGLE_EMAIL_CLIENT_ID",
        "GOOGLE_EMAIL_CLIENT_SECRET",
        "GOOGLE_EMAIL_REFRESH_TOKEN",
    ]]);
    pub const MICROSOFT_EMAIL: CredentialRequirement = CredentialRequirement::any(&[&[
        "MICROSOFT_EMAIL_CLIENT_ID",
        "MICROSOFT_EMAIL_CLIENT_SECRET",
        "MICROSOFT_EMAIL_REFRESH_TOKEN",
    ]]);
    pub const GOOGLE_CALENDAR: CredentialRequirement = CredentialRequirement::any(&[&[
        "GOOGLE_CALENDAR_CLIENT_ID",
        "GOOGLE_CALENDAR_CLIENT_SECRET",
        "GOOGLE_CALENDAR_REFRESH_TOKEN",
    ]]);
    pub const MICROSOFT_CALENDAR: CredentialRequirement = CredentialRequirement::any(&[&[
        "MICROSOFT_CALENDAR_CLIENT_ID",
        "MICROSOFT_CALENDAR_CLIENT_SECRET",
        "MICROSOFT_CALENDAR_REFRESH_TOKEN",
    ]]);
    /// Service-account JSON first, then the user OAuth triple.
    pub const GOOGLE_DRIVE: CredentialRequirement = CredentialRequirement::any(&[
        &["GOOGLE_DRIVE_SERVICE_ACCOUNT_JSON"],
        &[
            "GOOGLE_DRIVE_CLIENT_ID",
            "GOOGLE_DRIVE_CLIENT_SECRET",
            "GOOGLE_DRIVE_REFRESH_TOKEN",
        ],
    ]);
    pub const ONEDRIVE: CredentialRequirement = CredentialRequirement::any(&[&[
        "ONEDRIVE_CLIENT_ID",
        "ONEDRIVE_CLIENT_SECRET",
        "ONEDRIVE_REFRESH_TOKEN",
    ]]);
    pub const SHAREPOINT: CredentialRequirement = CredentialRequirement::any(&[&[
        "SHAREPOINT_ACCOUNT_NAME",
        "SHAREPOINT_CLIENT_ID",
        "SHAREPOINT_CLIENT_SECRET",
        "SHAREPOINT_REFRESH_TOKEN",
    ]]);
    pub const DROPBOX: CredentialRequirement = CredentialRequirement::any(&[&[
        "DROPBOX_APP_KEY",
        "DROPBOX_APP_SECRET",
        "DROPBOX_REDIRECT_URI",
        "DROPBOX_REFRESH_TOKEN",
    ]]);
    pub const BOX: CredentialRequirement = CredentialRequirement::any(&[&[
        "BOX_CLIENT_ID",
        "BOX_CLIENT_SECRET",
        "BOX_REDIRECT_URI",
        "BOX_REFRESH_TOKEN",
    ]]);
    pub const TWITTER: CredentialRequirement = CredentialRequirement::any(&[&["TWITTER_TOKEN"]]);
    /// OAuth 1.0a consumer and access pairs for posting.
    pub const TWITTER_NOTIFICATION: CredentialRequirement = CredentialRequirement::any(&[&[
        "TWITTER_CONSUMER_API_KEY",
        "TWITTER_CONSUMER_API_SECRET",
        "TWITTER_ACCESS_TOKEN_KEY",
        "TWITTER_ACCESS_TOKEN_SECRET",
    ]]);
}

// ---------------------------------------------------------------------------
// Credentials snapshot
// ---------------------------------------------------------------------------

/// All connector credentials known at startup.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    values: HashMap<String, Secret>,
}

impl Credentials {
    /// Snapshot `names` from the process environment. Empty values count as absent.
    pub fn from_env<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::from_lookup(names, |name| std::env::var(name).ok())
    }

    /// Snapshot `names` through an arbitrary lookup.
    pub fn from_lookup<'a>(
        names: impl IntoIterator<Item = &'a str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let values = names
            .into_iter()
            .filter_map(|name| {
                lookup(name)
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| (name.to_string(), Secret::new(v)))
            })
            .collect();
        Self { values }
    }

    /// Build from explicit pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), Secret::new(v)))
            .filter(|(_, v)| !v.expose().trim().is_empty())
            .collect();
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&Secret> {
        self.values.get(name)
    }

    /// Names of configured values, sorted (never the values themselves).
    pub fn configured_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// The credential values one connector will use.
#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    values: HashMap<&'static str, Secret>,
    alternative: usize,
}

impl ResolvedCredentials {
    /// Index of the alternative that matched (0 = highest priority).
    pub fn alternative(&self) -> usize {
        self.alternative
    }

    /// A value from the matched alternative.
    pub fn get(&self, name: &str) -> Option<&Secret> {
        self.values.get(name)
    }

    /// A value the builder requires; errors if the matched alternative lacks it.
    pub fn require(&self, name: &str) -> Result<Secret> {
        self.get(name)
            .cloned()
            .ok_or_else(|| SourceBridgeError::missing_credential(name.to_string()))
    }
}

/// Resolve `requirement` against the snapshot.
///
/// Alternatives are tried in order. When none is complete the error names
/// the missing variables of every alternative.
pub fn resolve(
    credentials: &Credentials,
    requirement: &CredentialRequirement,
) -> Result<ResolvedCredentials> {
    if requirement.is_empty() {
        return Ok(ResolvedCredentials {
            values: HashMap::new(),
            alternative: 0,
        });
    }

    let mut missing_per_alternative = Vec::new();

    for (idx, names) in requirement.alternatives().iter().enumerate() {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| credentials.get(name).is_none())
            .collect();

        if missing.is_empty() {
            let values = names
                .iter()
                .filter_map(|name| credentials.get(name).map(|v| (*name, v.clone())))
                .collect();
            debug!(alternative = idx, names = ?names, "credentials resolved");
            return Ok(ResolvedCredentials {
                values,
                alternative: idx,
            });
        }

        missing_per_alternative.push(missing.join(", "));
    }

    let message = if missing_per_alternative.len() == 1 {
        format!(
            "set the {} environment variable(s)",
            missing_per_alternative[0]
        )
    } else {
        format!(
            "set one of: {}",
            missing_per_alternative
                .iter()
                .map(|m| format!("[{m}]"))
                .collect::<Vec<_>>()
                .join(" or ")
        )
    };
    Err(SourceBridgeError::missing_credential(message))
}
