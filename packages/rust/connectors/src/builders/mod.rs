//! Per-source request builders.
//!
//! Each source kind has a `*_params()` function declaring its
//! source-specific parameters and a builder turning validated arguments plus
//! resolved credentials into its [`ConnectorConfig`](crate::ConnectorConfig)
//! variant. Builders are pure: everything they read arrives through
//! [`BuildContext`].

pub mod mail;
pub mod messaging;
pub mod social;
pub mod storage;
pub mod tracker;
pub mod web;

use chrono::{DateTime, Utc};
use serde::Serialize;

use sourcebridge_shared::{Args, Result, SourceBridgeError};

use crate::credentials::{ResolvedCredentials, Secret};

/// Inputs available to a builder.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub args: &'a Args,
    pub credentials: &'a ResolvedCredentials,
    /// Read limit after applying the kind's default.
    pub read_limit: u32,
    /// Reference instant for relative windows.
    pub now: DateTime<Utc>,
}

impl BuildContext<'_> {
    /// A credential value the matched alternative must carry.
    pub fn secret(&self, name: &str) -> Result<Secret> {
        self.credentials.require(name)
    }

    /// The `<PREFIX>_CLIENT_ID` / `_CLIENT_SECRET` / `_REFRESH_TOKEN` triple.
    pub fn oauth(&self, prefix: &str) -> Result<OAuthApp> {
        Ok(OAuthApp {
            client_id: self.secret(&format!("{prefix}_CLIENT_ID"))?,
            client_secret: self.secret(&format!("{prefix}_CLIENT_SECRET"))?,
            refresh_token: self.secret(&format!("{prefix}_REFRESH_TOKEN"))?,
        })
    }

    /// Folder traversal flag; folder-like sources recurse unless told not to.
    pub fn recursive(&self) -> bool {
        self.args.opt_bool("recursive").unwrap_or(true)
    }

    /// A required string argument, trimmed.
    pub fn required(&self, name: &str) -> Result<String> {
        let value = self.args.str(name)?.trim();
        if value.is_empty() {
            return Err(SourceBridgeError::validation(format!(
                "parameter '{name}' must not be empty"
            )));
        }
        Ok(value.to_string())
    }

    /// An optional string argument, trimmed; blank counts as absent.
    pub fn optional(&self, name: &str) -> Option<String> {
        self.args
            .opt_str(name)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }

    /// An optional RFC 3339 timestamp argument.
    pub fn timestamp(&self, name: &str) -> Result<Option<DateTime<Utc>>> {
        self.optional(name)
            .map(|raw| {
                DateTime::parse_from_rfc3339(&raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| {
                        SourceBridgeError::validation(format!(
                            "parameter '{name}' must be an RFC 3339 timestamp: {e}"
                        ))
                    })
            })
            .transpose()
    }
}

/// OAuth application credentials with a long-lived refresh token.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthApp {
    pub client_id: Secret,
    pub client_secret: Secret,
    pub refresh_token: Secret,
}

#[cfg(test)]
pub(crate) mod testing {
    use chrono::TimeZone;

    use super::*;
    use crate::credentials::{CredentialRequirement, Credentials, resolve};

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    pub fn resolved(
        requirement: &CredentialRequirement,
        pairs: &[(&str, &str)],
    ) -> ResolvedCredentials {
        let creds = Credentials::from_pairs(pairs.iter().copied());
        resolve(&creds, requirement).unwrap()
    }

    pub fn context<'a>(args: &'a Args, credentials: &'a ResolvedCredentials) -> BuildContext<'a> {
        BuildContext {
            args,
            credentials,
            read_limit: 100,
            now: now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::credentials::CredentialRequirement;

    #[test]
    fn recursive_defaults_on() {
        let creds = resolved(&CredentialRequirement::none(), &[]);
        let args = Args::new();
        assert!(context(&args, &creds).recursive());

        let args = Args::new().with("recursive", false);
        assert!(!context(&args, &creds).recursive());
    }

    #[test]
    fn blank_required_is_rejected() {
        let creds = resolved(&CredentialRequirement::none(), &[]);
        let args = Args::new().with("url", "   ");
        assert!(context(&args, &creds).required("url").is_err());
    }

    #[test]
    fn timestamps_must_be_rfc3339() {
        let creds = resolved(&CredentialRequirement::none(), &[]);
        let args = Args::new()
            .with("afterDate", "2026-01-01T00:00:00Z")
            .with("beforeDate", "next tuesday");
        let ctx = context(&args, &creds);
        assert!(ctx.timestamp("afterDate").unwrap().is_some());
        assert!(ctx.timestamp("beforeDate").is_err());
        assert!(ctx.timestamp("missing").unwrap().is_none());
    }
}
