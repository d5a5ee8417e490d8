//! Email accounts and calendars.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sourcebridge_shared::{ParamSpec, Result, SourceBridgeError};

use super::{BuildContext, OAuthApp};
use crate::ConnectorConfig;

// ---------------------------------------------------------------------------
// Email
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailProperties {
    #[serde(flatten)]
    pub oauth: OAuthApp,
    pub inbox_only: bool,
    pub exclude_sent_items: bool,
    pub include_attachments: bool,
    pub read_limit: u32,
}

pub fn email_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::boolean("inboxOnly", "Only read messages in the inbox.").default_value(true),
        ParamSpec::boolean("excludeSentItems", "Skip messages sent from this account.")
            .default_value(true),
        ParamSpec::boolean("includeAttachments", "Also ingest email attachments.")
            .default_value(false),
    ]
}

pub fn google_email(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    email(ctx, "GOOGLE_EMAIL").map(ConnectorConfig::GoogleEmail)
}

pub fn microsoft_email(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    email(ctx, "MICROSOFT_EMAIL").map(ConnectorConfig::MicrosoftEmail)
}

fn email(ctx: &BuildContext<'_>, prefix: &str) -> Result<EmailProperties> {
    Ok(EmailProperties {
        oauth: ctx.oauth(prefix)?,
        inbox_only: ctx.args.opt_bool("inboxOnly").unwrap_or(true),
        exclude_sent_items: ctx.args.opt_bool("excludeSentItems").unwrap_or(true),
        include_attachments: ctx.args.flag("includeAttachments"),
        read_limit: ctx.read_limit,
    })
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarProperties {
    #[serde(flatten)]
    pub oauth: OAuthApp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,
    pub after_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_date: Option<DateTime<Utc>>,
    pub read_limit: u32,
}

pub fn calendar_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("calendarId", "Calendar identifier. Omit for the primary calendar."),
        ParamSpec::string(
            "afterDate",
            "Read events starting at or after this RFC 3339 timestamp. Defaults to now.",
        ),
        ParamSpec::string("beforeDate", "Read events starting before this RFC 3339 timestamp."),
    ]
}

pub fn google_calendar(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    calendar(ctx, "GOOGLE_CALENDAR").map(ConnectorConfig::GoogleCalendar)
}

pub fn microsoft_calendar(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    calendar(ctx, "MICROSOFT_CALENDAR").map(ConnectorConfig::MicrosoftCalendar)
}

fn calendar(ctx: &BuildContext<'_>, prefix: &str) -> Result<CalendarProperties> {
    let after_date = ctx.timestamp("afterDate")?.unwrap_or(ctx.now);
    let before_date = ctx.timestamp("beforeDate")?;

    if let Some(before) = before_date {
        if before <= after_date {
            return Err(SourceBridgeError::validation(format!(
                "beforeDate {} must be later than afterDate {}",
                before.to_rfc3339(),
                after_date.to_rfc3339()
            )));
        }
    }

    Ok(CalendarProperties {
        oauth: ctx.oauth(prefix)?,
        calendar_id: ctx.optional("calendarId"),
        after_date,
        before_date,
        read_limit: ctx.read_limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::testing::*;
    use crate::credentials::requirements;
    use sourcebridge_shared::Args;

    fn calendar_creds() -> crate::credentials::ResolvedCredentials {
        resolved(
            &requirements::GOOGLE_CALENDAR,
            &[
                ("GOOGLE_CALENDAR_CLIENT_ID", "c"),
                ("GOOGLE_CALENDAR_CLIENT_SECRET", "s"),
                ("GOOGLE_CALENDAR_REFRESH_TOKEN", "r"),
            ],
        )
    }

    #[test]
    fn email_defaults_to_inbox_without_sent() {
        let creds = resolved(
            &requirements::MICROSOFT_EMAIL,
            &[
                ("MICROSOFT_EMAIL_CLIENT_ID", "c"),
                ("MICROSOFT_EMAIL_CLIENT_SECRET", "s"),
                ("MICROSOFT_EMAIL_REFRESH_TOKEN", "r"),
            ],
        );
        let args = Args::new();

        let json = serde_json::to_value(microsoft_email(&context(&args, &creds)).unwrap()).unwrap();
        assert_eq!(json["type"], "MicrosoftEmail");
        assert_eq!(json["inboxOnly"], true);
        assert_eq!(json["excludeSentItems"], true);
        assert_eq!(json["includeAttachments"], false);
        assert_eq!(json["refreshToken"], "r");
    }

    #[test]
    fn calendar_window_starts_now_by_default() {
        let creds = calendar_creds();
        let args = Args::new();

        let json = serde_json::to_value(google_calendar(&context(&args, &creds)).unwrap()).unwrap();
        assert_eq!(json["type"], "GoogleCalendar");
        assert_eq!(json["afterDate"], "2026-03-01T12:00:00Z");
        assert!(json.get("beforeDate").is_none());
    }

    #[test]
    fn calendar_rejects_inverted_window() {
        let creds = calendar_creds();
        let args = Args::new()
            .with("afterDate", "2026-05-01T00:00:00Z")
            .with("beforeDate", "2026-04-01T00:00:00Z");
        assert!(google_calendar(&context(&args, &creds)).is_err());
    }
}
