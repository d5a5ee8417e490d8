//! Chat-channel sources.

use serde::Serialize;

use sourcebridge_shared::{ParamSpec, Result};

use super::{BuildContext, OAuthApp};
use crate::ConnectorConfig;
use crate::credentials::Secret;

/// A bot-token channel (Slack, Discord).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProperties {
    pub token: Secret,
    pub channel: String,
    pub include_attachments: bool,
    pub read_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsProperties {
    #[serde(flatten)]
    pub oauth: OAuthApp,
    pub team_id: String,
    pub channel_id: String,
    pub read_limit: u32,
}

pub fn slack_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string(
            "channelName",
            "Slack channel name without '#' (see list_slack_channels).",
        )
        .required(),
        attachments_param(),
    ]
}

pub fn slack(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    channel(ctx, "SLACK_BOT_TOKEN").map(ConnectorConfig::Slack)
}

pub fn discord_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("channelName", "Discord channel name.").required(),
        attachments_param(),
    ]
}

pub fn discord(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    channel(ctx, "DISCORD_BOT_TOKEN").map(ConnectorConfig::Discord)
}

pub fn microsoft_teams_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("teamId", "Microsoft Teams team identifier (see list_microsoft_teams).")
            .required(),
        ParamSpec::string("channelId", "Channel identifier within the team.").required(),
    ]
}

pub fn microsoft_teams(ctx: &BuildContext<'_>) -> Result<ConnectorConfig> {
    Ok(ConnectorConfig::MicrosoftTeams(TeamsProperties {
        oauth: ctx.oauth("MICROSOFT_TEAMS")?,
        team_id: ctx.required("teamId")?,
        channel_id: ctx.required("channelId")?,
        read_limit: ctx.read_limit,
    }))
}

fn channel(ctx: &BuildContext<'_>, token_var: &str) -> Result<ChannelProperties> {
    let name = ctx.required("channelName")?;
    Ok(ChannelProperties {
        token: ctx.secret(token_var)?,
        channel: name.trim_start_matches('#').to_string(),
        include_attachments: ctx.args.flag("includeAttachments"),
        read_limit: ctx.read_limit,
    })
}

fn attachments_param() -> ParamSpec {
    ParamSpec::boolean("includeAttachments", "Also ingest files attached to messages.")
        .default_value(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::testing::*;
    use crate::credentials::requirements;
    use sourcebridge_shared::Args;

    #[test]
    fn slack_strips_channel_hash() {
        let creds = resolved(&requirements::SLACK, &[("SLACK_BOT_TOKEN", "xoxb-1")]);
        let args = Args::new().with("channelName", "#general");

        let json = serde_json::to_value(slack(&context(&args, &creds)).unwrap()).unwrap();
        assert_eq!(json["type"], "Slack");
        assert_eq!(json["channel"], "general");
        assert_eq!(json["token"], "xoxb-1");
        assert_eq!(json["includeAttachments"], false);
    }

    #[test]
    fn discord_uses_its_own_token() {
        let creds = resolved(&requirements::DISCORD, &[("DISCORD_BOT_TOKEN", "dtok")]);
        let args = Args::new()
            .with("channelName", "releases")
            .with("includeAttachments", true);

        let json = serde_json::to_value(discord(&context(&args, &creds)).unwrap()).unwrap();
        assert_eq!(json["type"], "Discord");
        assert_eq!(json["token"], "dtok");
        assert_eq!(json["includeAttachments"], true);
    }

    #[test]
    fn teams_needs_team_and_channel() {
        let creds = resolved(
            &requirements::MICROSOFT_TEAMS,
            &[
                ("MICROSOFT_TEAMS_CLIENT_ID", "c"),
                ("MICROSOFT_TEAMS_CLIENT_SECRET", "s"),
                ("MICROSOFT_TEAMS_REFRESH_TOKEN", "r"),
            ],
        );
        let args = Args::new().with("teamId", "t1");
        assert!(microsoft_teams(&context(&args, &creds)).is_err());

        let args = args.with("channelId", "c1");
        let json =
            serde_json::to_value(microsoft_teams(&context(&args, &creds)).unwrap()).unwrap();
        assert_eq!(json["type"], "MicrosoftTeams");
        assert_eq!(json["teamId"], "t1");
        assert_eq!(json["channelId"], "c1");
        assert_eq!(json["clientSecret"], "s");
    }
}
