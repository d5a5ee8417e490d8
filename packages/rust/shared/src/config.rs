//! Application configuration for SourceBridge.
//!
//! User config lives at `~/.sourcebridge/sourcebridge.toml`.
//! CLI flags override environment values, which override config file
//! values, which override defaults. Secrets never live in the file: the
//! file only names the environment variables that hold them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SourceBridgeError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "sourcebridge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".sourcebridge";

/// Environment override for the platform endpoint.
pub const ENDPOINT_ENV: &str = "SOURCEBRIDGE_API_URL";

// ---------------------------------------------------------------------------
// Config structs (matching sourcebridge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote platform settings.
    #[serde(default)]
    pub platform: PlatformConfig,

    /// Operation defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// `[platform]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Dispatch endpoint of the remote platform.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Name of the env var holding the organization id.
    #[serde(default = "default_organization_id_env")]
    pub organization_id_env: String,

    /// Name of the env var holding the environment id.
    #[serde(default = "default_environment_id_env")]
    pub environment_id_env: String,

    /// Name of the env var holding the signing secret.
    #[serde(default = "default_secret_env")]
    pub secret_env: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            organization_id_env: default_organization_id_env(),
            environment_id_env: default_environment_id_env(),
            secret_env: default_secret_env(),
        }
    }
}

fn default_endpoint() -> String {
    "https://api.sourcebridge.dev/v1/dispatch".into()
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_organization_id_env() -> String {
    "SOURCEBRIDGE_ORGANIZATION_ID".into()
}
fn default_environment_id_env() -> String {
    "SOURCEBRIDGE_ENVIRONMENT_ID".into()
}
fn default_secret_env() -> String {
    "SOURCEBRIDGE_JWT_SECRET".into()
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default read limit for connector feeds.
    #[serde(default = "default_read_limit")]
    pub read_limit: u32,

    /// Default read limit for RSS feeds.
    #[serde(default = "default_rss_read_limit")]
    pub rss_read_limit: u32,

    /// Default interval for recurring feeds.
    #[serde(default = "default_repeat_interval")]
    pub repeat_interval: String,

    /// Default result limit for content queries.
    #[serde(default = "default_query_limit")]
    pub query_limit: u32,

    /// Page size for usage queries.
    #[serde(default = "default_usage_page_size")]
    pub usage_page_size: u32,

    /// Upper bound on usage pages fetched in one query.
    #[serde(default = "default_max_usage_pages")]
    pub max_usage_pages: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            read_limit: default_read_limit(),
            rss_read_limit: default_rss_read_limit(),
            repeat_interval: default_repeat_interval(),
            query_limit: default_query_limit(),
            usage_page_size: default_usage_page_size(),
            max_usage_pages: default_max_usage_pages(),
        }
    }
}

impl DefaultsConfig {
    /// Reject values that would make an operation silently do nothing.
    pub fn validate(&self) -> Result<()> {
        if self.usage_page_size == 0 {
            return Err(SourceBridgeError::config(
                "defaults.usage_page_size must be at least 1",
            ));
        }
        if self.max_usage_pages == 0 {
            return Err(SourceBridgeError::config(
                "defaults.max_usage_pages must be at least 1",
            ));
        }
        Ok(())
    }
}

fn default_read_limit() -> u32 {
    100
}
fn default_rss_read_limit() -> u32 {
    25
}
fn default_repeat_interval() -> String {
    "PT15M".into()
}
fn default_query_limit() -> u32 {
    100
}
fn default_usage_page_size() -> u32 {
    1000
}
fn default_max_usage_pages() -> u32 {
    1000
}

// ---------------------------------------------------------------------------
// Platform identity
// ---------------------------------------------------------------------------

/// Identity and secret used to authenticate every remote call.
#[derive(Clone)]
pub struct PlatformIdentity {
    pub organization_id: String,
    pub environment_id: String,
    pub secret: String,
}

impl std::fmt::Debug for PlatformIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformIdentity")
            .field("organization_id", &self.organization_id)
            .field("environment_id", &self.environment_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Read the platform identity from the process environment.
pub fn load_identity(config: &PlatformConfig) -> Result<PlatformIdentity> {
    identity_from_lookup(config, |name| std::env::var(name).ok())
}

/// Resolve the platform identity through `lookup`.
///
/// Fails with a config error naming every missing variable.
pub fn identity_from_lookup(
    config: &PlatformConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<PlatformIdentity> {
    let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let organization_id = read(&config.organization_id_env);
    let environment_id = read(&config.environment_id_env);
    let secret = read(&config.secret_env);

    match (organization_id, environment_id, secret) {
        (Some(organization_id), Some(environment_id), Some(secret)) => Ok(PlatformIdentity {
            organization_id,
            environment_id,
            secret,
        }),
        (org, env, secret) => {
            let missing: Vec<&str> = [
                (org.is_none(), config.organization_id_env.as_str()),
                (env.is_none(), config.environment_id_env.as_str()),
                (secret.is_none(), config.secret_env.as_str()),
            ]
            .into_iter()
            .filter_map(|(absent, name)| absent.then_some(name))
            .collect();
            Err(SourceBridgeError::config(format!(
                "platform identity incomplete. Set the {} environment variable(s).",
                missing.join(", ")
            )))
        }
    }
}

/// Endpoint after applying the environment override.
pub fn resolve_endpoint(config: &PlatformConfig) -> String {
    match std::env::var(ENDPOINT_ENV) {
        Ok(val) if !val.trim().is_empty() => val,
        _ => config.endpoint.clone(),
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.sourcebridge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SourceBridgeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.sourcebridge/sourcebridge.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SourceBridgeError::io(path, e))?;
    parse_config(&content, path)
}

fn parse_config(content: &str, path: &Path) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(content).map_err(|e| {
        SourceBridgeError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.defaults.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SourceBridgeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SourceBridgeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SourceBridgeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("endpoint"));
        assert!(toml_str.contains("SOURCEBRIDGE_JWT_SECRET"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.read_limit, 100);
        assert_eq!(parsed.defaults.rss_read_limit, 25);
        assert_eq!(parsed.defaults.repeat_interval, "PT15M");
        assert_eq!(parsed.platform.secret_env, "SOURCEBRIDGE_JWT_SECRET");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let toml_str = r#"
[platform]
endpoint = "http://localhost:9000/dispatch"

[defaults]
usage_page_size = 50
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.platform.endpoint, "http://localhost:9000/dispatch");
        assert_eq!(config.platform.timeout_secs, 60);
        assert_eq!(config.defaults.usage_page_size, 50);
        assert_eq!(config.defaults.max_usage_pages, 1000);
    }

    #[test]
    fn zero_page_bounds_are_rejected_at_load() {
        let path = Path::new("sourcebridge.toml");
        for toml_str in [
            "[defaults]\nmax_usage_pages = 0\n",
            "[defaults]\nusage_page_size = 0\n",
        ] {
            let err = parse_config(toml_str, path).unwrap_err();
            assert!(matches!(err, SourceBridgeError::Config { .. }));
            assert!(err.to_string().contains("must be at least 1"), "{err}");
        }
        assert!(parse_config("[defaults]\nmax_usage_pages = 1\n", path).is_ok());
    }

    #[test]
    fn load_from_file_validates() {
        let path = std::env::temp_dir().join(format!(
            "sourcebridge-config-test-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[defaults]\nmax_usage_pages = 0\n").expect("write temp config");
        let result = load_config_from(&path);
        let _ = std::fs::remove_file(&path);
        assert!(result.unwrap_err().to_string().contains("max_usage_pages"));
    }

    #[test]
    fn identity_resolves_from_lookup() {
        let config = PlatformConfig::default();
        let env: HashMap<&str, &str> = HashMap::from([
            ("SOURCEBRIDGE_ORGANIZATION_ID", "org-1"),
            ("SOURCEBRIDGE_ENVIRONMENT_ID", "env-1"),
            ("SOURCEBRIDGE_JWT_SECRET", "s3cret"),
        ]);
        let identity =
            identity_from_lookup(&config, |name| env.get(name).map(|v| v.to_string())).unwrap();
        assert_eq!(identity.organization_id, "org-1");
        assert!(!format!("{identity:?}").contains("s3cret"));
    }

    #[test]
    fn identity_names_missing_variables() {
        let config = PlatformConfig::default();
        let env: HashMap<&str, &str> =
            HashMap::from([("SOURCEBRIDGE_ORGANIZATION_ID", "org-1"), ("SOURCEBRIDGE_JWT_SECRET", "  ")]);
        let err = identity_from_lookup(&config, |name| env.get(name).map(|v| v.to_string()))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("SOURCEBRIDGE_ENVIRONMENT_ID"));
        assert!(msg.contains("SOURCEBRIDGE_JWT_SECRET"));
        assert!(!msg.contains("SOURCEBRIDGE_ORGANIZATION_ID"));
    }
}
