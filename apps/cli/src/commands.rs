//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Map, Value};
use tracing::info;

use sourcebridge_connectors::{Credentials, known_credential_names};
use sourcebridge_core::{
    CompletionState, CompletionTarget, Dispatcher, tool_descriptors, wait_for_completion,
};
use sourcebridge_platform::{HttpPlatform, PlatformOptions};
use sourcebridge_shared::{
    AppConfig, duration, init_config, load_config, load_config_from, load_identity,
    resolve_endpoint,
};

use crate::serve;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// SourceBridge: one dispatch surface for every ingestion source.
#[derive(Parser)]
#[command(
    name = "sourcebridge",
    version,
    about = "Create feeds, query content and manage a remote content platform from one tool surface.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.sourcebridge/sourcebridge.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Platform endpoint. Overrides SOURCEBRIDGE_API_URL and the config file.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Serve every operation as an MCP tool over stdio.
    Serve,

    /// List the operation catalog.
    Tools {
        /// Print the full descriptors, input schemas included, as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Run one operation and print its result.
    Call {
        /// Operation name, e.g. web_crawl.
        name: String,

        /// Arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// Poll a feed or content item until it finishes.
    Wait {
        /// What to wait for.
        target: WaitTarget,

        /// Feed or content id.
        id: String,

        /// Time between checks, as an ISO-8601 duration.
        #[arg(long, default_value = "PT10S")]
        interval: String,

        /// Give up after this long, as an ISO-8601 duration.
        #[arg(long, default_value = "PT10M")]
        timeout: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Entity kinds `wait` understands.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum WaitTarget {
    Feed,
    Content,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries
/// results and the tool protocol.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "sourcebridge=info",
        1 => "sourcebridge=debug",
        _ => "sourcebridge=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Serve => {
            let dispatcher = build_dispatcher(&cli)?;
            serve::serve(Arc::new(dispatcher)).await
        }
        Command::Tools { json } => cmd_tools(&cli, *json),
        Command::Call { name, args } => cmd_call(&cli, name, args).await,
        Command::Wait {
            target,
            id,
            interval,
            timeout,
        } => cmd_wait(&cli, target, id, interval, timeout).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&cli),
        },
    }
}

fn resolved_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    config.platform.endpoint = match &cli.endpoint {
        Some(endpoint) => endpoint.clone(),
        None => resolve_endpoint(&config.platform),
    };
    Ok(config)
}

/// Load config, identity and credentials, and bind them to a dispatcher.
///
/// A missing platform identity stops the process here.
fn build_dispatcher(cli: &Cli) -> Result<Dispatcher> {
    let config = resolved_config(cli)?;
    let identity =
        load_identity(&config.platform).wrap_err("cannot start without a platform identity")?;

    let opts = PlatformOptions {
        endpoint: config.platform.endpoint.clone(),
        timeout_secs: config.platform.timeout_secs,
    };
    let platform = HttpPlatform::new(identity, &opts)?;
    let credentials = Credentials::from_env(known_credential_names());

    info!(
        endpoint = %platform.endpoint(),
        credentials = ?credentials.configured_names(),
        "dispatcher ready"
    );

    Ok(Dispatcher::new(Arc::new(platform), credentials, config.defaults))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_tools(cli: &Cli, json: bool) -> Result<()> {
    let config = resolved_config(cli)?;
    // Listing needs no identity, only the defaults that shape the schemas.
    let tools = tool_descriptors(&config.defaults);

    if json {
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    let width = tools.iter().map(|t| t.name.len()).max().unwrap_or(0);
    for tool in &tools {
        let summary = tool.description.lines().next().unwrap_or_default();
        println!("  {:<width$}  {summary}", tool.name);
    }
    println!();
    println!("  {} operations", tools.len());
    Ok(())
}

async fn cmd_call(cli: &Cli, name: &str, raw_args: &str) -> Result<()> {
    let arguments = parse_arguments(raw_args)?;
    let dispatcher = build_dispatcher(cli)?;

    let result = dispatcher.invoke(name, &arguments).await;
    let text = result.text().unwrap_or_default().to_string();
    if result.is_error {
        return Err(eyre!("{name} failed: {text}"));
    }
    println!("{text}");
    Ok(())
}

fn parse_arguments(raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw).wrap_err("--args is not valid JSON")? {
        Value::Object(map) => Ok(map),
        other => Err(eyre!("--args must be a JSON object, got {other}")),
    }
}

async fn cmd_wait(
    cli: &Cli,
    target: &WaitTarget,
    id: &str,
    interval: &str,
    timeout: &str,
) -> Result<()> {
    let interval_dur = duration::parse(interval.trim())?;
    let timeout_dur = duration::parse(timeout.trim())?;
    let target = match target {
        WaitTarget::Feed => CompletionTarget::Feed(id.to_string()),
        WaitTarget::Content => CompletionTarget::Content(id.to_string()),
    };
    let dispatcher = build_dispatcher(cli)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .map_err(|e| eyre!("invalid progress template: {e}"))?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner.set_message(format!("Waiting for {} {id}", target.kind()));

    let outcome = wait_for_completion(
        dispatcher.platform(),
        &target,
        interval_dur,
        timeout_dur,
        |check, state| {
            spinner.set_message(format!(
                "Waiting for {} {id} [check {check}: {state:?}]",
                target.kind()
            ));
        },
    )
    .await;
    spinner.finish_and_clear();
    let outcome = outcome?;

    match outcome.state {
        CompletionState::Done => {
            println!("  {} {id} is done ({} checks)", target.kind(), outcome.checks);
            Ok(())
        }
        CompletionState::Pending => Err(eyre!(
            "{} {id} still pending after {timeout} ({} checks)",
            target.kind(),
            outcome.checks
        )),
    }
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(cli: &Cli) -> Result<()> {
    let config = resolved_config(cli)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
