//! SourceBridge CLI: one dispatch surface for every ingestion source.
//!
//! Serves the operation catalog as a stdio tool server, or runs single
//! operations from the shell.

mod commands;
mod serve;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
