//! ihoms-console - terminal client for the IHOMS helpdesk

mod cli;
mod commands;
mod logger;
mod render;

use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logger::init_logger(cli.log_dir.as_deref())?;

    let config = cli.config();
    tracing::debug!(base_url = %config.base_url, "Using backend");

    commands::run(cli.command, &config).await
}
