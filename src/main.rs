use clap::Parser;
use tracing_subscriber::EnvFilter;

use laboissim::commands::{self, Command};
use laboissim::config::{Cli, Config};
use laboissim::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    tracing::debug!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;
    tracing::debug!("Backend: {}", config.api.base_url);

    let state = AppState::build(config)?;
    commands::run(cli.command.unwrap_or(Command::Serve), state).await
}
