use anyhow::Result;
use clap::Parser;
use log::info;
use once_cell::sync::OnceCell;

mod cli;

use admin_cli::config::Config;
use cli::app::Commands;
use cli::Cli;

// Global Config instance
static CONFIG: OnceCell<Config> = OnceCell::new();

/// Get a reference to the global Config
pub fn global_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    env_logger::Builder::from_default_env().init();

    let cli = Cli::parse();
    info!("Starting admin-cli");

    // Initialize global Config once
    let config = Config::load().await?;
    CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("Failed to initialize global Config"))?;

    match cli.command {
        Commands::Auth(auth_args) => {
            cli::commands::auth_command(auth_args, cli.base_url).await?;
        }
        Commands::Raw(raw_args) => {
            cli::commands::handle_raw_command(raw_args, cli.base_url).await?;
        }
    }

    Ok(())
}
