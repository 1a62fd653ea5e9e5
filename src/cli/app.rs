use clap::{Parser, Subcommand};

use super::commands::auth::AuthCommands;
use super::commands::raw::RawCommands;

#[derive(Parser)]
#[command(name = "admin-cli")]
#[command(about = "A CLI client for multi-tenant business-administration APIs")]
pub struct Cli {
    /// Base URL of the API (overrides ADMIN_API_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Authentication and session management
    Auth(AuthCommands),
    /// Execute raw HTTP requests against the API
    Raw(RawCommands),
}
