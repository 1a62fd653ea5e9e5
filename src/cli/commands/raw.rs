//! Raw API command handler

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::*;

use admin_cli::api::ApiClient;

use super::auth::print_signin_hint;

#[derive(Args)]
pub struct RawCommands {
    /// API endpoint path (e.g., "/companies?page=1")
    #[arg(help = "API endpoint path")]
    pub endpoint: String,

    /// HTTP method
    #[arg(long, default_value = "get", help = "HTTP method")]
    pub method: HttpMethod,

    /// Request body data (JSON)
    #[arg(long, help = "Request body data (JSON string)")]
    pub data: Option<String>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum HttpMethod {
    /// GET request
    Get,
    /// POST request
    Post,
    /// PUT request
    Put,
    /// DELETE request
    Delete,
}

/// Handle the raw API command
pub async fn handle_raw_command(args: RawCommands, base_url: Option<String>) -> Result<()> {
    let base_url = super::resolve_base_url(base_url)?;
    let client = ApiClient::new(base_url, crate::global_config().token_store())
        .with_signout_hook(print_signin_hint);

    let body = args
        .data
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .context("Request body is not valid JSON")?;

    let response = match args.method {
        HttpMethod::Get => client.get(&args.endpoint).await?,
        HttpMethod::Post => {
            let body = body.context("--data is required for POST requests")?;
            client.post(&args.endpoint, body).await?
        }
        HttpMethod::Put => {
            let body = body.context("--data is required for PUT requests")?;
            client.put(&args.endpoint, body).await?
        }
        HttpMethod::Delete => client.delete(&args.endpoint).await?,
    };

    println!("{} {}", "Status:".dimmed(), response.status.to_string().bright_green());
    println!("{}", serde_json::to_string_pretty(&response.body)?);

    Ok(())
}
