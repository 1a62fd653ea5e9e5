//! Authentication and session commands

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use dialoguer::{Input, Password};

use admin_cli::api::ApiClient;
use admin_cli::auth::{decode_claims, is_token_expired, AuthClient};

#[derive(Args)]
pub struct AuthCommands {
    #[command(subcommand)]
    pub command: AuthSubcommands,
}

#[derive(Subcommand)]
pub enum AuthSubcommands {
    /// Sign in with e-mail and password
    Login {
        /// Account e-mail (prompted when omitted)
        #[arg(long)]
        email: Option<String>,
        /// Account password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Show the stored session status
    Status,
    /// Force a credential refresh
    Refresh,
    /// Clear the stored session
    Logout,
}

pub async fn auth_command(args: AuthCommands, base_url: Option<String>) -> Result<()> {
    match args.command {
        AuthSubcommands::Login { email, password } => login_command(base_url, email, password).await,
        AuthSubcommands::Status => status_command().await,
        AuthSubcommands::Refresh => refresh_command(base_url).await,
        AuthSubcommands::Logout => logout_command().await,
    }
}

async fn login_command(
    base_url: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let base_url = super::resolve_base_url(base_url)?;

    let email: String = match email {
        Some(email) => email,
        None => Input::new().with_prompt("E-mail").interact_text()?,
    };
    let password: String = match password {
        Some(password) => password,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let auth = AuthClient::new(base_url);
    let pair = auth.login(&email, &password).await?;

    let store = crate::global_config().token_store();
    store.set_tokens(&pair).await?;

    println!("{} Signed in as {}", "✓".bright_green(), email.cyan());
    Ok(())
}

async fn status_command() -> Result<()> {
    let store = crate::global_config().token_store();

    println!();
    println!("  {}", "Session status".bright_blue().bold());
    println!("  {}", "══════════════".bright_blue());
    println!();

    let access = store.get_access_token().await?;
    let refresh = store.get_refresh_token().await?;

    if access.is_none() && refresh.is_none() {
        println!("  {}", "No stored session".bright_yellow().bold());
        println!("  {}", "Run 'admin-cli auth login' to sign in.".dimmed());
        return Ok(());
    }

    match &access {
        Some(token) => {
            let state = if is_token_expired(token) {
                "expired (renewed on next request)".bright_yellow()
            } else {
                "valid".bright_green()
            };
            println!("  {}: {}", "Access credential".dimmed(), state);

            if let Some(claims) = decode_claims(token) {
                if let Some(sub) = claims.sub {
                    println!("  {}: {}", "Subject".dimmed(), sub.white());
                }
                if let Some(exp) = claims.exp {
                    if let Some(when) = chrono::DateTime::from_timestamp(exp, 0) {
                        println!(
                            "  {}: {}",
                            "Expires".dimmed(),
                            when.format("%Y-%m-%d %H:%M:%S UTC").to_string().cyan()
                        );
                    }
                }
            }
        }
        None => println!("  {}: {}", "Access credential".dimmed(), "missing".bright_red()),
    }

    match &refresh {
        Some(_) => println!("  {}: {}", "Refresh credential".dimmed(), "present".bright_green()),
        None => println!("  {}: {}", "Refresh credential".dimmed(), "missing".bright_red()),
    }

    if let Some(token_type) = store.token_type().await? {
        println!("  {}: {}", "Type".dimmed(), token_type.white());
    }
    if let Some(expires_in) = store.expires_in().await? {
        println!("  {}: {}s", "Advertised lifetime".dimmed(), expires_in);
    }

    Ok(())
}

async fn refresh_command(base_url: Option<String>) -> Result<()> {
    let base_url = super::resolve_base_url(base_url)?;
    let client = ApiClient::new(base_url, crate::global_config().token_store())
        .with_signout_hook(print_signin_hint);

    client.refresh_session().await?;

    println!("{} Session refreshed", "✓".bright_green());
    Ok(())
}

async fn logout_command() -> Result<()> {
    let store = crate::global_config().token_store();
    store.clear_tokens().await?;

    println!("{} Signed out, stored session cleared", "✓".bright_green());
    Ok(())
}

/// Sign-out hook for interactive use: tell the user where to sign in again
pub(crate) fn print_signin_hint(signin_url: &str) {
    println!(
        "{} Session expired. Sign in again at {}",
        "!".bright_yellow(),
        signin_url.cyan()
    );
}
