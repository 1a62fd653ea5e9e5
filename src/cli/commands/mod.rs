pub mod auth;
pub mod raw;

pub use auth::auth_command;
pub use raw::handle_raw_command;

use anyhow::Result;

/// Resolve the API base URL from the flag or the environment
pub(crate) fn resolve_base_url(flag: Option<String>) -> Result<String> {
    let url = match flag {
        Some(url) => url,
        None => std::env::var("ADMIN_API_BASE_URL").map_err(|_| {
            anyhow::anyhow!("No API base URL. Pass --base-url or set ADMIN_API_BASE_URL.")
        })?,
    };
    Ok(url.trim_end_matches('/').to_string())
}
