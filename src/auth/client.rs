use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde_json::json;

use crate::api::constants;
use crate::api::models::{AuthEnvelope, TokenPair};

/// Client for the auth endpoints, on a bare transport
///
/// The refresh exchange must not pass through the session pipeline, so this
/// client carries its own `reqwest::Client` with no interception attached.
/// The same transport-wide timeouts apply as on business calls.
pub struct AuthClient {
    base_url: String,
    http: Client,
}

impl AuthClient {
    pub fn new(base_url: String) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("admin-cli/1.0")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Sign in with e-mail and password, minting the initial credential pair
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair> {
        let url = constants::signin_endpoint(&self.base_url);
        debug!("Signing in at {}", url);

        let response = self
            .http
            .post(&url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        Self::parse_token_response(response, "Sign-in").await
    }

    /// Exchange the refresh credential for a new credential pair
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let url = constants::refresh_endpoint(&self.base_url);
        debug!("Exchanging refresh credential at {}", url);

        let response = self
            .http
            .post(&url)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        Self::parse_token_response(response, "Refresh").await
    }

    async fn parse_token_response(
        response: reqwest::Response,
        operation: &str,
    ) -> Result<TokenPair> {
        let status = response.status();
        debug!("{} request status: {}", operation, status);

        if status.is_success() {
            let envelope: AuthEnvelope = response
                .json()
                .await
                .with_context(|| format!("{} returned a malformed token response", operation))?;
            Ok(envelope.data)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("{} failed with status {}: {}", operation, status, error_text)
        }
    }
}
