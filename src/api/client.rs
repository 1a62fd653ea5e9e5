use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::auth::{AuthClient, TokenStore};

use super::constants::{self, headers};
use super::error::SessionError;
use super::models::ApiResponse;
use super::session::{RefreshCoordinator, RefreshOutcome, RefreshRole};

/// Callback invoked with the sign-in URL after an unrecoverable session
/// failure, once the stored credentials have been cleared
pub type SignoutHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Session-aware admin platform client with connection pooling
///
/// Every business request goes through the session pipeline: the stored
/// access credential is attached on the way out, and a 401 on the way back
/// triggers a coordinated refresh followed by a single replay.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    auth: AuthClient,
    store: TokenStore,
    coordinator: Arc<RefreshCoordinator>,
    signout: SignoutHook,
}

impl ApiClient {
    pub fn new(base_url: String, store: TokenStore) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();

        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(10)           // Max idle connections per host
            .pool_idle_timeout(Duration::from_secs(90))  // Keep connections alive for 90s
            .timeout(Duration::from_secs(30))     // Request timeout, applied transport-wide
            .connect_timeout(Duration::from_secs(10))    // Connection timeout
            .user_agent("admin-cli/1.0")          // Custom user agent
            .build()
            .expect("Failed to build HTTP client");

        let auth = AuthClient::new(base_url.clone());

        Self {
            base_url,
            http,
            auth,
            store,
            coordinator: Arc::new(RefreshCoordinator::new()),
            signout: Arc::new(|signin_url| {
                warn!("Session expired, sign in again at {}", signin_url);
            }),
        }
    }

    /// Install a sign-out handler replacing the default log-only one
    pub fn with_signout_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.signout = Arc::new(hook);
        self
    }

    /// The sign-in entry point users are directed to after session teardown
    pub fn signin_url(&self) -> String {
        constants::signin_page(&self.base_url)
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, SessionError> {
        self.execute(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<ApiResponse, SessionError> {
        self.execute(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<ApiResponse, SessionError> {
        self.execute(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse, SessionError> {
        self.execute(Method::DELETE, path, None).await
    }

    /// Execute a request through the session pipeline
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, SessionError> {
        let access = self
            .store
            .get_access_token()
            .await
            .map_err(SessionError::storage)?;
        if access.is_none() {
            debug!("No stored access credential, sending {} {} unauthenticated", method, path);
        }

        let response = self.send(&method, path, body.as_ref(), access.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::finish_response(response).await;
        }

        // A rejection from the refresh endpoint itself must not trigger
        // another refresh; the session is gone
        if constants::is_refresh_request(path) {
            let message = response.text().await.unwrap_or_default();
            warn!("Refresh endpoint rejected the session: {}", message);
            self.sign_out().await;
            return Err(SessionError::RefreshFailed { message });
        }

        info!("Access credential rejected on {} {}, renewing session", method, path);
        let access = self.refresh_session().await?;

        // Replay exactly once; a second rejection is surfaced as-is
        debug!("Replaying {} {} with the renewed access credential", method, path);
        let retried = self.send(&method, path, body.as_ref(), Some(&access)).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            let message = retried.text().await.unwrap_or_default();
            return Err(SessionError::Passthrough {
                status: Some(StatusCode::UNAUTHORIZED.as_u16()),
                message,
            });
        }
        Self::finish_response(retried).await
    }

    /// Renew the session, coordinating with any refresh already in flight
    ///
    /// The first caller performs the exchange; concurrent callers await its
    /// outcome. On failure the store is cleared and the sign-out hook fires
    /// before the error is returned.
    pub async fn refresh_session(&self) -> RefreshOutcome {
        match self.coordinator.begin().await {
            RefreshRole::Leader => {
                let outcome = self.run_refresh().await;
                // Settle waiters and clear the flag before any teardown
                self.coordinator.finish(outcome.clone()).await;
                if outcome.is_err() {
                    self.sign_out().await;
                }
                outcome
            }
            RefreshRole::Follower(rx) => match rx.await {
                Ok(outcome) => outcome,
                Err(_) => Err(SessionError::RefreshFailed {
                    message: "refresh abandoned before completion".to_string(),
                }),
            },
        }
    }

    /// Perform the refresh exchange and rotate the stored pair
    async fn run_refresh(&self) -> RefreshOutcome {
        let refresh_token = match self.store.get_refresh_token().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                warn!("Session renewal needed but no refresh credential is stored");
                return Err(SessionError::MissingCredential);
            }
            Err(error) => {
                return Err(SessionError::RefreshFailed {
                    message: format!("credential store unavailable: {error:#}"),
                });
            }
        };

        let pair = match self.auth.refresh(&refresh_token).await {
            Ok(pair) => pair,
            Err(error) => {
                warn!("Session refresh failed: {error:#}");
                return Err(SessionError::RefreshFailed {
                    message: format!("{error:#}"),
                });
            }
        };

        if let Err(error) = self.store.set_tokens(&pair).await {
            return Err(SessionError::RefreshFailed {
                message: format!("failed to persist renewed credentials: {error:#}"),
            });
        }

        info!("Session refreshed, credential pair rotated");
        Ok(pair.access_token)
    }

    /// Tear the session down: clear stored credentials and fire the
    /// sign-out hook with the sign-in URL
    async fn sign_out(&self) {
        if let Err(error) = self.store.clear_tokens().await {
            warn!("Failed to clear stored credentials during sign-out: {error:#}");
        }
        let signin_url = self.signin_url();
        info!("Session torn down, directing client to {}", signin_url);
        (self.signout)(&signin_url);
    }

    async fn send(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<reqwest::Response, SessionError> {
        let url = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header("Accept", headers::CONTENT_TYPE_JSON);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        request.send().await.map_err(SessionError::transport)
    }

    /// Turn a settled HTTP response into the caller-facing result
    async fn finish_response(response: reqwest::Response) -> Result<ApiResponse, SessionError> {
        let status = response.status();
        if status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = if text.is_empty() {
                // No content (delete operations)
                Value::Null
            } else {
                serde_json::from_str(&text).unwrap_or(Value::String(text))
            };
            Ok(ApiResponse {
                status: status.as_u16(),
                body,
            })
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(SessionError::Passthrough {
                status: Some(status.as_u16()),
                message,
            })
        }
    }
}
