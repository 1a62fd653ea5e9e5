//! Error taxonomy for the session client
//!
//! Callers discriminate on the variant: a `Passthrough` is the business
//! endpoint's own failure, while `RefreshFailed` and `MissingCredential`
//! mean the session itself is gone and the store has been cleared.

use thiserror::Error;

/// Errors surfaced by [`crate::api::ApiClient`] operations
///
/// Cloneable so one refresh outcome can be delivered to every request
/// queued behind it.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// The original request failed for a reason unrelated to the session,
    /// or was rejected again after its single replay
    #[error("request failed{}: {message}", status_suffix(.status))]
    Passthrough {
        status: Option<u16>,
        message: String,
    },

    /// The refresh exchange itself failed; the session was torn down
    #[error("session refresh failed: {message}")]
    RefreshFailed { message: String },

    /// A refresh was needed but no refresh credential is stored
    #[error("no refresh credential available")]
    MissingCredential,
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(status) => format!(" with status {}", status),
        None => String::new(),
    }
}

impl SessionError {
    /// HTTP status carried by the error, when one exists
    pub fn status(&self) -> Option<u16> {
        match self {
            SessionError::Passthrough { status, .. } => *status,
            _ => None,
        }
    }

    pub(crate) fn transport(error: reqwest::Error) -> Self {
        SessionError::Passthrough {
            status: error.status().map(|s| s.as_u16()),
            message: error.to_string(),
        }
    }

    pub(crate) fn storage(error: anyhow::Error) -> Self {
        SessionError::Passthrough {
            status: None,
            message: format!("credential store unavailable: {error:#}"),
        }
    }
}
