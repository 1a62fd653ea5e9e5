use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Credential pair issued by the auth endpoints
///
/// The access and refresh credentials always travel together; a pair is
/// written to the store as a unit so no caller observes a mixed state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Advisory lifetime in seconds; expiry is only ever enforced reactively
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

/// Response envelope used by the auth endpoints
#[derive(Debug, Deserialize)]
pub struct AuthEnvelope {
    pub data: TokenPair,
}

/// Successful response from a business endpoint
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}
