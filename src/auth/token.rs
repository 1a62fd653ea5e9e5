//! Local credential inspection
//!
//! Reads the claims segment of a three-part dot-delimited token for display
//! and expiry hints. This is unverified client-side inspection; the server's
//! 401 remains the authoritative expiry signal.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;

/// Claims carried in a credential's payload segment
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Expiry, seconds since the epoch
    pub exp: Option<i64>,
    /// Subject the credential was issued to
    #[serde(default)]
    pub sub: Option<String>,
}

/// Decode the claims segment of a credential
///
/// Returns `None` on any malformed input: wrong segment count, invalid
/// base64url, or a payload that is not a JSON object.
pub fn decode_claims(token: &str) -> Option<Claims> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return None;
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload.as_bytes()).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Whether a credential should be treated as expired
///
/// Fails closed: an undecodable credential, a missing expiry claim, or an
/// expiry at or before now all count as expired.
pub fn is_token_expired(token: &str) -> bool {
    match decode_claims(token) {
        Some(Claims { exp: Some(exp), .. }) => exp <= chrono::Utc::now().timestamp(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_token(payload: &str) -> String {
        format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload),
            URL_SAFE_NO_PAD.encode("signature")
        )
    }

    #[test]
    fn test_decodes_well_formed_claims() {
        let token = make_token(r#"{"exp":4102444800,"sub":"user-17"}"#);
        let claims = decode_claims(&token).expect("claims decode");
        assert_eq!(claims.exp, Some(4102444800));
        assert_eq!(claims.sub.as_deref(), Some("user-17"));
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        assert!(decode_claims("").is_none());
        assert!(decode_claims("only-one-segment").is_none());
        assert!(decode_claims("two.segments").is_none());
        assert!(decode_claims("a.b.c.d").is_none());
        assert!(decode_claims("head.%%%not-base64%%%.sig").is_none());

        let not_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode("plain text"));
        assert!(decode_claims(&not_json).is_none());
    }

    #[test]
    fn test_expiry_fails_closed() {
        // Malformed
        assert!(is_token_expired("garbage"));
        // Well-formed but no expiry claim
        assert!(is_token_expired(&make_token(r#"{"sub":"user-17"}"#)));
        // Expiry in the past
        let past = chrono::Utc::now().timestamp() - 60;
        assert!(is_token_expired(&make_token(&format!("{{\"exp\":{}}}", past))));
    }

    #[test]
    fn test_future_expiry_is_not_expired() {
        let future = chrono::Utc::now().timestamp() + 3600;
        assert!(!is_token_expired(&make_token(&format!(
            "{{\"exp\":{}}}",
            future
        ))));
    }
}
