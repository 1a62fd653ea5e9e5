use anyhow::Result;
use sqlx::SqlitePool;

use crate::api::models::TokenPair;
use crate::config::repository::session;

use super::token;

/// Durable store for the session credential pair
///
/// A cheap-clone handle over the configuration database. Missing data reads
/// as `None` (or "expired"), never as an error; only the database itself
/// failing surfaces as `Err`.
#[derive(Clone)]
pub struct TokenStore {
    pool: SqlitePool,
}

impl TokenStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a credential pair, all fields written together
    pub async fn set_tokens(&self, pair: &TokenPair) -> Result<()> {
        session::save(&self.pool, pair).await
    }

    pub async fn get_access_token(&self) -> Result<Option<String>> {
        session::get(&self.pool, session::ACCESS_TOKEN_KEY).await
    }

    pub async fn get_refresh_token(&self) -> Result<Option<String>> {
        session::get(&self.pool, session::REFRESH_TOKEN_KEY).await
    }

    pub async fn token_type(&self) -> Result<Option<String>> {
        session::get(&self.pool, session::TOKEN_TYPE_KEY).await
    }

    /// Advisory lifetime of the access credential, when the server sent one
    pub async fn expires_in(&self) -> Result<Option<u64>> {
        let value = session::get(&self.pool, session::EXPIRES_IN_KEY).await?;
        Ok(value.and_then(|v| v.parse().ok()))
    }

    /// Overwrite only the access credential, leaving the refresh credential
    /// in place
    pub async fn update_access_token(&self, access_token: &str) -> Result<()> {
        session::set(&self.pool, session::ACCESS_TOKEN_KEY, access_token).await
    }

    /// Remove every stored session field
    pub async fn clear_tokens(&self) -> Result<()> {
        session::clear(&self.pool).await
    }

    /// Whether both credentials are present
    pub async fn has_tokens(&self) -> Result<bool> {
        Ok(self.get_access_token().await?.is_some() && self.get_refresh_token().await?.is_some())
    }

    /// Whether the stored access credential should be treated as expired
    ///
    /// True when none is stored; otherwise the fail-closed claim check.
    pub async fn is_access_token_expired(&self) -> Result<bool> {
        match self.get_access_token().await? {
            Some(access_token) => Ok(token::is_token_expired(&access_token)),
            None => Ok(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;

    use super::*;

    fn pair(access: &str, refresh: &str) -> TokenPair {
        TokenPair {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
            token_type: Some("Bearer".to_string()),
            expires_in: Some(900),
        }
    }

    #[tokio::test]
    async fn test_pair_round_trip() {
        let config = Config::new_test().await.unwrap();
        let store = config.token_store();

        assert!(!store.has_tokens().await.unwrap());
        assert_eq!(store.get_access_token().await.unwrap(), None);

        store.set_tokens(&pair("access-1", "refresh-1")).await.unwrap();

        assert!(store.has_tokens().await.unwrap());
        assert_eq!(
            store.get_access_token().await.unwrap().as_deref(),
            Some("access-1")
        );
        assert_eq!(
            store.get_refresh_token().await.unwrap().as_deref(),
            Some("refresh-1")
        );
        assert_eq!(store.token_type().await.unwrap().as_deref(), Some("Bearer"));
        assert_eq!(store.expires_in().await.unwrap(), Some(900));
    }

    #[tokio::test]
    async fn test_set_tokens_replaces_the_whole_pair() {
        let config = Config::new_test().await.unwrap();
        let store = config.token_store();

        store.set_tokens(&pair("access-1", "refresh-1")).await.unwrap();
        store
            .set_tokens(&TokenPair {
                access_token: "access-2".to_string(),
                refresh_token: "refresh-2".to_string(),
                token_type: None,
                expires_in: None,
            })
            .await
            .unwrap();

        assert_eq!(
            store.get_refresh_token().await.unwrap().as_deref(),
            Some("refresh-2")
        );
        // Optional fields absent from the new pair are dropped, not left stale
        assert_eq!(store.token_type().await.unwrap(), None);
        assert_eq!(store.expires_in().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_access_token_keeps_refresh_token() {
        let config = Config::new_test().await.unwrap();
        let store = config.token_store();

        store.set_tokens(&pair("access-1", "refresh-1")).await.unwrap();
        store.update_access_token("access-2").await.unwrap();

        assert_eq!(
            store.get_access_token().await.unwrap().as_deref(),
            Some("access-2")
        );
        assert_eq!(
            store.get_refresh_token().await.unwrap().as_deref(),
            Some("refresh-1")
        );
    }

    #[tokio::test]
    async fn test_clear_tokens_removes_every_field() {
        let config = Config::new_test().await.unwrap();
        let store = config.token_store();

        store.set_tokens(&pair("access-1", "refresh-1")).await.unwrap();
        store.clear_tokens().await.unwrap();

        assert!(!store.has_tokens().await.unwrap());
        assert_eq!(store.get_access_token().await.unwrap(), None);
        assert_eq!(store.get_refresh_token().await.unwrap(), None);
        assert_eq!(store.token_type().await.unwrap(), None);
        assert_eq!(store.expires_in().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expiry_check_defaults_to_expired() {
        let config = Config::new_test().await.unwrap();
        let store = config.token_store();

        // Nothing stored
        assert!(store.is_access_token_expired().await.unwrap());

        // Stored but not a decodable credential
        store.set_tokens(&pair("opaque-access", "refresh-1")).await.unwrap();
        assert!(store.is_access_token_expired().await.unwrap());
    }
}
