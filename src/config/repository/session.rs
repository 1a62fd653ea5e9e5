//! Repository for stored session credentials
//!
//! The credential pair is laid out as four independent string keys in the
//! `session` table. Absent rows are `None`, never an error; only the
//! database itself failing surfaces as `Err`.

use anyhow::{Context, Result};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::api::models::TokenPair;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const TOKEN_TYPE_KEY: &str = "token_type";
pub const EXPIRES_IN_KEY: &str = "expires_in";

const ALL_KEYS: [&str; 4] = [
    ACCESS_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
    TOKEN_TYPE_KEY,
    EXPIRES_IN_KEY,
];

/// Save a credential pair, writing every field in one transaction
pub async fn save(pool: &SqlitePool, pair: &TokenPair) -> Result<()> {
    let mut tx = pool.begin().await.context("Failed to start transaction")?;

    upsert(&mut tx, ACCESS_TOKEN_KEY, &pair.access_token).await?;
    upsert(&mut tx, REFRESH_TOKEN_KEY, &pair.refresh_token).await?;
    match &pair.token_type {
        Some(token_type) => upsert(&mut tx, TOKEN_TYPE_KEY, token_type).await?,
        None => remove(&mut tx, TOKEN_TYPE_KEY).await?,
    }
    match pair.expires_in {
        Some(expires_in) => upsert(&mut tx, EXPIRES_IN_KEY, &expires_in.to_string()).await?,
        None => remove(&mut tx, EXPIRES_IN_KEY).await?,
    }

    tx.commit()
        .await
        .context("Failed to commit session credentials")?;

    log::debug!("Saved session credential pair");
    Ok(())
}

/// Get a single session value by key
pub async fn get(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM session WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Failed to read session key '{}'", key))?;

    Ok(row.map(|(value,)| value))
}

/// Overwrite a single session value by key
pub async fn set(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO session (key, value, updated_at)
        VALUES (?, ?, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await
    .with_context(|| format!("Failed to write session key '{}'", key))?;

    log::debug!("Updated session key: {}", key);
    Ok(())
}

/// Delete every stored session field in one transaction
pub async fn clear(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await.context("Failed to start transaction")?;

    for key in ALL_KEYS {
        remove(&mut tx, key).await?;
    }

    tx.commit()
        .await
        .context("Failed to commit session teardown")?;

    log::debug!("Cleared stored session credentials");
    Ok(())
}

async fn upsert(tx: &mut Transaction<'_, Sqlite>, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO session (key, value, updated_at)
        VALUES (?, ?, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(&mut **tx)
    .await
    .with_context(|| format!("Failed to write session key '{}'", key))?;

    Ok(())
}

async fn remove(tx: &mut Transaction<'_, Sqlite>, key: &str) -> Result<()> {
    sqlx::query("DELETE FROM session WHERE key = ?")
        .bind(key)
        .execute(&mut **tx)
        .await
        .with_context(|| format!("Failed to delete session key '{}'", key))?;

    Ok(())
}
