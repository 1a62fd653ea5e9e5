//! SQLite-based configuration module for admin-cli
//!
//! Provides persistent storage for the session credential pair, surviving
//! process restarts the way the upstream dashboard's local storage survives
//! page reloads.

use anyhow::{Context, Result};
use std::path::PathBuf;

pub mod db;
pub mod repository;

use crate::auth::TokenStore;

/// Main configuration manager using a SQLite backend
pub struct Config {
    pub(crate) pool: sqlx::SqlitePool,
    config_path: PathBuf,
}

impl Config {
    /// Get the path to the SQLite database file
    pub fn get_db_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("admin-cli")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".admin-cli")
        };

        // Ensure the directory exists
        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            log::info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir.join("config.db"))
    }

    /// Load configuration from the SQLite database
    pub async fn load() -> Result<Self> {
        let db_path = Self::get_db_path()?;
        log::debug!("Loading config from: {:?}", db_path);

        let pool = db::connect(&db_path).await?;
        db::run_migrations(&pool).await?;

        Ok(Self {
            pool,
            config_path: db_path,
        })
    }

    /// Create a new config for testing (in-memory database)
    pub async fn new_test() -> Result<Self> {
        let pool = db::connect_memory().await?;
        db::run_migrations(&pool).await?;

        Ok(Self {
            pool,
            config_path: PathBuf::from(":memory:"),
        })
    }

    /// Path of the backing database file
    pub fn path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Handle to the stored session credentials
    pub fn token_store(&self) -> TokenStore {
        TokenStore::new(self.pool.clone())
    }
}
