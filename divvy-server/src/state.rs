//! Application state

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::config::Config;
use crate::db;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// JWT secret for diner authentication
    pub jwt_secret: String,
}

impl AppState {
    /// Connect the pool, run migrations and build the state.
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        db::MIGRATOR.run(&pool).await?;

        Ok(Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
        })
    }
}
