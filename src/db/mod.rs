// Database module - provides data access layer

use std::str::FromStr;

use color_eyre::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

// Re-export models for convenience
pub mod models;
pub use models::*;
pub use user::PASSWORD_PROVIDER;

// Internal modules
mod migrations;
mod quiz;
mod run;
mod user;

// Main database handle
#[derive(Clone)]
pub struct Db {
    pool: sqlx::SqlitePool,
}

impl Db {
    /// Connects to the SQLite database at `url` (e.g. `sqlite://gitapath.db`),
    /// creating the file if needed, and applies pending migrations.
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await?;
        if one != 1 {
            color_eyre::eyre::bail!("connection check failed");
        }

        migrations::run(&pool).await?;

        tracing::info!("database connection has been verified");

        Ok(Self { pool })
    }

    pub async fn migration_applied(&self, version: &str) -> Result<bool> {
        let applied: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE version = ?)",
        )
        .bind(version)
        .fetch_one(&self.pool)
        .await?;

        Ok(applied)
    }
}
