//! SQLite connection pool using sqlx
//!
//! All stores share this pool. The schema is managed by sqlx's `migrate!()`
//! macro using the SQL files in the workspace `migrations/` directory.

use std::{str::FromStr, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
};
use tracing::{debug, info, instrument};

use crate::config::DatabaseConfig;

/// Error type for database setup
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// SQLite connection pool
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a connection pool and, if configured, apply pending migrations
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or a
    /// migration fails.
    #[instrument(skip_all, fields(url = %config.url()))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let in_memory = config.is_in_memory();
        let mut options = SqliteConnectOptions::from_str(&config.url())?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));
        if !in_memory {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        // Every connection to `:memory:` opens its own database
        let max_connections = if in_memory { 1 } else { config.max_connections.max(1) };

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1);
        if in_memory {
            // Dropping the last connection discards the data
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await?;

        info!(max_connections, "Database pool created");

        let db = Self { pool };
        if config.run_migrations {
            db.migrate().await?;
        }
        Ok(db)
    }

    /// Open a migrated in-memory database
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the pool or the migrations fail.
    pub async fn in_memory() -> Result<Self, DatabaseError> {
        Self::connect(&DatabaseConfig::in_memory()).await
    }

    /// Get the underlying pool for raw queries
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply pending migrations
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Migration` if a migration fails.
    #[instrument(skip(self))]
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Close all connections in the pool
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("Database pool closed");
    }
}
