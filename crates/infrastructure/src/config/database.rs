//! Database (SQLite) configuration.

use serde::{Deserialize, Serialize};

use super::default_true;

/// SQLite database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, a `sqlite:` URL, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Maximum number of concurrent database connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Whether to run pending migrations when the pool is opened (default: true)
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

fn default_db_path() -> String {
    "scriptcast.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
            run_migrations: true,
        }
    }
}

impl DatabaseConfig {
    /// In-memory database, used by tests
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: ":memory:".to_string(),
            max_connections: 1,
            run_migrations: true,
        }
    }

    /// File-backed database at `path`
    #[must_use]
    pub fn file(path: impl AsRef<std::path::Path>) -> Self {
        Self {
            path: path.as_ref().display().to_string(),
            ..Self::default()
        }
    }

    /// Whether this configuration points at an in-memory database
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path.contains(":memory:")
    }

    /// sqlx connection URL for the configured path
    #[must_use]
    pub fn url(&self) -> String {
        if self.path.starts_with("sqlite:") {
            self.path.clone()
        } else {
            format!("sqlite:{}", self.path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_from_plain_path() {
        let config = DatabaseConfig::file("/var/lib/scriptcast/content.db");
        assert_eq!(config.url(), "sqlite:/var/lib/scriptcast/content.db");
        assert!(!config.is_in_memory());
    }

    #[test]
    fn url_is_kept_when_already_prefixed() {
        let config = DatabaseConfig {
            path: "sqlite://data.db?mode=rwc".to_string(),
            ..Default::default()
        };
        assert_eq!(config.url(), "sqlite://data.db?mode=rwc");
    }

    #[test]
    fn in_memory_uses_single_connection() {
        let config = DatabaseConfig::in_memory();
        assert_eq!(config.url(), "sqlite::memory:");
        assert_eq!(config.max_connections, 1);
        assert!(config.is_in_memory());
    }
}
