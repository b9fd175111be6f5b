//! SQLite connection strings and pool setup.
//!
//! Accepted forms:
//! - `sqlite:///abs/path.db`, `sqlite://./rel.db`, `sqlite:rel.db`
//! - a bare path ending in `.db`, `.sqlite` or `.sqlite3`
//! - `:memory:`, `sqlite::memory:`, or any URL with `mode=memory`
//!
//! File databases are opened read-only and must already exist.

use super::{ConnectionConfig, SqliteAdapter};
use crate::Result;
use crate::error::SchemaScanError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

const FILE_EXTENSIONS: [&str; 3] = [".db", ".sqlite", ".sqlite3"];

/// Where a SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqliteLocation {
    /// `:memory:` database
    Memory,
    /// Path as written, without scheme or query
    File { path: String, query: Option<String> },
}

impl SqliteLocation {
    /// Parses a SQLite connection string.
    ///
    /// # Errors
    /// Returns a configuration error for anything that is not a SQLite
    /// URL, a database file path, or an in-memory marker
    pub fn parse(connection_string: &str) -> Result<Self> {
        let trimmed = connection_string.trim();
        if trimmed == ":memory:"
            || trimmed.contains("sqlite::memory:")
            || trimmed.contains("sqlite://:memory:")
            || trimmed.contains("mode=memory")
        {
            return Ok(Self::Memory);
        }

        let rest = match trimmed.strip_prefix("sqlite://") {
            Some(rest) => rest,
            None => match trimmed.strip_prefix("sqlite:") {
                Some(rest) => rest,
                None if FILE_EXTENSIONS.iter().any(|ext| trimmed.ends_with(ext)) => trimmed,
                None => {
                    return Err(SchemaScanError::configuration(
                        "Invalid SQLite connection string format: expected sqlite:// URL, file path, or :memory:",
                    ));
                }
            },
        };

        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (rest, None),
        };
        if path.is_empty() {
            return Err(SchemaScanError::configuration(
                "SQLite connection string does not name a database file",
            ));
        }

        Ok(Self::File {
            path: path.to_string(),
            query,
        })
    }

    /// File name of the database, or `:memory:`.
    pub fn database_name(&self) -> String {
        match self {
            Self::Memory => ":memory:".to_string(),
            Self::File { path, .. } => path
                .rsplit(['/', '\\'])
                .find(|segment| !segment.is_empty())
                .unwrap_or("main")
                .to_string(),
        }
    }

    /// URL form understood by sqlx.
    pub fn to_url(&self) -> String {
        match self {
            Self::Memory => "sqlite::memory:".to_string(),
            Self::File { path, query: None } => format!("sqlite://{}", path),
            Self::File {
                path,
                query: Some(query),
            } => format!("sqlite://{}?{}", path, query),
        }
    }

    /// Returns true for an in-memory database.
    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl SqliteAdapter {
    /// Opens a SQLite database read-only.
    ///
    /// # Errors
    /// Returns error if the connection string is not a SQLite location or
    /// the database file cannot be opened
    pub async fn new(connection_string: &str) -> Result<Self> {
        let location = SqliteLocation::parse(connection_string)?;
        let config = config_for(&location);
        let pool = open_pool(&location, &config).await?;

        tracing::debug!("Opened SQLite database '{}'", location.database_name());
        Ok(Self {
            pool,
            config,
            location,
        })
    }

    /// Wraps a pool the caller already holds, e.g. an in-memory database
    /// the caller populated.
    ///
    /// # Errors
    /// Returns error if `connection_string` is not a SQLite location
    pub fn from_pool(pool: SqlitePool, connection_string: &str) -> Result<Self> {
        let location = SqliteLocation::parse(connection_string)?;
        Ok(Self {
            pool,
            config: config_for(&location),
            location,
        })
    }

    /// Returns true if the adapter reads an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.location.is_memory()
    }

    /// Closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Builds the connection settings for a SQLite location.
///
/// # Errors
/// Returns error if the connection string is not a SQLite location
pub fn parse_sqlite_connection_config(connection_string: &str) -> Result<ConnectionConfig> {
    SqliteLocation::parse(connection_string).map(|location| config_for(&location))
}

fn config_for(location: &SqliteLocation) -> ConnectionConfig {
    // One connection is enough for PRAGMA reads; there is no host or port
    ConnectionConfig::new("localhost")
        .with_database(location.database_name())
        .with_max_connections(1)
}

async fn open_pool(location: &SqliteLocation, config: &ConnectionConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&location.to_url())
        .map_err(|e| {
            SchemaScanError::configuration(format!("Invalid SQLite connection string: {}", e))
        })?
        .read_only(config.read_only && !location.is_memory());

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
        .connect_with(options)
        .await
        .map_err(|e| {
            SchemaScanError::collection_failed(
                format!(
                    "Failed to open SQLite database '{}'",
                    location.database_name()
                ),
                e,
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> SqliteLocation {
        SqliteLocation::File {
            path: path.to_string(),
            query: None,
        }
    }

    #[test]
    fn test_parse_memory_forms() {
        for input in [":memory:", "sqlite::memory:", "sqlite://:memory:", "sqlite:shop?mode=memory"] {
            assert_eq!(SqliteLocation::parse(input).unwrap(), SqliteLocation::Memory, "{}", input);
        }
    }

    #[test]
    fn test_parse_file_forms() {
        assert_eq!(SqliteLocation::parse("sqlite:///var/data/shop.db").unwrap(), file("/var/data/shop.db"));
        assert_eq!(SqliteLocation::parse("sqlite://./shop.db").unwrap(), file("./shop.db"));
        assert_eq!(SqliteLocation::parse("sqlite:shop.sqlite3").unwrap(), file("shop.sqlite3"));
        assert_eq!(SqliteLocation::parse("inventory.sqlite").unwrap(), file("inventory.sqlite"));
        assert_eq!(
            SqliteLocation::parse("sqlite:shop.db?mode=ro").unwrap(),
            SqliteLocation::File {
                path: "shop.db".to_string(),
                query: Some("mode=ro".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_rejects_other_inputs() {
        assert!(SqliteLocation::parse("postgres://localhost/db").is_err());
        assert!(SqliteLocation::parse("shop").is_err());
        assert!(SqliteLocation::parse("sqlite://").is_err());
    }

    #[test]
    fn test_database_name_and_url() {
        let location = SqliteLocation::parse("sqlite:///var/data/shop.db").unwrap();
        assert_eq!(location.database_name(), "shop.db");
        assert_eq!(location.to_url(), "sqlite:///var/data/shop.db");

        let location = SqliteLocation::parse("data/app.db").unwrap();
        assert_eq!(location.to_url(), "sqlite://data/app.db");

        assert_eq!(SqliteLocation::Memory.database_name(), ":memory:");
        assert_eq!(SqliteLocation::Memory.to_url(), "sqlite::memory:");
    }

    #[test]
    fn test_connection_config_is_single_read_only_connection() {
        let config = parse_sqlite_connection_config("sqlite:///srv/test.db").unwrap();
        assert_eq!(config.database.as_deref(), Some("test.db"));
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.port, None);
        assert!(config.read_only);
    }

    #[tokio::test]
    async fn test_sqlite_missing_file_fails() {
        let result = SqliteAdapter::new("sqlite:///nonexistent/dir/missing.db").await;
        assert!(matches!(result, Err(SchemaScanError::Collection { .. })));
    }
}
