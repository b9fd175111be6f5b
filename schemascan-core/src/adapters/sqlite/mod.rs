//! SQLite introspection adapter.
//!
//! Schema metadata comes from `sqlite_master` and the table PRAGMAs. SQLite
//! has no separate UNIQUE constraint catalog, so UNIQUE constraints are
//! recovered from the indexes that back them.

pub mod connection;
pub mod schema_collection;
pub mod type_mapping;

use super::{ConnectionConfig, DatabaseAdapter, DatabaseType};
use crate::Result;
use crate::error::SchemaScanError;
use crate::models::DatabaseSchema;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub use connection::SqliteLocation;
pub use type_mapping::map_sqlite_type;

/// Adapter over a single-connection SQLite pool.
pub struct SqliteAdapter {
    /// Pool with a single read-only connection
    pub pool: SqlitePool,
    /// Non-secret settings in effect
    pub config: ConnectionConfig,
    /// Database file or in-memory marker
    pub location: SqliteLocation,
}

impl std::fmt::Debug for SqliteAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteAdapter")
            .field("database", &self.location.database_name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DatabaseAdapter for SqliteAdapter {
    async fn test_connection(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(SchemaScanError::connection_failed)?;

        // Collection reads sqlite_master; fail early if that is not possible
        let tables: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    SchemaScanError::insufficient_privileges(format!(
                        "read access to sqlite_master ({})",
                        e
                    ))
                })?;

        tracing::debug!(
            "SQLite database '{}' is readable ({} tables)",
            self.location.database_name(),
            tables
        );
        Ok(())
    }

    async fn collect_schema(&self) -> Result<DatabaseSchema> {
        schema_collection::collect_schema(self).await
    }

    fn database_type(&self) -> DatabaseType {
        DatabaseType::SQLite
    }

    fn connection_config(&self) -> ConnectionConfig {
        self.config.clone()
    }
}
