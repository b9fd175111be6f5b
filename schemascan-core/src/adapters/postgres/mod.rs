//! PostgreSQL introspection adapter.
//!
//! Tables and columns come from `information_schema`; constraints and
//! indexes come from `pg_catalog`, which keeps multi-column keys in
//! declared order. Every pooled session is read-only and carries a
//! statement timeout.

mod connection;
mod schema_collection;
mod type_mapping;

use super::{ConnectionConfig, DatabaseAdapter, DatabaseType};
use crate::Result;
use crate::error::SchemaScanError;
use crate::models::DatabaseSchema;
use async_trait::async_trait;
use sqlx::PgPool;

pub use type_mapping::map_postgres_type;

/// Adapter over a lazily connecting PostgreSQL pool.
pub struct PostgresAdapter {
    /// Lazily connecting pool
    pub pool: PgPool,
    /// Settings parsed from the URL
    pub config: ConnectionConfig,
}

impl std::fmt::Debug for PostgresAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresAdapter")
            .field("endpoint", &self.config.endpoint())
            .field("open_connections", &self.pool.size())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DatabaseAdapter for PostgresAdapter {
    async fn test_connection(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| self.classify_connection_error(e))?;

        // A role without catalog access sees an empty information_schema
        let visible: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = 'information_schema'",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            SchemaScanError::insufficient_privileges(format!(
                "SELECT on information_schema ({})",
                e
            ))
        })?;
        if visible == 0 {
            return Err(SchemaScanError::insufficient_privileges(
                "SELECT on information_schema (no catalog tables visible)",
            ));
        }

        tracing::debug!("PostgreSQL catalog readable at {}", self.config.endpoint());
        Ok(())
    }

    async fn collect_schema(&self) -> Result<DatabaseSchema> {
        schema_collection::collect_schema(self).await
    }

    fn database_type(&self) -> DatabaseType {
        DatabaseType::PostgreSQL
    }

    fn connection_config(&self) -> ConnectionConfig {
        self.config.clone()
    }
}
