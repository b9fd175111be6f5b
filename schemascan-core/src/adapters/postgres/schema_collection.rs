//! PostgreSQL schema collection implementation.
//!
//! Reads tables and columns from `information_schema` and constraints and
//! indexes from `pg_catalog`, then builds the schema model. Tables outside
//! the `public` schema are named `schema.table`.

use super::PostgresAdapter;
use super::type_mapping::map_postgres_type;
use crate::Result;
use crate::models::*;
use crate::validation::validate_schema;
use sqlx::Row;
use sqlx::postgres::PgRow;

/// Main entry point for schema collection.
pub(crate) async fn collect_schema(adapter: &PostgresAdapter) -> Result<DatabaseSchema> {
    let start_time = std::time::Instant::now();

    tracing::info!(
        "Starting PostgreSQL schema collection for database: {}:{}",
        adapter.config.host,
        adapter.config.port.unwrap_or(5432)
    );

    let database_name: String = sqlx::query_scalar("SELECT current_database()::text")
        .fetch_one(&adapter.pool)
        .await
        .map_err(|e| adapter.classify_connection_error(e))?;

    let tables = match adapter.collect_tables().await {
        Ok(tables) => tables,
        Err(e) => {
            tracing::error!("Failed to collect tables: {}", e);
            return Err(e);
        }
    };

    let schema = DatabaseSchema::new(tables).with_name(database_name);
    validate_schema(&schema)?;

    tracing::info!(
        "PostgreSQL schema collection completed in {:.2}s - found {} tables, {} columns",
        start_time.elapsed().as_secs_f64(),
        schema.tables.len(),
        schema.column_count()
    );

    Ok(schema)
}

/// Maps a catalog query failure, reporting permission denials separately.
fn catalog_error(error: sqlx::Error, resource: &str) -> crate::SchemaScanError {
    match &error {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("42501") => {
            crate::error::SchemaScanError::insufficient_privileges(format!(
                "Cannot access {} - insufficient privileges",
                resource
            ))
        }
        _ => crate::error::SchemaScanError::collection_failed(
            format!("Failed to query {}", resource),
            error,
        ),
    }
}

/// Extracts a typed field with table context in the error.
fn get_field<'r, T>(row: &'r PgRow, field_name: &str, table: &str) -> Result<T>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(field_name).map_err(|e| {
        crate::error::SchemaScanError::collection_failed(
            format!("Failed to read field '{}' for table '{}'", field_name, table),
            e,
        )
    })
}

/// Display name of a table: bare in `public`, schema-qualified elsewhere.
fn qualified_name(schema: &str, table: &str) -> String {
    if schema == "public" {
        table.to_string()
    } else {
        format!("{}.{}", schema, table)
    }
}

impl PostgresAdapter {
    /// Collects all base tables visible to the session.
    pub(crate) async fn collect_tables(&self) -> Result<Vec<Table>> {
        let tables_query = r#"
            SELECT
                t.table_schema::text AS table_schema,
                t.table_name::text AS table_name
            FROM information_schema.tables t
            WHERE t.table_type = 'BASE TABLE'
            AND t.table_schema NOT IN ('information_schema', 'pg_catalog')
            AND t.table_schema NOT LIKE 'pg_toast%'
            AND t.table_schema NOT LIKE 'pg_temp%'
            ORDER BY t.table_schema, t.table_name
        "#;

        let table_rows = sqlx::query(tables_query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| catalog_error(e, "information_schema.tables"))?;

        let mut tables = Vec::with_capacity(table_rows.len());

        for row in &table_rows {
            let schema_name: String = get_field(row, "table_schema", "information_schema")?;
            let table_name: String = get_field(row, "table_name", "information_schema")?;

            let mut table = self.collect_table_columns(&schema_name, &table_name).await?;
            table.constraints = self
                .collect_table_constraints(&schema_name, &table_name)
                .await?;
            table.indexes = self.collect_table_indexes(&schema_name, &table_name).await?;

            tracing::debug!(
                "Collected table '{}' with {} columns, {} constraints, {} indexes",
                table.name,
                table.columns.len(),
                table.constraints.len(),
                table.indexes.len()
            );

            tables.push(table);
        }

        Ok(tables)
    }

    /// Collects column metadata for a table, in ordinal order.
    async fn collect_table_columns(&self, schema_name: &str, table_name: &str) -> Result<Table> {
        let columns_query = r#"
            SELECT
                c.column_name::text AS column_name,
                c.data_type::text AS data_type,
                c.udt_name::text AS udt_name,
                c.character_maximum_length::integer AS character_maximum_length,
                c.numeric_precision::integer AS numeric_precision,
                c.numeric_scale::integer AS numeric_scale,
                c.is_nullable::text AS is_nullable,
                c.column_default::text AS column_default
            FROM information_schema.columns c
            WHERE c.table_schema = $1
            AND c.table_name = $2
            ORDER BY c.ordinal_position
        "#;

        let column_rows = sqlx::query(columns_query)
            .bind(schema_name)
            .bind(table_name)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                crate::error::SchemaScanError::collection_failed(
                    format!(
                        "Failed to collect columns for table '{}.{}'",
                        schema_name, table_name
                    ),
                    e,
                )
            })?;

        let mut table = Table::new(qualified_name(schema_name, table_name));

        for row in &column_rows {
            let column_name: String = get_field(row, "column_name", table_name)?;
            let data_type: String = get_field(row, "data_type", table_name)?;
            let udt_name: String = get_field(row, "udt_name", table_name)?;
            let character_maximum_length: Option<i32> =
                get_field(row, "character_maximum_length", table_name)?;
            let numeric_precision: Option<i32> = get_field(row, "numeric_precision", table_name)?;
            let numeric_scale: Option<i32> = get_field(row, "numeric_scale", table_name)?;
            let is_nullable: String = get_field(row, "is_nullable", table_name)?;
            let column_default: Option<String> = get_field(row, "column_default", table_name)?;

            let mut column = Column::new(
                column_name,
                map_postgres_type(
                    &data_type,
                    &udt_name,
                    character_maximum_length,
                    numeric_precision,
                    numeric_scale,
                ),
            );
            if is_nullable != "YES" {
                column = column.not_null();
            }
            if let Some(default_value) = column_default {
                column = column.with_default(default_value);
            }
            table = table.with_column(column);
        }

        Ok(table)
    }

    /// Collects PRIMARY KEY, UNIQUE, FOREIGN KEY, and CHECK constraints.
    async fn collect_table_constraints(
        &self,
        schema_name: &str,
        table_name: &str,
    ) -> Result<Vec<Constraint>> {
        let constraints_query = r#"
            SELECT
                con.conname::text AS constraint_name,
                con.contype::text AS constraint_type,
                ARRAY(
                    SELECT a.attname::text
                    FROM unnest(con.conkey) WITH ORDINALITY AS k(attnum, ord)
                    JOIN pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = k.attnum
                    ORDER BY k.ord
                ) AS columns,
                fns.nspname::text AS referenced_schema,
                fcl.relname::text AS referenced_table,
                ARRAY(
                    SELECT a.attname::text
                    FROM unnest(con.confkey) WITH ORDINALITY AS k(attnum, ord)
                    JOIN pg_attribute a ON a.attrelid = con.confrelid AND a.attnum = k.attnum
                    ORDER BY k.ord
                ) AS referenced_columns,
                CASE WHEN con.contype = 'c' THEN pg_get_constraintdef(con.oid) END AS check_clause
            FROM pg_constraint con
            JOIN pg_class cl ON con.conrelid = cl.oid
            JOIN pg_namespace ns ON cl.relnamespace = ns.oid
            LEFT JOIN pg_class fcl ON con.confrelid = fcl.oid
            LEFT JOIN pg_namespace fns ON fcl.relnamespace = fns.oid
            WHERE ns.nspname = $1
            AND cl.relname = $2
            AND con.contype IN ('p', 'u', 'f', 'c')
            ORDER BY
                CASE con.contype WHEN 'p' THEN 0 WHEN 'u' THEN 1 WHEN 'f' THEN 2 ELSE 3 END,
                con.conname
        "#;

        let constraint_rows = sqlx::query(constraints_query)
            .bind(schema_name)
            .bind(table_name)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| catalog_error(e, "pg_constraint"))?;

        let mut constraints = Vec::with_capacity(constraint_rows.len());

        for row in &constraint_rows {
            let name: String = get_field(row, "constraint_name", table_name)?;
            let constraint_type: String = get_field(row, "constraint_type", table_name)?;
            let columns: Vec<String> = get_field(row, "columns", table_name)?;

            let constraint = match constraint_type.as_str() {
                "p" => Constraint::primary_key(columns),
                "u" => Constraint::unique(columns),
                "f" => {
                    let referenced_schema: Option<String> =
                        get_field(row, "referenced_schema", table_name)?;
                    let referenced_table: Option<String> =
                        get_field(row, "referenced_table", table_name)?;
                    let referenced_columns: Vec<String> =
                        get_field(row, "referenced_columns", table_name)?;
                    let referenced = qualified_name(
                        referenced_schema.as_deref().unwrap_or("public"),
                        referenced_table.as_deref().unwrap_or_default(),
                    );
                    Constraint::foreign_key(columns, referenced, referenced_columns)
                }
                "c" => {
                    let check_clause: Option<String> = get_field(row, "check_clause", table_name)?;
                    Constraint::check(columns, check_clause)
                }
                other => {
                    tracing::debug!(
                        "Skipping constraint '{}' of type '{}' on '{}'",
                        name,
                        other,
                        table_name
                    );
                    continue;
                }
            };

            constraints.push(constraint.with_name(name));
        }

        Ok(constraints)
    }

    /// Collects indexes with their key columns in key order.
    ///
    /// Expression indexes are skipped since their keys are not columns.
    async fn collect_table_indexes(&self, schema_name: &str, table_name: &str) -> Result<Vec<Index>> {
        let indexes_query = r#"
            SELECT
                ic.relname::text AS index_name,
                ix.indisunique AS is_unique,
                (0 = ANY(ix.indkey::int2[])) AS has_expression,
                ARRAY(
                    SELECT a.attname::text
                    FROM unnest(ix.indkey::int2[]) WITH ORDINALITY AS k(attnum, ord)
                    JOIN pg_attribute a ON a.attrelid = ix.indrelid AND a.attnum = k.attnum
                    WHERE k.ord <= ix.indnkeyatts
                    ORDER BY k.ord
                ) AS columns
            FROM pg_index ix
            JOIN pg_class ic ON ic.oid = ix.indexrelid
            JOIN pg_class tc ON tc.oid = ix.indrelid
            JOIN pg_namespace ns ON ns.oid = tc.relnamespace
            WHERE ns.nspname = $1
            AND tc.relname = $2
            ORDER BY ic.relname
        "#;

        let index_rows = sqlx::query(indexes_query)
            .bind(schema_name)
            .bind(table_name)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| catalog_error(e, "pg_index"))?;

        let mut indexes = Vec::with_capacity(index_rows.len());

        for row in &index_rows {
            let index_name: String = get_field(row, "index_name", table_name)?;
            let is_unique: bool = get_field(row, "is_unique", table_name)?;
            let has_expression: bool = get_field(row, "has_expression", table_name)?;
            let columns: Vec<String> = get_field(row, "columns", table_name)?;

            if has_expression || columns.is_empty() {
                tracing::debug!(
                    "Skipping expression index '{}' on table '{}'",
                    index_name,
                    table_name
                );
                continue;
            }

            let mut index = Index::new(index_name, columns);
            if is_unique {
                index = index.unique();
            }
            indexes.push(index);
        }

        Ok(indexes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name() {
        assert_eq!(qualified_name("public", "orders"), "orders");
        assert_eq!(qualified_name("sales", "orders"), "sales.orders");
    }
}
