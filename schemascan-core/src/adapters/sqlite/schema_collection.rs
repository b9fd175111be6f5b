//! Translates SQLite catalog metadata into the schema model.
//!
//! Tables are listed from `sqlite_master`; each table is then described by
//! `PRAGMA table_info` (columns and primary key), `PRAGMA foreign_key_list`,
//! and `PRAGMA index_list` / `index_info`. Identifiers are embedded as
//! single-quoted literals with quotes doubled.

use super::SqliteAdapter;
use super::type_mapping::map_sqlite_type;
use crate::Result;
use crate::models::*;
use crate::validation::validate_schema;
use sqlx::Row;
use std::collections::BTreeMap;
use std::time::Instant;

/// Name of the index modelling an `INTEGER PRIMARY KEY` rowid alias.
const ROWID_INDEX: &str = "rowid";

/// Reads and validates the whole schema.
pub(crate) async fn collect_schema(adapter: &SqliteAdapter) -> Result<DatabaseSchema> {
    let started = Instant::now();
    let database = adapter.location.database_name();
    tracing::info!("Reading SQLite schema of '{}'", database);

    let tables = collect_tables(adapter).await.inspect_err(|e| {
        tracing::error!("SQLite table enumeration failed: {}", e);
    })?;

    let schema = DatabaseSchema::new(tables).with_name(database);
    validate_schema(&schema)?;

    tracing::info!(
        "Read {} tables and {} columns in {:.2}s",
        schema.tables.len(),
        schema.column_count(),
        started.elapsed().as_secs_f64()
    );
    Ok(schema)
}

/// User tables in name order, internal `sqlite_` tables excluded.
async fn collect_tables(adapter: &SqliteAdapter) -> Result<Vec<Table>> {
    const TABLES_QUERY: &str = "SELECT name, sql FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' \
         ORDER BY name";

    let table_rows = sqlx::query(TABLES_QUERY)
        .fetch_all(&adapter.pool)
        .await
        .map_err(|e| {
            crate::error::SchemaScanError::collection_failed("Failed to enumerate tables", e)
        })?;

    let mut tables = Vec::with_capacity(table_rows.len());

    for row in &table_rows {
        let table_name: String = row.try_get("name").map_err(|e| {
            crate::error::SchemaScanError::collection_failed("Failed to parse table name", e)
        })?;
        let sql: Option<String> = row.try_get("sql").unwrap_or_default();
        let without_rowid = sql.as_deref().is_some_and(is_without_rowid);

        let mut table = collect_table_columns(adapter, &table_name, without_rowid).await?;
        collect_table_foreign_keys(adapter, &mut table).await?;
        collect_table_indexes(adapter, &mut table).await?;

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

/// Returns true if the CREATE TABLE statement ends in `WITHOUT ROWID`.
fn is_without_rowid(create_sql: &str) -> bool {
    let normalized = create_sql
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();
    normalized
        .trim_end_matches(';')
        .trim_end()
        .ends_with("WITHOUT ROWID")
}

/// Collects columns and the primary key of a table.
async fn collect_table_columns(
    adapter: &SqliteAdapter,
    table_name: &str,
    without_rowid: bool,
) -> Result<Table> {
    let columns_query = format!("PRAGMA table_info('{}')", table_name.replace('\'', "''"));

    let column_rows = sqlx::query(&columns_query)
        .fetch_all(&adapter.pool)
        .await
        .map_err(|e| {
            crate::error::SchemaScanError::collection_failed(
                format!("Failed to collect columns for table '{}'", table_name),
                e,
            )
        })?;

    let mut table = Table::new(table_name);
    let mut pk_columns: Vec<(i64, String)> = Vec::new();
    let mut rowid_key: Option<String> = None;
    let pk_count = column_rows
        .iter()
        .filter(|row| row.try_get::<i64, _>("pk").unwrap_or(0) > 0)
        .count();

    for row in &column_rows {
        let name: String = row.try_get("name").unwrap_or_default();
        let declared_type: String = row.try_get("type").unwrap_or_default();
        let notnull: i64 = row.try_get("notnull").unwrap_or(0);
        let default_value: Option<String> = row.try_get("dflt_value").unwrap_or_default();
        let pk: i64 = row.try_get("pk").unwrap_or(0);

        // Only a lone INTEGER PRIMARY KEY (the rowid alias) or a WITHOUT ROWID
        // key column is enforced NOT NULL; other key columns accept NULL
        // unless declared otherwise.
        let rowid_alias = !without_rowid
            && pk > 0
            && pk_count == 1
            && declared_type.trim().eq_ignore_ascii_case("INTEGER");
        let enforced_not_null = notnull != 0 || rowid_alias || (pk > 0 && without_rowid);

        let mut column = Column::new(name.clone(), map_sqlite_type(&declared_type));
        if enforced_not_null {
            column = column.not_null();
        }
        if let Some(default_value) = default_value {
            column = column.with_default(default_value);
        }
        table = table.with_column(column);

        if rowid_alias {
            rowid_key = Some(name.clone());
        }
        if pk > 0 {
            pk_columns.push((pk, name));
        }
    }

    // The rowid alias is the table's own b-tree key, so index_list never
    // reports it even though lookups on it are indexed.
    if let Some(key) = rowid_key {
        table = table.with_index(Index::new(ROWID_INDEX, [key]).unique());
    }

    if !pk_columns.is_empty() {
        pk_columns.sort_by_key(|(position, _)| *position);
        table = table.with_constraint(Constraint::primary_key(
            pk_columns.into_iter().map(|(_, name)| name),
        ));
    }

    Ok(table)
}

/// Collects foreign keys for a table.
async fn collect_table_foreign_keys(adapter: &SqliteAdapter, table: &mut Table) -> Result<()> {
    let fk_query = format!(
        "PRAGMA foreign_key_list('{}')",
        table.name.replace('\'', "''")
    );

    let fk_rows = sqlx::query(&fk_query)
        .fetch_all(&adapter.pool)
        .await
        .map_err(|e| {
            crate::error::SchemaScanError::collection_failed(
                format!("Failed to collect foreign keys for table '{}'", table.name),
                e,
            )
        })?;

    // Composite foreign keys share an id; rows within an id are keyed by seq
    let mut fk_map: BTreeMap<i64, (String, BTreeMap<i64, (String, Option<String>)>)> =
        BTreeMap::new();

    for row in fk_rows {
        let id: i64 = row.try_get("id").unwrap_or(0);
        let seq: i64 = row.try_get("seq").unwrap_or(0);
        let ref_table: String = row.try_get("table").unwrap_or_default();
        let from_col: String = row.try_get("from").unwrap_or_default();
        // NULL when the key references the parent's primary key implicitly
        let to_col: Option<String> = row.try_get("to").unwrap_or_default();

        fk_map
            .entry(id)
            .or_insert_with(|| (ref_table, BTreeMap::new()))
            .1
            .insert(seq, (from_col, to_col));
    }

    for (ref_table, pairs) in fk_map.into_values() {
        let columns: Vec<String> = pairs.values().map(|(from, _)| from.clone()).collect();
        let referenced: Vec<String> = pairs.into_values().filter_map(|(_, to)| to).collect();
        table
            .constraints
            .push(Constraint::foreign_key(columns, ref_table, referenced));
    }

    Ok(())
}

/// Collects indexes for a table.
///
/// Indexes backing a UNIQUE constraint (origin `u`) also yield a UNIQUE
/// constraint, since SQLite exposes those constraints only through their
/// automatic index.
async fn collect_table_indexes(adapter: &SqliteAdapter, table: &mut Table) -> Result<()> {
    let index_list_query = format!("PRAGMA index_list('{}')", table.name.replace('\'', "''"));

    let index_rows = sqlx::query(&index_list_query)
        .fetch_all(&adapter.pool)
        .await
        .map_err(|e| {
            crate::error::SchemaScanError::collection_failed(
                format!("Failed to collect indexes for table '{}'", table.name),
                e,
            )
        })?;

    // index_list returns the newest index first
    for row in index_rows.iter().rev() {
        let index_name: String = row.try_get("name").unwrap_or_default();
        let is_unique: i64 = row.try_get("unique").unwrap_or(0);
        let origin: String = row.try_get("origin").unwrap_or_default();

        let columns = collect_index_columns(adapter, &index_name).await?;
        if columns.is_empty() {
            tracing::debug!(
                "Skipping expression index '{}' on table '{}'",
                index_name,
                table.name
            );
            continue;
        }

        if origin == "u" {
            table.constraints.push(
                Constraint::unique(columns.iter().cloned()).with_name(index_name.clone()),
            );
        }

        let mut index = Index::new(index_name, columns);
        if is_unique != 0 {
            index = index.unique();
        }
        table.indexes.push(index);
    }

    Ok(())
}

/// Collects the key columns of an index, in key order.
///
/// Returns an empty list for indexes with expression keys.
async fn collect_index_columns(adapter: &SqliteAdapter, index_name: &str) -> Result<Vec<String>> {
    let index_info_query = format!("PRAGMA index_info('{}')", index_name.replace('\'', "''"));

    let column_rows = sqlx::query(&index_info_query)
        .fetch_all(&adapter.pool)
        .await
        .map_err(|e| {
            crate::error::SchemaScanError::collection_failed(
                format!("Failed to collect index columns for '{}'", index_name),
                e,
            )
        })?;

    let mut keyed: Vec<(i64, String)> = Vec::with_capacity(column_rows.len());
    for row in column_rows {
        let seqno: i64 = row.try_get("seqno").unwrap_or(0);
        // Expression keys have no column name; such indexes are skipped
        let name: Option<String> = row.try_get("name").unwrap_or_default();
        match name {
            Some(name) => keyed.push((seqno, name)),
            None => return Ok(Vec::new()),
        }
    }
    keyed.sort_by_key(|(seqno, _)| *seqno);

    Ok(keyed.into_iter().map(|(_, name)| name).collect())
}
