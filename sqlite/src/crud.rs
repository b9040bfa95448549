//! Generic CRUD over entity tables.
//!
//! Provides [`EntityStore`] for filtered queries and create/read/update/
//! delete on any catalog table, with no per-table code. Every identifier
//! (table names, payload keys, filter and sort columns) is validated by the
//! safety guard before it reaches SQL text; every value is bound as a
//! parameter.
//!
//! # Example
//!
//! ```no_run
//! use atelier_sqlite::EntityStore;
//! use rusqlite::Connection;
//! use serde_json::json;
//!
//! let conn = Connection::open("data.db").unwrap();
//! let store = EntityStore::new(&conn).unwrap();
//!
//! let id = store.insert("clients", &json!({"name": "Acme"})).unwrap();
//! let row = store.get_by_id("clients", &id).unwrap();
//! assert!(row.is_some());
//! ```

use rusqlite::Connection;
use rusqlite::types::Value as SqlValue;
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use atelier_core::{Filter, Sort, guard};

use crate::convert::{json_to_sql, rows_to_json};
use crate::error::{Result, StoreError};

/// Returns the trimmed id, rejecting empty ids before any SQL is built.
pub(crate) fn require_id(id: &str) -> Result<&str> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(StoreError::MalformedRequest("id must not be empty".into()));
    }
    Ok(trimmed)
}

/// Returns the object form of a row payload.
fn require_object<'a>(data: &'a Value, field: &str) -> Result<&'a Map<String, Value>> {
    data.as_object()
        .ok_or_else(|| StoreError::MalformedRequest(format!("{field} must be a JSON object")))
}

/// Generic entity-table engine over an injected connection.
///
/// Row ids are engine-generated UUIDs; callers address rows only through
/// them. Updates refresh the row's `updated_at` timestamp; updates and
/// deletes on a missing id succeed silently with zero rows affected.
pub struct EntityStore<'a> {
    conn: &'a Connection,
}

impl<'a> EntityStore<'a> {
    /// Creates an engine over the given connection and enables foreign-key
    /// enforcement.
    pub fn new(conn: &'a Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Runs `SELECT * FROM table` with an optional filter and sort.
    ///
    /// Filter clauses are ANDed. The `IN` operator expands to one
    /// placeholder per element and fails with
    /// [`StoreError::InvalidFilter`] for an empty or non-array value; every
    /// other operator binds a single placeholder. An offset without a limit
    /// is honored via SQLite's `LIMIT -1` sentinel. An empty result set is
    /// valid, not an error.
    pub fn query(
        &self,
        table: &str,
        filter: Option<&Filter>,
        sort: Option<&Sort>,
    ) -> Result<Vec<Value>> {
        guard::assert_table(table)?;

        let mut sql = format!("SELECT * FROM {table}");
        let mut params: Vec<SqlValue> = Vec::new();

        if let Some(filter) = filter {
            if !filter.where_clauses.is_empty() {
                let mut conditions = Vec::with_capacity(filter.where_clauses.len());
                for clause in &filter.where_clauses {
                    guard::assert_column(&clause.column)?;
                    guard::assert_operator(&clause.op)?;

                    if clause.op == "IN" {
                        let items = clause.value.as_array().ok_or_else(|| {
                            StoreError::InvalidFilter(
                                "IN operator requires an array value".into(),
                            )
                        })?;
                        if items.is_empty() {
                            return Err(StoreError::InvalidFilter(
                                "IN operator requires a non-empty array".into(),
                            ));
                        }
                        let placeholders = vec!["?"; items.len()].join(", ");
                        conditions.push(format!("{} IN ({placeholders})", clause.column));
                        params.extend(items.iter().map(json_to_sql));
                    } else {
                        conditions.push(format!("{} {} ?", clause.column, clause.op));
                        params.push(json_to_sql(&clause.value));
                    }
                }
                sql.push_str(" WHERE ");
                sql.push_str(&conditions.join(" AND "));
            }
        }

        if let Some(sort) = sort {
            guard::assert_column(&sort.column)?;
            sql.push_str(&format!(" ORDER BY {} {}", sort.column, sort.direction.as_sql()));
        }

        if let Some(filter) = filter {
            let limit = validate_page_bound(filter.limit, "limit")?;
            let offset = validate_page_bound(filter.offset, "offset")?;

            if let Some(limit) = limit {
                sql.push_str(&format!(" LIMIT {limit}"));
            }
            if let Some(offset) = offset {
                if limit.is_none() {
                    // SQLite requires a LIMIT clause before OFFSET.
                    sql.push_str(" LIMIT -1");
                }
                sql.push_str(&format!(" OFFSET {offset}"));
            }
        }

        debug!(table, sql = %sql, "query");
        rows_to_json(self.conn, &sql, &params)
    }

    /// Loads a single row by id.
    ///
    /// Entity tables only. Returns `None` when no row matches; absence is
    /// never an error.
    pub fn get_by_id(&self, table: &str, id: &str) -> Result<Option<Value>> {
        guard::assert_entity_table(table, "get_by_id")?;
        let id = require_id(id)?;

        let sql = format!("SELECT * FROM {table} WHERE id = ?");
        let mut rows = rows_to_json(self.conn, &sql, &[SqlValue::Text(id.to_string())])?;
        Ok(rows.pop())
    }

    /// Inserts a row and returns its generated id.
    ///
    /// Entity tables only. A caller-supplied `id` field is silently
    /// discarded; the engine always generates a fresh UUID. Every remaining
    /// payload key is validated as a column name.
    pub fn insert(&self, table: &str, data: &Value) -> Result<String> {
        guard::assert_entity_table(table, "insert")?;
        let data = require_object(data, "data")?;

        let id = Uuid::new_v4().to_string();

        let mut columns = vec!["id".to_string()];
        let mut values: Vec<SqlValue> = vec![SqlValue::Text(id.clone())];
        for (key, value) in data.iter().filter(|(key, _)| key.as_str() != "id") {
            guard::assert_column(key)?;
            columns.push(key.clone());
            values.push(json_to_sql(value));
        }

        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {table} ({}) VALUES ({placeholders})",
            columns.join(", ")
        );

        debug!(table, id = %id, "insert");
        self.conn
            .execute(&sql, rusqlite::params_from_iter(values.iter()))?;
        Ok(id)
    }

    /// Updates the supplied columns of one row and refreshes `updated_at`.
    ///
    /// Entity tables only. The payload must contain at least one non-`id`
    /// field. A non-matching id succeeds with zero rows affected and does
    /// not create a row.
    pub fn update(&self, table: &str, id: &str, data: &Value) -> Result<()> {
        guard::assert_entity_table(table, "update")?;
        let id = require_id(id)?;
        let data = require_object(data, "data")?;

        let entries: Vec<(&String, &Value)> =
            data.iter().filter(|(key, _)| key.as_str() != "id").collect();
        if entries.is_empty() {
            return Err(StoreError::EmptyUpdate(table.to_string()));
        }

        let mut sets = Vec::with_capacity(entries.len() + 1);
        let mut values: Vec<SqlValue> = Vec::with_capacity(entries.len() + 1);
        for (key, value) in entries {
            guard::assert_column(key)?;
            sets.push(format!("{key} = ?"));
            values.push(json_to_sql(value));
        }
        sets.push("updated_at = datetime('now')".to_string());
        values.push(SqlValue::Text(id.to_string()));

        let sql = format!("UPDATE {table} SET {} WHERE id = ?", sets.join(", "));

        debug!(table, id, "update");
        self.conn
            .execute(&sql, rusqlite::params_from_iter(values.iter()))?;
        Ok(())
    }

    /// Deletes one row by id.
    ///
    /// Entity tables only. A non-matching id succeeds silently.
    pub fn delete(&self, table: &str, id: &str) -> Result<()> {
        guard::assert_entity_table(table, "delete")?;
        let id = require_id(id)?;

        debug!(table, id, "delete");
        self.conn
            .execute(&format!("DELETE FROM {table} WHERE id = ?"), [id])?;
        Ok(())
    }
}

/// Validates an optional limit/offset as a non-negative integer.
fn validate_page_bound(value: Option<i64>, field: &str) -> Result<Option<i64>> {
    match value {
        Some(n) if n < 0 => Err(StoreError::InvalidFilter(format!(
            "{field} must be a non-negative integer"
        ))),
        other => Ok(other),
    }
}
