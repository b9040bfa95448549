//! Read-only gateway for caller-constructed SQL.
//!
//! The generic CRUD engine cannot express joins, aggregation, or computed
//! columns, so reporting queries go through [`AggregateGateway`] instead.
//! This is the one entry point that accepts free-form SQL text, and its
//! safety contract is deliberately narrower than the rest of the layer:
//! only the statement *kind* is checked (it must start with `SELECT` or
//! `WITH`), never its *content*. Identifiers embedded in the SQL are not
//! validated against the catalog — the caller is trusted to have built safe
//! SQL, and the only guarantee made here is that no mutation is possible
//! through this entry point.

use rusqlite::Connection;
use serde_json::Value;

use atelier_core::guard;

use crate::convert::{json_to_sql, rows_to_json};
use crate::error::{Result, StoreError};

/// Read-only query gateway over an injected connection.
pub struct AggregateGateway<'a> {
    conn: &'a Connection,
}

impl<'a> AggregateGateway<'a> {
    /// Creates a gateway over the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Executes a read-only statement with positionally bound parameters.
    ///
    /// Rows are returned verbatim, with column names exactly as the
    /// statement produced them.
    ///
    /// # Errors
    ///
    /// [`StoreError::MalformedRequest`] for an empty statement and
    /// [`atelier_core::GuardError::WriteNotPermitted`] for anything that is
    /// not a `SELECT`/`WITH` query.
    pub fn aggregate(&self, sql: &str, params: &[Value]) -> Result<Vec<Value>> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(StoreError::MalformedRequest("sql must not be empty".into()));
        }
        guard::assert_read_only(sql)?;

        let bound: Vec<_> = params.iter().map(json_to_sql).collect();
        rows_to_json(self.conn, sql, &bound)
    }
}
