//! Bulk export and full-replace import.
//!
//! [`Transfer::export`] serializes every catalog table to a single portable
//! document; [`Transfer::import`] restores one atomically. Import is
//! full-replace, not merge: existing rows are deleted in reverse
//! foreign-key dependency order, then the document's rows are inserted in
//! forward order, all inside one transaction. A table missing from the
//! document is replaced with zero rows.

use std::collections::BTreeMap;

use rusqlite::Connection;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use atelier_core::{DELETE_ORDER, INSERT_ORDER, guard};

use crate::convert::{json_to_sql, rows_to_json};
use crate::error::{Result, StoreError};

/// Per-table inserted-row counts, returned by [`Transfer::import`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    /// Rows inserted per table, covering every catalog table.
    pub counts: BTreeMap<String, usize>,
}

impl ImportReport {
    /// Total rows inserted across all tables.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Bulk export/import engine over an injected connection.
pub struct Transfer<'a> {
    conn: &'a Connection,
}

impl<'a> Transfer<'a> {
    /// Creates an engine over the given connection and enables foreign-key
    /// enforcement.
    pub fn new(conn: &'a Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Reads every catalog table in dependency order into a document
    /// mapping table name to its row array.
    ///
    /// Read-only; cross-table snapshot consistency is best-effort, no
    /// transaction is taken.
    pub fn export(&self) -> Result<Map<String, Value>> {
        let mut document = Map::new();
        for table in INSERT_ORDER {
            let rows = rows_to_json(self.conn, &format!("SELECT * FROM {table}"), &[])?;
            document.insert(table.to_string(), Value::Array(rows));
        }
        Ok(document)
    }

    /// Replaces the full database contents with the document's rows.
    ///
    /// Accepts the document directly or wrapped under a `data` key. Deletes
    /// all rows in reverse dependency order, then inserts the document's
    /// rows in forward order, validating every column key of every row.
    /// The whole sequence is one transaction: any failure (non-object
    /// document or row, non-array table payload, invalid column) rolls
    /// everything back and leaves the prior data untouched.
    pub fn import(&self, document: &Value) -> Result<ImportReport> {
        let payload = unwrap_document(document)?;

        // Reject malformed table payloads before touching any rows.
        for table in INSERT_ORDER {
            if let Some(rows) = payload.get(*table) {
                if !rows.is_array() {
                    return Err(StoreError::MalformedRequest(format!(
                        "{table} must be an array of rows"
                    )));
                }
            }
        }

        let tx = self.conn.unchecked_transaction()?;
        let mut report = ImportReport::default();

        for table in DELETE_ORDER {
            tx.execute(&format!("DELETE FROM {table}"), [])?;
        }

        for table in INSERT_ORDER {
            let rows = match payload.get(*table) {
                Some(Value::Array(rows)) => rows.as_slice(),
                _ => &[],
            };
            report.counts.insert(table.to_string(), rows.len());

            for row in rows {
                let record = row.as_object().ok_or_else(|| {
                    StoreError::MalformedRequest(format!("{table} rows must be JSON objects"))
                })?;
                if record.is_empty() {
                    continue;
                }

                let mut columns = Vec::with_capacity(record.len());
                let mut values = Vec::with_capacity(record.len());
                for (key, value) in record {
                    guard::assert_column(key)?;
                    columns.push(key.as_str());
                    values.push(json_to_sql(value));
                }

                let placeholders = vec!["?"; columns.len()].join(", ");
                tx.execute(
                    &format!(
                        "INSERT INTO {table} ({}) VALUES ({placeholders})",
                        columns.join(", ")
                    ),
                    rusqlite::params_from_iter(values.iter()),
                )?;
            }
        }

        tx.commit()?;
        info!(rows = report.total(), "import replaced database contents");
        Ok(report)
    }
}

/// Peels the optional `data` wrapper off an import document.
fn unwrap_document(document: &Value) -> Result<&Map<String, Value>> {
    let outer = document.as_object().ok_or_else(|| {
        StoreError::MalformedRequest("import document must be a JSON object".into())
    })?;
    match outer.get("data") {
        Some(Value::Object(inner)) => Ok(inner),
        _ => Ok(outer),
    }
}
