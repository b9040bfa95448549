//! Schema lifecycle operations.
//!
//! Provides [`Migration`] for creating and dropping the catalog tables and
//! inspecting the current state of the database. DDL batches run inside a
//! transaction so a half-created schema is never left behind.

use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::schema::{drop_sql, schema_sql};

/// Manages the lifecycle of the catalog tables.
///
/// # Examples
///
/// ```no_run
/// use atelier_sqlite::Migration;
/// use rusqlite::Connection;
///
/// let conn = Connection::open("data.db").unwrap();
/// let mut migration = Migration::new(conn).unwrap();
/// migration.up().unwrap();
///
/// let status = migration.status().unwrap();
/// assert!(status.tables_exist);
/// ```
pub struct Migration {
    conn: Connection,
}

impl Migration {
    /// Creates a migration manager and enables foreign-key enforcement.
    pub fn new(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Creates all catalog tables and indexes.
    ///
    /// Uses `CREATE TABLE IF NOT EXISTS`, so it is safe to call repeatedly.
    pub fn up(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(schema_sql())
            .map_err(|e| StoreError::MigrationError(format!("failed to create tables: {e}")))?;
        tx.commit()?;
        Ok(())
    }

    /// Drops all catalog tables in reverse dependency order.
    pub fn down(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(drop_sql())
            .map_err(|e| StoreError::MigrationError(format!("failed to drop tables: {e}")))?;
        tx.commit()?;
        Ok(())
    }

    /// Reports whether the tables exist and how many rows they hold.
    pub fn status(&self) -> Result<MigrationStatus> {
        if !self.tables_exist()? {
            return Ok(MigrationStatus {
                tables_exist: false,
                row_counts: Vec::new(),
            });
        }

        let mut row_counts = Vec::with_capacity(atelier_core::INSERT_ORDER.len());
        for table in atelier_core::INSERT_ORDER {
            let count: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
            row_counts.push((*table, count as usize));
        }

        Ok(MigrationStatus {
            tables_exist: true,
            row_counts,
        })
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consumes the migration and returns the underlying connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    fn tables_exist(&self) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
        for table in atelier_core::INSERT_ORDER {
            let count: i64 = stmt.query_row([table], |r| r.get(0))?;
            if count == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Snapshot of the schema state, returned by [`Migration::status`].
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Whether the catalog tables exist in the database.
    pub tables_exist: bool,
    /// Per-table row counts in dependency order; empty when tables are absent.
    pub row_counts: Vec<(&'static str, usize)>,
}
