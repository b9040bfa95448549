//! Many-to-many relationship management over junction tables.
//!
//! One engine serves all seven junction tables without per-relation code:
//! the two columns of a junction are discovered at call time from the live
//! table definition rather than hard-coded. The cost of staying generic is
//! that a table not shaped as exactly two columns is rejected at call time
//! ([`StoreError::NotAJunctionTable`]) instead of compile time.

use rusqlite::Connection;

use atelier_core::guard;

use crate::crud::require_id;
use crate::error::{Result, StoreError};

/// Junction-table engine over an injected connection.
///
/// A relationship instance is the ordered pair `(left_id, right_id)`;
/// uniqueness of the pair is the invariant. Duplicate [`link`](Self::link)
/// calls are no-ops, and [`unlink`](Self::unlink) on an absent pair is not
/// an error.
pub struct JunctionStore<'a> {
    conn: &'a Connection,
}

impl<'a> JunctionStore<'a> {
    /// Creates an engine over the given connection and enables foreign-key
    /// enforcement.
    pub fn new(conn: &'a Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Discovers the two columns of a junction table in declared order.
    ///
    /// Inspects the live table definition and fails with
    /// [`StoreError::NotAJunctionTable`] unless it has exactly two columns.
    pub fn describe_junction(&self, junction: &str) -> Result<(String, String)> {
        guard::assert_junction_table(junction, "describe_junction")?;

        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({junction})"))?;
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        match <[String; 2]>::try_from(columns) {
            Ok([left, right]) => Ok((left, right)),
            Err(_) => Err(StoreError::NotAJunctionTable(junction.to_string())),
        }
    }

    /// Records the relationship `(left_id, right_id)`.
    ///
    /// Idempotent: linking an already-linked pair succeeds without effect.
    pub fn link(&self, junction: &str, left_id: &str, right_id: &str) -> Result<()> {
        guard::assert_junction_table(junction, "link")?;
        let left_id = require_id(left_id)?;
        let right_id = require_id(right_id)?;

        let (left_col, right_col) = self.describe_junction(junction)?;
        self.conn.execute(
            &format!("INSERT OR IGNORE INTO {junction} ({left_col}, {right_col}) VALUES (?, ?)"),
            [left_id, right_id],
        )?;
        Ok(())
    }

    /// Removes the relationship `(left_id, right_id)` if present.
    pub fn unlink(&self, junction: &str, left_id: &str, right_id: &str) -> Result<()> {
        guard::assert_junction_table(junction, "unlink")?;
        let left_id = require_id(left_id)?;
        let right_id = require_id(right_id)?;

        let (left_col, right_col) = self.describe_junction(junction)?;
        self.conn.execute(
            &format!("DELETE FROM {junction} WHERE {left_col} = ? AND {right_col} = ?"),
            [left_id, right_id],
        )?;
        Ok(())
    }

    /// Returns the ids linked to `id` through `junction`.
    ///
    /// `column` names the side `id` lives on and must equal one of the
    /// junction's two actual columns ([`StoreError::ColumnNotInJunction`]
    /// otherwise); the other column's values are returned in storage order.
    pub fn get_linked(&self, junction: &str, column: &str, id: &str) -> Result<Vec<String>> {
        guard::assert_junction_table(junction, "get_linked")?;
        guard::assert_column(column)?;
        let id = require_id(id)?;

        let (left_col, right_col) = self.describe_junction(junction)?;
        let output_col = if column == left_col {
            &right_col
        } else if column == right_col {
            &left_col
        } else {
            return Err(StoreError::ColumnNotInJunction {
                column: column.to_string(),
                junction: junction.to_string(),
            });
        };

        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {output_col} FROM {junction} WHERE {column} = ?"))?;
        let ids: Vec<String> = stmt
            .query_map([id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}
