//! The SQL safety guard.
//!
//! Every engine funnels caller-supplied identifiers through these assertions
//! before building SQL text. The discipline is two-stage: validate
//! identifiers against the closed catalog and the identifier grammar first,
//! then interpolate only validated identifiers — values are always bound as
//! parameters, never interpolated. This module is the single shared path for
//! that first stage.
//!
//! All assertions are pure and synchronous; none of them touch the database.

use thiserror::Error;

use crate::catalog;

/// Identifier and statement-kind validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    /// Table name is not in the catalog.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// Table is in the catalog but has the wrong category for the operation
    /// (e.g. `insert` on a junction table).
    #[error("table {table} does not support {operation}")]
    UnsupportedOperation {
        /// The table named in the request.
        table: String,
        /// The operation that rejected it.
        operation: &'static str,
    },

    /// Column name violates the `[A-Za-z_][A-Za-z0-9_]*` grammar.
    #[error("invalid column name: {0}")]
    InvalidColumnName(String),

    /// Operator is not in the whitelist.
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// Statement is not a `SELECT`/`WITH` query.
    #[error("only SELECT queries are permitted")]
    WriteNotPermitted,
}

/// Asserts that `table` is somewhere in the catalog.
pub fn assert_table(table: &str) -> Result<(), GuardError> {
    if catalog::is_known_table(table) {
        Ok(())
    } else {
        Err(GuardError::UnknownTable(table.to_string()))
    }
}

/// Asserts that `table` is an entity table.
///
/// `operation` names the rejecting operation in the error message.
pub fn assert_entity_table(table: &str, operation: &'static str) -> Result<(), GuardError> {
    assert_table(table)?;
    if catalog::is_entity_table(table) {
        Ok(())
    } else {
        Err(GuardError::UnsupportedOperation {
            table: table.to_string(),
            operation,
        })
    }
}

/// Asserts that `table` is a junction table.
pub fn assert_junction_table(table: &str, operation: &'static str) -> Result<(), GuardError> {
    assert_table(table)?;
    if catalog::is_junction_table(table) {
        Ok(())
    } else {
        Err(GuardError::UnsupportedOperation {
            table: table.to_string(),
            operation,
        })
    }
}

/// Asserts that `column` matches the identifier grammar.
///
/// Syntactic only: a well-formed name for a column that does not exist on
/// the target table passes here and surfaces as a database error downstream.
pub fn assert_column(column: &str) -> Result<(), GuardError> {
    if catalog::is_valid_column_name(column) {
        Ok(())
    } else {
        Err(GuardError::InvalidColumnName(column.to_string()))
    }
}

/// Asserts that `op` is a whitelisted comparison operator.
pub fn assert_operator(op: &str) -> Result<(), GuardError> {
    if catalog::is_allowed_operator(op) {
        Ok(())
    } else {
        Err(GuardError::UnsupportedOperator(op.to_string()))
    }
}

/// Asserts that `sql` is a read-only statement.
///
/// Passes when the trimmed, case-normalized text starts with `SELECT` or
/// `WITH`. The content of the statement is deliberately not inspected; see
/// the aggregate gateway for the scope of that guarantee.
pub fn assert_read_only(sql: &str) -> Result<(), GuardError> {
    let normalized = sql.trim_start().to_uppercase();
    if normalized.starts_with("SELECT") || normalized.starts_with("WITH") {
        Ok(())
    } else {
        Err(GuardError::WriteNotPermitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_table() {
        assert!(assert_table("projects").is_ok());
        assert!(assert_table("client_projects").is_ok());
        assert!(matches!(
            assert_table("users"),
            Err(GuardError::UnknownTable(_))
        ));
    }

    #[test]
    fn test_assert_entity_table_rejects_junctions() {
        assert!(assert_entity_table("clients", "insert").is_ok());
        assert!(matches!(
            assert_entity_table("client_projects", "insert"),
            Err(GuardError::UnsupportedOperation { .. })
        ));
        // Unknown table wins over category
        assert!(matches!(
            assert_entity_table("nope", "insert"),
            Err(GuardError::UnknownTable(_))
        ));
    }

    #[test]
    fn test_assert_junction_table_rejects_entities() {
        assert!(assert_junction_table("ledger_projects", "link").is_ok());
        assert!(matches!(
            assert_junction_table("projects", "link"),
            Err(GuardError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn test_assert_column() {
        assert!(assert_column("updated_at").is_ok());
        assert!(matches!(
            assert_column("x; DROP TABLE projects; --"),
            Err(GuardError::InvalidColumnName(_))
        ));
    }

    #[test]
    fn test_assert_operator() {
        assert!(assert_operator("LIKE").is_ok());
        assert!(matches!(
            assert_operator("NOT IN"),
            Err(GuardError::UnsupportedOperator(_))
        ));
    }

    #[test]
    fn test_assert_read_only() {
        assert!(assert_read_only("SELECT * FROM projects").is_ok());
        assert!(assert_read_only("  select 1").is_ok());
        assert!(assert_read_only("WITH t AS (SELECT 1) SELECT * FROM t").is_ok());
        assert!(assert_read_only("DELETE FROM projects").is_err());
        assert!(assert_read_only("INSERT INTO projects DEFAULT VALUES").is_err());
        assert!(assert_read_only("").is_err());
    }
}
