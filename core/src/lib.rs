//! Table catalog, SQL safety guard, and request types for the atelier
//! access layer.
//!
//! The access layer operates generically over an allow-listed set of tables
//! without per-table code. This crate is its pure foundation:
//!
//! - [`catalog`] — the closed vocabulary: entity tables, junction tables,
//!   allowed filter operators, and the foreign-key dependency orders used by
//!   bulk export/import.
//! - [`guard`] — the safety guard: assertions that run before any identifier
//!   is interpolated into SQL text ([`assert_table`], [`assert_column`],
//!   [`assert_operator`], [`assert_read_only`]).
//! - [`types`] — serde-ready request shapes ([`Filter`], [`WhereClause`],
//!   [`Sort`]).
//!
//! Nothing in this crate touches a database.
//!
//! # Example
//!
//! ```
//! use atelier_core::{assert_table, assert_column, is_junction_table};
//!
//! assert!(assert_table("projects").is_ok());
//! assert!(assert_table("users").is_err());
//! assert!(assert_column("drop table; --").is_err());
//! assert!(is_junction_table("client_projects"));
//! ```

pub mod catalog;
pub mod guard;
pub mod types;

pub use catalog::{
    ALLOWED_OPERATORS, DELETE_ORDER, ENTITY_TABLES, INSERT_ORDER, JUNCTION_TABLES,
    is_allowed_operator, is_entity_table, is_junction_table, is_known_table,
    is_valid_column_name,
};
pub use guard::{
    GuardError, assert_column, assert_entity_table, assert_junction_table, assert_operator,
    assert_read_only, assert_table,
};
pub use types::{Filter, Sort, SortDirection, WhereClause};
