//! SQLite engines for the atelier access layer.
//!
//! This crate implements a small, safety-constrained query/command layer
//! over an allow-listed table catalog, with no per-table code. Identifiers
//! are validated by `atelier-core`'s safety guard before they reach SQL
//! text; values are always bound as parameters.
//!
//! # Architecture
//!
//! - **`crud`** — [`EntityStore`]: filtered queries and
//!   create/read/update/delete over entity tables
//! - **`junction`** — [`JunctionStore`]: many-to-many links with runtime
//!   two-column discovery
//! - **`aggregate`** — [`AggregateGateway`]: caller-supplied read-only SQL
//! - **`transfer`** — [`Transfer`]: full-database export and atomic
//!   full-replace import, ordered by foreign-key dependency
//! - **`schema`** / **`migration`** — DDL for the fixed catalog and its
//!   lifecycle ([`Migration`])
//! - **`convert`** — JSON ↔ SQLite value mapping shared by every engine
//!
//! The database handle is created once by the caller and injected into each
//! engine by reference; the layer adds no locking of its own and relies on
//! SQLite's transaction isolation for the one operation where atomicity
//! matters (import).
//!
//! # Quick start
//!
//! ```no_run
//! use atelier_sqlite::{EntityStore, JunctionStore, Migration};
//! use rusqlite::Connection;
//! use serde_json::json;
//!
//! let mut migration = Migration::new(Connection::open("data.db").unwrap()).unwrap();
//! migration.up().unwrap();
//! let conn = migration.into_connection();
//!
//! let store = EntityStore::new(&conn).unwrap();
//! let client = store.insert("clients", &json!({"name": "Acme"})).unwrap();
//! let project = store.insert("projects", &json!({"name": "Launch"})).unwrap();
//!
//! let links = JunctionStore::new(&conn).unwrap();
//! links.link("client_projects", &client, &project).unwrap();
//! ```

mod aggregate;
mod convert;
mod crud;
mod error;
mod junction;
mod migration;
mod schema;
mod transfer;

pub use aggregate::AggregateGateway;
pub use convert::{json_to_sql, rows_to_json};
pub use crud::EntityStore;
pub use error::{Result, StoreError};
pub use junction::JunctionStore;
pub use migration::{Migration, MigrationStatus};
pub use schema::{drop_sql, schema_sql};
pub use transfer::{ImportReport, Transfer};
