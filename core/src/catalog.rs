//! The fixed table catalog.
//!
//! This module is the closed vocabulary of the access layer: the only table
//! names the engines will ever interpolate into SQL text, split into entity
//! tables (rows with their own `id`) and junction tables (two-column
//! many-to-many association tables). It also carries the allowed filter
//! operator set and the foreign-key dependency orders used by bulk
//! export/import.
//!
//! Everything here is immutable, literal data plus pure predicates. No
//! database access happens in this module.

/// Entity tables: independently meaningful rows addressed by a TEXT `id`.
pub const ENTITY_TABLES: &[&str] = &[
    "projects",
    "tasks",
    "meetings",
    "clients",
    "suppliers",
    "contracts",
    "ledger_expenses",
    "subscriptions",
    "digital_assets",
    "quote_line_items",
    "business_targets",
];

/// Junction tables: exactly two foreign-key columns, no own identity.
pub const JUNCTION_TABLES: &[&str] = &[
    "client_projects",
    "client_contracts",
    "project_contracts",
    "ledger_projects",
    "ledger_suppliers",
    "supplier_projects",
    "asset_ledger_links",
];

/// Comparison operators accepted in `where` clauses.
pub const ALLOWED_OPERATORS: &[&str] = &["=", "!=", ">", "<", ">=", "<=", "LIKE", "IN"];

/// Forward foreign-key dependency order: independent entities first,
/// junctions last. Bulk import inserts in this order; export reads in it.
pub const INSERT_ORDER: &[&str] = &[
    "projects",
    "clients",
    "suppliers",
    "contracts",
    "ledger_expenses",
    "digital_assets",
    "subscriptions",
    "business_targets",
    "quote_line_items",
    "tasks",
    "meetings",
    "client_projects",
    "client_contracts",
    "project_contracts",
    "ledger_projects",
    "ledger_suppliers",
    "supplier_projects",
    "asset_ledger_links",
];

/// Reverse dependency order: junctions and dependent entities first.
/// Bulk import deletes in this order so foreign keys never dangle
/// mid-operation.
pub const DELETE_ORDER: &[&str] = &[
    "asset_ledger_links",
    "supplier_projects",
    "ledger_suppliers",
    "ledger_projects",
    "project_contracts",
    "client_contracts",
    "client_projects",
    "tasks",
    "meetings",
    "quote_line_items",
    "business_targets",
    "digital_assets",
    "subscriptions",
    "ledger_expenses",
    "contracts",
    "suppliers",
    "clients",
    "projects",
];

/// Returns true if `table` is an entity table.
pub fn is_entity_table(table: &str) -> bool {
    ENTITY_TABLES.contains(&table)
}

/// Returns true if `table` is a junction table.
pub fn is_junction_table(table: &str) -> bool {
    JUNCTION_TABLES.contains(&table)
}

/// Returns true if `table` is anywhere in the catalog.
pub fn is_known_table(table: &str) -> bool {
    is_entity_table(table) || is_junction_table(table)
}

/// Returns true if `op` is one of the whitelisted comparison operators.
pub fn is_allowed_operator(op: &str) -> bool {
    ALLOWED_OPERATORS.contains(&op)
}

/// Returns true if `column` matches the identifier grammar
/// `[A-Za-z_][A-Za-z0-9_]*`.
///
/// This is a syntactic check only. Column lists arrive per request (insert
/// payload keys, filter and sort columns) and cannot be enumerated
/// statically, so membership on the target table is not confirmed here.
pub fn is_valid_column_name(column: &str) -> bool {
    let mut chars = column.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
