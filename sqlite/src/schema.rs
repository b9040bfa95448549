//! SQL schema generation for the fixed table catalog.
//!
//! Generates `CREATE TABLE` statements for the 11 entity tables and 7
//! junction tables the access layer operates on. Entity tables carry a TEXT
//! `id` primary key plus `created_at`/`updated_at` timestamps; junction
//! tables are exactly two TEXT foreign-key columns with a composite primary
//! key on the pair, which is what makes duplicate `link` calls no-ops at the
//! storage level.
//!
//! The dependency order of the statements matches
//! [`atelier_core::INSERT_ORDER`]; drops run in the reverse order.

/// Complete `CREATE TABLE IF NOT EXISTS` DDL for all catalog tables,
/// entities before junctions, plus lookup indexes.
pub fn schema_sql() -> &'static str {
    r#"
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    status TEXT,
    period_start TEXT,
    period_end TEXT,
    note TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS clients (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    contact TEXT,
    phone TEXT,
    email TEXT,
    note TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS suppliers (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    category TEXT,
    contact TEXT,
    phone TEXT,
    note TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS contracts (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    amount REAL NOT NULL DEFAULT 0,
    status TEXT,
    sign_date TEXT,
    due_date TEXT,
    note TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS ledger_expenses (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    expense_date TEXT,
    period_start TEXT,
    period_end TEXT,
    amount_original REAL NOT NULL DEFAULT 0,
    amount_local REAL NOT NULL DEFAULT 0,
    currency TEXT,
    cost_category TEXT,
    cost_detail TEXT,
    cost_nature TEXT,
    cost_ownership TEXT,
    cost_bearer TEXT,
    approval_status TEXT,
    input_mode TEXT,
    payment_method TEXT,
    invoice_type TEXT,
    note TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS digital_assets (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    status TEXT,
    service_version TEXT,
    service_area TEXT,
    software_version TEXT,
    start_date TEXT,
    download_url TEXT,
    description TEXT,
    note TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS subscriptions (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    service_version TEXT,
    service_area TEXT,
    status TEXT,
    start_date TEXT,
    description TEXT,
    software_version TEXT,
    download_url TEXT,
    note TEXT,
    price REAL NOT NULL DEFAULT 0,
    currency TEXT,
    billing_cycle TEXT,
    cost_sub_category TEXT,
    last_payment_date TEXT,
    next_billing_date TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS business_targets (
    id TEXT PRIMARY KEY,
    year INTEGER,
    target_amount REAL NOT NULL DEFAULT 0,
    note TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS quote_line_items (
    id TEXT PRIMARY KEY,
    item_name TEXT NOT NULL,
    description TEXT,
    quantity REAL NOT NULL DEFAULT 1,
    rate REAL NOT NULL DEFAULT 0,
    position INTEGER,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY,
    project_id TEXT,
    name TEXT NOT NULL,
    status TEXT,
    progress TEXT,
    owner TEXT,
    start_date TEXT,
    end_date TEXT,
    milestone TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS meetings (
    id TEXT PRIMARY KEY,
    project_id TEXT,
    title TEXT NOT NULL,
    meeting_date TEXT,
    note TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS client_projects (
    client_id TEXT NOT NULL,
    project_id TEXT NOT NULL,
    PRIMARY KEY (client_id, project_id),
    FOREIGN KEY (client_id) REFERENCES clients(id) ON DELETE CASCADE,
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS client_contracts (
    client_id TEXT NOT NULL,
    contract_id TEXT NOT NULL,
    PRIMARY KEY (client_id, contract_id),
    FOREIGN KEY (client_id) REFERENCES clients(id) ON DELETE CASCADE,
    FOREIGN KEY (contract_id) REFERENCES contracts(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS project_contracts (
    project_id TEXT NOT NULL,
    contract_id TEXT NOT NULL,
    PRIMARY KEY (project_id, contract_id),
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE,
    FOREIGN KEY (contract_id) REFERENCES contracts(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS ledger_projects (
    ledger_id TEXT NOT NULL,
    project_id TEXT NOT NULL,
    PRIMARY KEY (ledger_id, project_id),
    FOREIGN KEY (ledger_id) REFERENCES ledger_expenses(id) ON DELETE CASCADE,
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS ledger_suppliers (
    ledger_id TEXT NOT NULL,
    supplier_id TEXT NOT NULL,
    PRIMARY KEY (ledger_id, supplier_id),
    FOREIGN KEY (ledger_id) REFERENCES ledger_expenses(id) ON DELETE CASCADE,
    FOREIGN KEY (supplier_id) REFERENCES suppliers(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS supplier_projects (
    supplier_id TEXT NOT NULL,
    project_id TEXT NOT NULL,
    PRIMARY KEY (supplier_id, project_id),
    FOREIGN KEY (supplier_id) REFERENCES suppliers(id) ON DELETE CASCADE,
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS asset_ledger_links (
    asset_id TEXT NOT NULL,
    ledger_id TEXT NOT NULL,
    PRIMARY KEY (asset_id, ledger_id),
    FOREIGN KEY (asset_id) REFERENCES digital_assets(id) ON DELETE CASCADE,
    FOREIGN KEY (ledger_id) REFERENCES ledger_expenses(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id);
CREATE INDEX IF NOT EXISTS idx_meetings_project ON meetings(project_id);
CREATE INDEX IF NOT EXISTS idx_ledger_expenses_date ON ledger_expenses(expense_date);
CREATE INDEX IF NOT EXISTS idx_subscriptions_next_billing ON subscriptions(next_billing_date);
"#
}

/// `DROP TABLE IF EXISTS` DDL for all catalog tables in reverse dependency
/// order.
pub fn drop_sql() -> &'static str {
    r#"
DROP TABLE IF EXISTS asset_ledger_links;
DROP TABLE IF EXISTS supplier_projects;
DROP TABLE IF EXISTS ledger_suppliers;
DROP TABLE IF EXISTS ledger_projects;
DROP TABLE IF EXISTS project_contracts;
DROP TABLE IF EXISTS client_contracts;
DROP TABLE IF EXISTS client_projects;
DROP TABLE IF EXISTS tasks;
DROP TABLE IF EXISTS meetings;
DROP TABLE IF EXISTS quote_line_items;
DROP TABLE IF EXISTS business_targets;
DROP TABLE IF EXISTS digital_assets;
DROP TABLE IF EXISTS subscriptions;
DROP TABLE IF EXISTS ledger_expenses;
DROP TABLE IF EXISTS contracts;
DROP TABLE IF EXISTS suppliers;
DROP TABLE IF EXISTS clients;
DROP TABLE IF EXISTS projects;
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::{ENTITY_TABLES, JUNCTION_TABLES};
    use rusqlite::Connection;

    #[test]
    fn test_schema_sql_names_every_catalog_table() {
        let sql = schema_sql();
        for table in ENTITY_TABLES.iter().chain(JUNCTION_TABLES) {
            assert!(
                sql.contains(&format!("CREATE TABLE IF NOT EXISTS {table} (")),
                "{table} missing from schema DDL"
            );
        }
    }

    #[test]
    fn test_drop_sql_names_every_catalog_table() {
        let sql = drop_sql();
        for table in ENTITY_TABLES.iter().chain(JUNCTION_TABLES) {
            assert!(sql.contains(&format!("DROP TABLE IF EXISTS {table};")));
        }
    }

    #[test]
    fn test_schema_applies_cleanly() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        conn.execute_batch(schema_sql()).unwrap();
        conn.execute_batch(schema_sql()).unwrap(); // idempotent
        conn.execute_batch(drop_sql()).unwrap();
    }

    #[test]
    fn test_junction_pair_is_unique() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(schema_sql()).unwrap();
        conn.execute(
            "INSERT INTO clients (id, name) VALUES ('c1', 'Acme')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO projects (id, name) VALUES ('p1', 'Launch')",
            [],
        )
        .unwrap();

        let insert = "INSERT OR IGNORE INTO client_projects (client_id, project_id) VALUES ('c1', 'p1')";
        assert_eq!(conn.execute(insert, []).unwrap(), 1);
        assert_eq!(conn.execute(insert, []).unwrap(), 0);
    }

    #[test]
    fn test_entity_rows_default_timestamps() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(schema_sql()).unwrap();
        conn.execute("INSERT INTO projects (id, name) VALUES ('p1', 'Launch')", [])
            .unwrap();
        let updated_at: String = conn
            .query_row("SELECT updated_at FROM projects WHERE id = 'p1'", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert!(!updated_at.is_empty());
    }
}
