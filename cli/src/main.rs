use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rusqlite::Connection;
use serde_json::Value;

use atelier_core::{Filter, Sort};
use atelier_sqlite::{AggregateGateway, EntityStore, JunctionStore, Migration, Transfer};

#[derive(Debug, Parser)]
#[command(name = "atelier")]
#[command(about = "Generic table-driven access to the atelier business database")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Query rows from a table with an optional filter and sort.
    Query(QueryArgs),
    /// Fetch a single row by id.
    Get(GetArgs),
    /// Insert a row and print its generated id.
    Insert(InsertArgs),
    /// Update columns of a row by id.
    Update(UpdateArgs),
    /// Delete a row by id.
    Delete(DeleteArgs),
    /// Link two rows through a junction table.
    Link(LinkArgs),
    /// Remove a link between two rows.
    Unlink(LinkArgs),
    /// List the ids linked to a row through a junction table.
    Linked(LinkedArgs),
    /// Run a read-only SQL query with bound parameters.
    Aggregate(AggregateArgs),
    /// Export every table to a JSON document.
    Export(DbArgs),
    /// Replace the full database contents from a JSON document.
    Import(ImportArgs),
    /// Schema lifecycle operations.
    Migrate(MigrateArgs),
}

#[derive(Debug, Args)]
struct DbArgs {
    /// Database file path.
    #[arg(long)]
    db: PathBuf,
}

#[derive(Debug, Args)]
struct QueryArgs {
    #[command(flatten)]
    db: DbArgs,
    /// Table name.
    table: String,
    /// Filter as JSON, e.g. '{"where":[{"column":"status","op":"=","value":"active"}]}'.
    #[arg(long)]
    filter: Option<String>,
    /// Sort as JSON, e.g. '{"column":"name","direction":"DESC"}'.
    #[arg(long)]
    sort: Option<String>,
}

#[derive(Debug, Args)]
struct GetArgs {
    #[command(flatten)]
    db: DbArgs,
    /// Table name.
    table: String,
    /// Row id.
    id: String,
}

#[derive(Debug, Args)]
struct InsertArgs {
    #[command(flatten)]
    db: DbArgs,
    /// Table name.
    table: String,
    /// Row data as a JSON object.
    data: String,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    #[command(flatten)]
    db: DbArgs,
    /// Table name.
    table: String,
    /// Row id.
    id: String,
    /// Columns to update as a JSON object.
    data: String,
}

#[derive(Debug, Args)]
struct DeleteArgs {
    #[command(flatten)]
    db: DbArgs,
    /// Table name.
    table: String,
    /// Row id.
    id: String,
}

#[derive(Debug, Args)]
struct LinkArgs {
    #[command(flatten)]
    db: DbArgs,
    /// Junction table name.
    junction: String,
    /// Id on the junction's left side.
    left_id: String,
    /// Id on the junction's right side.
    right_id: String,
}

#[derive(Debug, Args)]
struct LinkedArgs {
    #[command(flatten)]
    db: DbArgs,
    /// Junction table name.
    junction: String,
    /// Junction column the id lives on.
    column: String,
    /// Row id to look up.
    id: String,
}

#[derive(Debug, Args)]
struct AggregateArgs {
    #[command(flatten)]
    db: DbArgs,
    /// Read-only SQL statement (SELECT/WITH).
    sql: String,
    /// Positional parameters as a JSON array.
    #[arg(long)]
    params: Option<String>,
}

#[derive(Debug, Args)]
struct ImportArgs {
    #[command(flatten)]
    db: DbArgs,
    /// Path to the JSON document, or `-` to read stdin.
    input: PathBuf,
}

#[derive(Debug, Args)]
struct MigrateArgs {
    #[command(subcommand)]
    operation: MigrateOperation,
}

#[derive(Debug, Subcommand)]
enum MigrateOperation {
    /// Create the catalog tables.
    Up(DbArgs),
    /// Drop the catalog tables.
    Down(DbArgs),
    /// Show whether tables exist and their row counts.
    Status(DbArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Query(args) => run_query(args),
        Command::Get(args) => run_get(args),
        Command::Insert(args) => run_insert(args),
        Command::Update(args) => run_update(args),
        Command::Delete(args) => run_delete(args),
        Command::Link(args) => run_link(args),
        Command::Unlink(args) => run_unlink(args),
        Command::Linked(args) => run_linked(args),
        Command::Aggregate(args) => run_aggregate(args),
        Command::Export(args) => run_export(args),
        Command::Import(args) => run_import(args),
        Command::Migrate(args) => run_migrate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn open(args: &DbArgs) -> Result<Connection, String> {
    Connection::open(&args.db)
        .map_err(|e| format!("failed to open database '{}': {e}", args.db.display()))
}

fn parse_json<T: serde::de::DeserializeOwned>(input: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(input).map_err(|e| format!("invalid {what} JSON: {e}"))
}

fn print_json(value: &impl serde::Serialize) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

fn run_query(args: QueryArgs) -> Result<(), String> {
    let conn = open(&args.db)?;
    let store = EntityStore::new(&conn).map_err(|e| e.to_string())?;

    let filter: Option<Filter> = args
        .filter
        .as_deref()
        .map(|f| parse_json(f, "filter"))
        .transpose()?;
    let sort: Option<Sort> = args
        .sort
        .as_deref()
        .map(|s| parse_json(s, "sort"))
        .transpose()?;

    let rows = store
        .query(&args.table, filter.as_ref(), sort.as_ref())
        .map_err(|e| e.to_string())?;
    print_json(&rows)
}

fn run_get(args: GetArgs) -> Result<(), String> {
    let conn = open(&args.db)?;
    let store = EntityStore::new(&conn).map_err(|e| e.to_string())?;
    let row = store
        .get_by_id(&args.table, &args.id)
        .map_err(|e| e.to_string())?;
    print_json(&row)
}

fn run_insert(args: InsertArgs) -> Result<(), String> {
    let conn = open(&args.db)?;
    let store = EntityStore::new(&conn).map_err(|e| e.to_string())?;
    let data: Value = parse_json(&args.data, "data")?;
    let id = store.insert(&args.table, &data).map_err(|e| e.to_string())?;
    println!("{id}");
    Ok(())
}

fn run_update(args: UpdateArgs) -> Result<(), String> {
    let conn = open(&args.db)?;
    let store = EntityStore::new(&conn).map_err(|e| e.to_string())?;
    let data: Value = parse_json(&args.data, "data")?;
    store
        .update(&args.table, &args.id, &data)
        .map_err(|e| e.to_string())?;
    println!("updated {} {}", args.table, args.id);
    Ok(())
}

fn run_delete(args: DeleteArgs) -> Result<(), String> {
    let conn = open(&args.db)?;
    let store = EntityStore::new(&conn).map_err(|e| e.to_string())?;
    store
        .delete(&args.table, &args.id)
        .map_err(|e| e.to_string())?;
    println!("deleted {} {}", args.table, args.id);
    Ok(())
}

fn run_link(args: LinkArgs) -> Result<(), String> {
    let conn = open(&args.db)?;
    let links = JunctionStore::new(&conn).map_err(|e| e.to_string())?;
    links
        .link(&args.junction, &args.left_id, &args.right_id)
        .map_err(|e| e.to_string())?;
    println!("linked {} ({}, {})", args.junction, args.left_id, args.right_id);
    Ok(())
}

fn run_unlink(args: LinkArgs) -> Result<(), String> {
    let conn = open(&args.db)?;
    let links = JunctionStore::new(&conn).map_err(|e| e.to_string())?;
    links
        .unlink(&args.junction, &args.left_id, &args.right_id)
        .map_err(|e| e.to_string())?;
    println!("unlinked {} ({}, {})", args.junction, args.left_id, args.right_id);
    Ok(())
}

fn run_linked(args: LinkedArgs) -> Result<(), String> {
    let conn = open(&args.db)?;
    let links = JunctionStore::new(&conn).map_err(|e| e.to_string())?;
    let ids = links
        .get_linked(&args.junction, &args.column, &args.id)
        .map_err(|e| e.to_string())?;
    print_json(&ids)
}

fn run_aggregate(args: AggregateArgs) -> Result<(), String> {
    let conn = open(&args.db)?;
    let gateway = AggregateGateway::new(&conn);

    let params: Vec<Value> = match args.params.as_deref() {
        Some(p) => parse_json(p, "params")?,
        None => Vec::new(),
    };

    let rows = gateway
        .aggregate(&args.sql, &params)
        .map_err(|e| e.to_string())?;
    print_json(&rows)
}

fn run_export(args: DbArgs) -> Result<(), String> {
    let conn = open(&args)?;
    let transfer = Transfer::new(&conn).map_err(|e| e.to_string())?;
    let document = transfer.export().map_err(|e| e.to_string())?;
    print_json(&document)
}

fn run_import(args: ImportArgs) -> Result<(), String> {
    let text = if args.input == PathBuf::from("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        buf
    } else {
        fs::read_to_string(&args.input)
            .map_err(|e| format!("failed to read '{}': {e}", args.input.display()))?
    };
    let document: Value = parse_json(&text, "import document")?;

    let conn = open(&args.db)?;
    let transfer = Transfer::new(&conn).map_err(|e| e.to_string())?;
    let report = transfer.import(&document).map_err(|e| e.to_string())?;
    print_json(&report)
}

fn run_migrate(args: MigrateArgs) -> Result<(), String> {
    match args.operation {
        MigrateOperation::Up(db) => {
            let mut migration = Migration::new(open(&db)?).map_err(|e| e.to_string())?;
            migration.up().map_err(|e| e.to_string())?;
            println!("migration up complete in '{}'", db.db.display());
            Ok(())
        }
        MigrateOperation::Down(db) => {
            let mut migration = Migration::new(open(&db)?).map_err(|e| e.to_string())?;
            migration.down().map_err(|e| e.to_string())?;
            println!("migration down complete in '{}'", db.db.display());
            Ok(())
        }
        MigrateOperation::Status(db) => {
            let migration = Migration::new(open(&db)?).map_err(|e| e.to_string())?;
            let status = migration.status().map_err(|e| e.to_string())?;
            println!(
                "tables exist: {}",
                if status.tables_exist { "yes" } else { "no" }
            );
            for (table, count) in &status.row_counts {
                println!("  {table}: {count}");
            }
            Ok(())
        }
    }
}
