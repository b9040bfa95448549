//! JSON ↔ SQL value conversion.
//!
//! Rows cross the access layer as JSON objects; this module owns the
//! mapping between [`serde_json::Value`] and SQLite storage classes in both
//! directions. Every engine binds its parameters through [`json_to_sql`] and
//! reads its result sets through [`rows_to_json`], so the mapping cannot
//! drift between operations.

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, params_from_iter};
use serde_json::{Map, Number, Value};

use crate::error::Result;

/// Converts a JSON scalar to a SQLite value for parameter binding.
///
/// Booleans become `0`/`1` integers. Nested arrays and objects are stored
/// as their JSON text; they have no native SQLite representation.
pub fn json_to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(*b as i64),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                SqlValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                SqlValue::Real(f)
            } else {
                SqlValue::Null
            }
        }
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

/// Converts a single column value of a result row to JSON.
fn column_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Number(n.into()),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(s) => Value::String(String::from_utf8_lossy(s).into_owned()),
        ValueRef::Blob(b) => Value::String(format!("[blob {} bytes]", b.len())),
    }
}

/// Prepares `sql`, binds `params` positionally, and returns every result
/// row as a JSON object keyed by the statement's column names.
///
/// Column names are taken verbatim from the statement, so aggregate queries
/// keep whatever aliases their SQL produced.
pub fn rows_to_json(conn: &Connection, sql: &str, params: &[SqlValue]) -> Result<Vec<Value>> {
    let mut stmt = conn.prepare(sql)?;
    let column_names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

    let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
        let mut map = Map::new();
        for (i, name) in column_names.iter().enumerate() {
            map.insert(name.clone(), column_to_json(row.get_ref(i)?));
        }
        Ok(Value::Object(map))
    })?;

    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_to_sql_scalars() {
        assert_eq!(json_to_sql(&Value::Null), SqlValue::Null);
        assert_eq!(json_to_sql(&json!(true)), SqlValue::Integer(1));
        assert_eq!(json_to_sql(&json!(false)), SqlValue::Integer(0));
        assert_eq!(json_to_sql(&json!(42)), SqlValue::Integer(42));
        assert_eq!(json_to_sql(&json!(1.5)), SqlValue::Real(1.5));
        assert_eq!(json_to_sql(&json!("x")), SqlValue::Text("x".into()));
    }

    #[test]
    fn test_json_to_sql_nested_values_become_text() {
        assert_eq!(
            json_to_sql(&json!(["a", "b"])),
            SqlValue::Text("[\"a\",\"b\"]".into())
        );
        assert_eq!(
            json_to_sql(&json!({"k": 1})),
            SqlValue::Text("{\"k\":1}".into())
        );
    }

    #[test]
    fn test_rows_to_json_keys_and_types() {
        let conn = Connection::open_in_memory().unwrap();
        let rows = rows_to_json(
            &conn,
            "SELECT 1 AS n, 'x' AS s, NULL AS missing, 2.5 AS r",
            &[],
        )
        .unwrap();
        assert_eq!(rows, vec![json!({"n": 1, "s": "x", "missing": null, "r": 2.5})]);
    }

    #[test]
    fn test_rows_to_json_binds_params() {
        let conn = Connection::open_in_memory().unwrap();
        let rows = rows_to_json(
            &conn,
            "SELECT ?1 AS a, ?2 AS b",
            &[json_to_sql(&json!("hello")), json_to_sql(&json!(7))],
        )
        .unwrap();
        assert_eq!(rows, vec![json!({"a": "hello", "b": 7})]);
    }
}
