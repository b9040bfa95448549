//! Request shapes shared by the engines and their transports.
//!
//! These mirror the wire format of the access layer: a filter is zero or
//! more ANDed `where` clauses plus optional pagination, and a sort names a
//! column and a direction. Values stay as [`serde_json::Value`] until the
//! engines bind them as SQL parameters.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One `where` clause: `column op value`.
///
/// The operator is validated against the catalog whitelist at query time,
/// never trusted as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhereClause {
    /// Column to compare. Must satisfy the identifier grammar.
    pub column: String,
    /// Comparison operator token, e.g. `"="` or `"IN"`.
    pub op: String,
    /// Value to bind. For `IN` this must be a non-empty array.
    #[serde(default)]
    pub value: Value,
}

/// Filter for a generic query: ANDed clauses plus optional pagination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Filter {
    /// Zero or more clauses joined with `AND`. Empty means no `WHERE`.
    #[serde(rename = "where", default)]
    pub where_clauses: Vec<WhereClause>,
    /// Maximum number of rows. Must be non-negative when present.
    #[serde(default)]
    pub limit: Option<i64>,
    /// Rows to skip. Must be non-negative when present. An offset without a
    /// limit is honored via SQLite's unbounded `LIMIT -1` sentinel.
    #[serde(default)]
    pub offset: Option<i64>,
}

/// Sort direction. Anything other than a case-insensitive `"DESC"` is
/// treated as ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortDirection {
    /// SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl From<String> for SortDirection {
    fn from(s: String) -> Self {
        if s.eq_ignore_ascii_case("DESC") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

impl<'de> Deserialize<'de> for SortDirection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(String::deserialize(deserializer)?.into())
    }
}

/// Sort specification for a generic query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sort {
    /// Column to order by. Must satisfy the identifier grammar.
    pub column: String,
    /// Direction; defaults to ascending.
    #[serde(default)]
    pub direction: SortDirection,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_deserializes_wire_shape() {
        let filter: Filter = serde_json::from_value(json!({
            "where": [{"column": "status", "op": "=", "value": "active"}],
            "limit": 10,
            "offset": 5
        }))
        .unwrap();
        assert_eq!(filter.where_clauses.len(), 1);
        assert_eq!(filter.where_clauses[0].column, "status");
        assert_eq!(filter.limit, Some(10));
        assert_eq!(filter.offset, Some(5));
    }

    #[test]
    fn test_filter_defaults_to_empty() {
        let filter: Filter = serde_json::from_value(json!({})).unwrap();
        assert!(filter.where_clauses.is_empty());
        assert_eq!(filter.limit, None);
        assert_eq!(filter.offset, None);
    }

    #[test]
    fn test_sort_direction_is_asc_unless_exactly_desc() {
        let sort: Sort =
            serde_json::from_value(json!({"column": "name", "direction": "desc"})).unwrap();
        assert_eq!(sort.direction, SortDirection::Desc);

        let sort: Sort =
            serde_json::from_value(json!({"column": "name", "direction": "descending"})).unwrap();
        assert_eq!(sort.direction, SortDirection::Asc);

        let sort: Sort = serde_json::from_value(json!({"column": "name"})).unwrap();
        assert_eq!(sort.direction, SortDirection::Asc);
    }
}
