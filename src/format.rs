//! Database formatting for flattened records
//!
//! Turns a [`FlatMap`] into column headers and SQL literal values ready to
//! be spliced into an `INSERT` statement.
//!
//! Escaping is limited to doubling single quotes inside quoted literals.
//! This is not an injection-safe encoder: use parameterized queries for
//! untrusted input.

use crate::config::FlattenConfig;
use crate::error::Result;
use crate::flatten::{FlatMap, Flattener};
use serde::Serialize;
use serde_json::Value;

/// One flattened record laid out as a database row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseRow {
    /// Column names, in record order
    pub headers: Vec<String>,

    /// SQL literals, parallel to `headers`
    pub values: Vec<String>,

    /// `headers` joined with `,`
    pub header_string: String,

    /// `values` joined with `,`
    pub value_string: String,
}

impl DatabaseRow {
    /// Build a row from an already flattened record
    pub fn from_flat(record: &FlatMap) -> Self {
        let headers: Vec<String> = record.keys().cloned().collect();
        let values: Vec<String> = record.values().map(sql_literal).collect();

        DatabaseRow {
            header_string: headers.join(","),
            value_string: values.join(","),
            headers,
            values,
        }
    }

    /// `INSERT INTO <table> (<headers>) VALUES (<values>);`
    pub fn insert_statement(&self, table: &str) -> String {
        format!(
            "INSERT INTO {} ({}) VALUES ({});",
            table, self.header_string, self.value_string
        )
    }
}

/// Flatten `data` with the default configuration and lay it out as a row
pub fn format_for_database(data: Value) -> Result<DatabaseRow> {
    format_for_database_with(data, FlattenConfig::default())
}

/// Flatten `data` with an explicit configuration and lay it out as a row
pub fn format_for_database_with(data: Value, config: FlattenConfig) -> Result<DatabaseRow> {
    let flat = Flattener::new(config).flatten(data)?;
    Ok(DatabaseRow::from_flat(&flat))
}

/// Render one value as a SQL literal
///
/// Strings and composite values are single-quoted, everything else is
/// written bare. Null becomes `NULL`.
pub fn sql_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => quote(s),
        Value::Array(_) | Value::Object(_) => quote(&value.to_string()),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlattenError;
    use serde_json::json;

    #[test]
    fn test_database_format() {
        let row = format_for_database(json!({"a": 1, "b": "o's"})).unwrap();
        assert_eq!(row.headers, vec!["a", "b"]);
        assert_eq!(row.header_string, "a,b");
        assert!(row.value_string.contains("'o''s'"));
        assert_eq!(row.value_string, "1,'o''s'");
    }

    #[test]
    fn test_literals() {
        assert_eq!(sql_literal(&Value::Null), "NULL");
        assert_eq!(sql_literal(&json!("plain")), "'plain'");
        assert_eq!(sql_literal(&json!("it's 'quoted'")), "'it''s ''quoted'''");
        assert_eq!(sql_literal(&json!(42)), "42");
        assert_eq!(sql_literal(&json!(-1.5)), "-1.5");
        assert_eq!(sql_literal(&json!(true)), "true");
        assert_eq!(sql_literal(&json!([])), "'[]'");
        assert_eq!(sql_literal(&json!(["o'k"])), "'[\"o''k\"]'");
        assert_eq!(sql_literal(&json!({"k": 1})), "'{\"k\":1}'");
    }

    #[test]
    fn test_nested_row() {
        let row = format_for_database(json!({
            "id": 1,
            "user": {"name": "John Doe", "orders": [], "nickname": null}
        }))
        .unwrap();

        assert_eq!(row.header_string, "id,user_name,user_orders,user_nickname");
        assert_eq!(row.values, vec!["1", "'John Doe'", "'[]'", "NULL"]);
        assert_eq!(row.headers.len(), row.values.len());
    }

    #[test]
    fn test_empty_root() {
        let row = format_for_database(json!("scalar")).unwrap();
        assert!(row.headers.is_empty());
        assert_eq!(row.header_string, "");
        assert_eq!(row.value_string, "");
    }

    #[test]
    fn test_depth_error_propagates() {
        let config = FlattenConfig::default().with_max_depth(1);
        let err = format_for_database_with(json!({"a": {"b": 1}}), config).unwrap_err();
        assert!(matches!(err, FlattenError::DepthExceeded { .. }));
    }

    #[test]
    fn test_insert_statement() {
        let row = format_for_database(json!({"id": 3, "name": "x"})).unwrap();
        assert_eq!(
            row.insert_statement("users"),
            "INSERT INTO users (id,name) VALUES (3,'x');"
        );
    }
}
