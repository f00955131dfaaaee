//! SQL statement text for the export.
//!
//! Statements are assembled from clause lists joined by a separator, so there
//! is never a trailing separator to trim.

use crate::core::{ColumnDescriptor, SqlValue};

/// Render one coerced value as a SQL literal.
///
/// The NULL marker is emitted bare; every other value is single-quoted with
/// embedded quotes doubled.
pub fn literal(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => "NULL".to_string(),
        other => format!("'{}'", other.to_string().replace('\'', "''")),
    }
}

/// Column clause of a CREATE TABLE statement.
fn column_definition(column: &ColumnDescriptor) -> String {
    let mut parts = vec![column.name.clone(), column.sql_type.clone()];
    if column.required {
        parts.push("NOT NULL".to_string());
    }
    parts.push(
        column
            .default
            .clone()
            .unwrap_or_else(|| "DEFAULT NULL".to_string()),
    );
    parts.join(" ")
}

/// ``CREATE TABLE `name` (col type [NOT NULL] default, ...);``
pub fn build_create_table(name: &str, columns: &[ColumnDescriptor]) -> String {
    let definitions: Vec<String> = columns.iter().map(column_definition).collect();
    format!("CREATE TABLE `{}` ({});", name, definitions.join(", "))
}

/// `INSERT INTO name VALUES ('v1', NULL, ...);` from already-coerced values.
pub fn build_insert(name: &str, values: &[SqlValue]) -> String {
    let literals: Vec<String> = values.iter().map(literal).collect();
    format!("INSERT INTO {} VALUES ({});", name, literals.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{coerce, FieldMeta};

    fn column(name: &str, field_type: i16, length: i32, required: bool, default: Option<&str>) -> ColumnDescriptor {
        let field = FieldMeta {
            field_type,
            length,
            bytes_per_char: 1,
            ..Default::default()
        };
        ColumnDescriptor::new(name, field, required, default.map(String::from))
    }

    #[test]
    fn test_insert_null_unquoted() {
        assert_eq!(
            build_insert("t", &[SqlValue::Null, SqlValue::from("x")]),
            "INSERT INTO t VALUES (NULL, 'x');"
        );
    }

    #[test]
    fn test_insert_single_value() {
        assert_eq!(
            build_insert("COUNTRY", &[SqlValue::I32(5)]),
            "INSERT INTO COUNTRY VALUES ('5');"
        );
    }

    #[test]
    fn test_insert_escapes_quotes() {
        assert_eq!(
            build_insert("t", &[SqlValue::from("O'Brien")]),
            "INSERT INTO t VALUES ('O''Brien');"
        );
    }

    #[test]
    fn test_insert_after_coercion() {
        let values: Vec<SqlValue> = vec![SqlValue::I32(0), SqlValue::from("C:\\temp"), SqlValue::F64(2.5)]
            .into_iter()
            .map(coerce)
            .collect();
        assert_eq!(
            build_insert("t", &values),
            "INSERT INTO t VALUES (NULL, 'C:\\\\temp', '2.5');"
        );
    }

    #[test]
    fn test_create_table_single_column() {
        let sql = build_create_table("COUNTRY", &[column("COUNTRY", 37, 15, true, None)]);
        assert_eq!(
            sql,
            "CREATE TABLE `COUNTRY` (COUNTRY VARCHAR(15) NOT NULL DEFAULT NULL);"
        );
        assert!(!sql.contains(",)"));
        assert!(!sql.contains(", )"));
    }

    #[test]
    fn test_create_table_many_columns() {
        let sql = build_create_table(
            "JOB",
            &[
                column("JOB_CODE", 37, 5, true, None),
                column("JOB_GRADE", 7, 2, false, Some("DEFAULT 1")),
                column("JOB_TITLE", 14, 25, false, None),
            ],
        );
        assert_eq!(
            sql,
            "CREATE TABLE `JOB` (JOB_CODE VARCHAR(5) NOT NULL DEFAULT NULL, \
             JOB_GRADE SMALLINT DEFAULT 1, JOB_TITLE CHAR(25) DEFAULT NULL);"
        );
        assert!(!sql.contains(",)"));
        assert!(!sql.contains(", )"));
    }

    #[test]
    fn test_literal() {
        assert_eq!(literal(&SqlValue::Null), "NULL");
        assert_eq!(literal(&SqlValue::from("a")), "'a'");
        assert_eq!(literal(&SqlValue::Bool(true)), "'TRUE'");
    }
}
