//! Firebird catalog reader.
//!
//! Reads the user tables and their column definitions from the `RDB$` system
//! relations, and the rows of a table, over any [`Connection`].

pub mod firebird;

pub use firebird::{connect, FirebirdConnection};

use rust_decimal::Decimal;
use tracing::debug;

use crate::core::{ColumnDescriptor, Connection, FieldMeta, Relation, Row, SqlValue};
use crate::error::{DumpError, Result};
use crate::typemap::FieldType;

/// User tables: not system-flagged, not views, alphabetical.
pub const LIST_TABLES_SQL: &str = r#"
    SELECT RDB$RELATION_NAME
    FROM RDB$RELATIONS
    WHERE (RDB$SYSTEM_FLAG <> 1 OR RDB$SYSTEM_FLAG IS NULL)
      AND RDB$VIEW_BLR IS NULL
    ORDER BY RDB$RELATION_NAME
"#;

/// Label used in errors raised while listing tables.
pub const LIST_TABLES_LABEL: &str = "RDB$RELATIONS";

/// Escape a SQL string literal value.
/// Doubles single quotes: `O'Brien` -> `O''Brien`
fn escape_sql_string(s: &str) -> String {
    s.replace('\'', "''")
}

/// Quote an identifier in double quotes, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Column metadata query for one relation, in field-position order.
fn describe_table_sql(name: &str) -> String {
    format!(
        r#"
        SELECT
            rf.RDB$FIELD_NAME,
            f.RDB$FIELD_TYPE,
            f.RDB$FIELD_SUB_TYPE,
            f.RDB$FIELD_PRECISION,
            f.RDB$FIELD_SCALE,
            f.RDB$FIELD_LENGTH,
            cs.RDB$BYTES_PER_CHARACTER,
            f.RDB$COMPUTED_SOURCE,
            COALESCE(rf.RDB$NULL_FLAG, f.RDB$NULL_FLAG),
            COALESCE(rf.RDB$DEFAULT_SOURCE, f.RDB$DEFAULT_SOURCE)
        FROM RDB$RELATION_FIELDS rf
        JOIN RDB$FIELDS f ON f.RDB$FIELD_NAME = rf.RDB$FIELD_SOURCE
        LEFT JOIN RDB$CHARACTER_SETS cs ON cs.RDB$CHARACTER_SET_ID = f.RDB$CHARACTER_SET_ID
        WHERE rf.RDB$RELATION_NAME = '{}'
        ORDER BY rf.RDB$FIELD_POSITION
        "#,
        escape_sql_string(name)
    )
}

/// List user tables, ordered by name.
pub async fn list_tables<C: Connection + ?Sized>(conn: &mut C) -> Result<Vec<Relation>> {
    let rows = conn
        .query(LIST_TABLES_SQL)
        .await
        .map_err(|e| DumpError::catalog(LIST_TABLES_LABEL, e.to_string()))?;

    let tables: Vec<Relation> = rows
        .iter()
        .filter_map(|row| row.first().and_then(SqlValue::as_trimmed_str))
        .filter(|name| !name.is_empty())
        .map(Relation::new)
        .collect();

    debug!("Found {} user tables", tables.len());
    Ok(tables)
}

/// Describe the columns of a table, in catalog field-position order.
pub async fn describe_table<C: Connection + ?Sized>(
    conn: &mut C,
    table: &Relation,
) -> Result<Vec<ColumnDescriptor>> {
    let rows = conn
        .query(&describe_table_sql(&table.name))
        .await
        .map_err(|e| DumpError::catalog(&table.name, e.to_string()))?;

    let columns = rows
        .iter()
        .map(|row| column_from_row(&table.name, row))
        .collect::<Result<Vec<_>>>()?;

    if columns.is_empty() {
        return Err(DumpError::catalog(&table.name, "no columns found"));
    }

    debug!("Loaded {} columns for {}", columns.len(), table);
    Ok(columns)
}

/// Read every row of a table, values in field-position order.
pub async fn fetch_rows<C: Connection + ?Sized>(conn: &mut C, table: &Relation) -> Result<Vec<Row>> {
    let sql = format!("SELECT * FROM {}", quote_ident(&table.name));
    let rows = conn
        .query(&sql)
        .await
        .map_err(|e| DumpError::dump(&table.name, e.to_string()))?;

    debug!("Read {} rows from {}", rows.len(), table);
    Ok(rows)
}

/// Give raw driver values the types their columns declare.
///
/// The driver reports every integer as 64-bit, every temporal value as a
/// timestamp and fixed-point values as doubles; this narrows them using the
/// column metadata.
pub fn decode_row(table: &Relation, row: Row, columns: &[ColumnDescriptor]) -> Result<Row> {
    if row.len() != columns.len() {
        return Err(DumpError::dump(
            &table.name,
            format!(
                "row has {} values but the table has {} columns",
                row.len(),
                columns.len()
            ),
        ));
    }

    Ok(row
        .into_iter()
        .zip(columns)
        .map(|(value, column)| decode_value(value, &column.field))
        .collect())
}

fn decode_value(value: SqlValue, field: &FieldMeta) -> SqlValue {
    if field.is_fixed_point() {
        return match value {
            SqlValue::F64(f) => Decimal::try_from(f)
                .map(SqlValue::Decimal)
                .unwrap_or(SqlValue::F64(f)),
            other => other,
        };
    }

    match (field.kind(), value) {
        (FieldType::Short, SqlValue::I64(v)) => i16::try_from(v)
            .map(SqlValue::I16)
            .unwrap_or(SqlValue::I64(v)),
        (FieldType::Long, SqlValue::I64(v)) => i32::try_from(v)
            .map(SqlValue::I32)
            .unwrap_or(SqlValue::I64(v)),
        (FieldType::Float, SqlValue::F64(v)) => SqlValue::F32(v as f32),
        (FieldType::Date, SqlValue::DateTime(dt)) => SqlValue::Date(dt.date()),
        (FieldType::Time, SqlValue::DateTime(dt)) => SqlValue::Time(dt.time()),
        (FieldType::Blob, SqlValue::Bytes(b)) if field.sub_type == 1 => {
            SqlValue::String(String::from_utf8_lossy(&b).into_owned())
        }
        (_, other) => other,
    }
}

fn column_from_row(table: &str, row: &Row) -> Result<ColumnDescriptor> {
    let text = |idx: usize| row.get(idx).and_then(SqlValue::as_trimmed_str);
    let int = |idx: usize| row.get(idx).and_then(SqlValue::as_i64).unwrap_or(0);

    let name = text(0)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| DumpError::catalog(table, "column without a name"))?;

    let out_of_range = |what: &str, value: i64| {
        DumpError::catalog(
            table,
            format!("{} {} of column {} is out of range", what, value, name),
        )
    };
    let small = |idx: usize, what: &str| {
        let value = int(idx);
        i16::try_from(value).map_err(|_| out_of_range(what, value))
    };
    let length = int(5);

    let field = FieldMeta {
        field_type: small(1, "field type")?,
        sub_type: small(2, "sub type")?,
        precision: small(3, "precision")?,
        scale: small(4, "scale")?,
        length: i32::try_from(length).map_err(|_| out_of_range("length", length))?,
        bytes_per_char: small(6, "bytes per character")?,
        computed_source: text(7).filter(|s| !s.is_empty()),
    };
    let required = int(8) == 1;
    let default = text(9);

    Ok(ColumnDescriptor::new(name, field, required, default))
}
