//! SQL value types and literal coercion.
//!
//! Rows arrive from the driver as [`SqlValue`]s. Before they are embedded in an
//! `INSERT` statement they pass through [`coerce`], which folds empty values
//! into the NULL marker, flattens fixed-point numbers and temporal values, and
//! escapes backslashes.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Format used for every temporal literal.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single value read from the source database.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL. After coercion this is also the NULL marker.
    Null,

    /// Boolean value.
    Bool(bool),

    /// 16-bit signed integer (smallint).
    I16(i16),

    /// 32-bit signed integer (integer).
    I32(i32),

    /// 64-bit signed integer (bigint).
    I64(i64),

    /// 32-bit floating point (float).
    F32(f32),

    /// 64-bit floating point (double precision).
    F64(f64),

    /// Fixed-point value (numeric/decimal).
    Decimal(Decimal),

    /// Text data.
    String(String),

    /// Binary data (untyped blobs).
    Bytes(Vec<u8>),

    /// Timestamp without timezone.
    DateTime(NaiveDateTime),

    /// Date without time component.
    Date(NaiveDate),

    /// Time without date component.
    Time(NaiveTime),
}

/// How [`coerce_with`] decides that a value becomes the NULL marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullPolicy {
    /// Any falsy value (NULL, zero, false, empty text or bytes) becomes NULL.
    ///
    /// This matches the output of earlier exports and is the default, even
    /// though it turns a stored `0` or `''` into NULL.
    #[default]
    Truthiness,

    /// Only a real SQL NULL becomes NULL.
    Strict,
}

impl SqlValue {
    /// Check if this value is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Check if this value is falsy: NULL, `false`, numeric zero, or empty.
    pub fn is_falsy(&self) -> bool {
        match self {
            SqlValue::Null => true,
            SqlValue::Bool(b) => !b,
            SqlValue::I16(v) => *v == 0,
            SqlValue::I32(v) => *v == 0,
            SqlValue::I64(v) => *v == 0,
            SqlValue::F32(v) => *v == 0.0,
            SqlValue::F64(v) => *v == 0.0,
            SqlValue::Decimal(d) => d.is_zero(),
            SqlValue::String(s) => s.is_empty(),
            SqlValue::Bytes(b) => b.is_empty(),
            SqlValue::DateTime(_) | SqlValue::Date(_) | SqlValue::Time(_) => false,
        }
    }

    /// Text content with CHAR padding removed, for catalog columns.
    ///
    /// Text blobs that the driver hands back as bytes are decoded as UTF-8.
    pub fn as_trimmed_str(&self) -> Option<String> {
        match self {
            SqlValue::String(s) => Some(s.trim().to_string()),
            SqlValue::Bytes(b) => Some(String::from_utf8_lossy(b).trim().to_string()),
            _ => None,
        }
    }

    /// Integer content, for catalog columns.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::I16(v) => Some(i64::from(*v)),
            SqlValue::I32(v) => Some(i64::from(*v)),
            SqlValue::I64(v) => Some(*v),
            SqlValue::Bool(b) => Some(i64::from(*b)),
            SqlValue::Decimal(d) => d.to_i64(),
            SqlValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for SqlValue {
    /// Raw text of the value, without quoting or quote escaping.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            SqlValue::I16(v) => write!(f, "{}", v),
            SqlValue::I32(v) => write!(f, "{}", v),
            SqlValue::I64(v) => write!(f, "{}", v),
            SqlValue::F32(v) => write!(f, "{}", v),
            SqlValue::F64(v) => write!(f, "{}", v),
            SqlValue::Decimal(d) => write!(f, "{}", d),
            SqlValue::String(s) => f.write_str(s),
            SqlValue::Bytes(b) => f.write_str(&hex::encode(b)),
            SqlValue::DateTime(dt) => write!(f, "{}", dt.format(TIMESTAMP_FORMAT)),
            SqlValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            SqlValue::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i16> for SqlValue {
    fn from(v: i16) -> Self {
        SqlValue::I16(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::I32(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::I64(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::F64(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::String(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::String(v.to_string())
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::DateTime(v)
    }
}

/// Coerce a value for literal embedding using [`NullPolicy::Truthiness`].
pub fn coerce(value: SqlValue) -> SqlValue {
    coerce_with(value, NullPolicy::Truthiness)
}

/// Coerce a value for literal embedding.
///
/// - NULL (and, under [`NullPolicy::Truthiness`], any falsy value) → `Null`
/// - fixed-point → `F64`
/// - date/time/timestamp → `String` formatted `YYYY-MM-DD HH:MM:SS`
/// - text → backslashes doubled
/// - everything else unchanged
pub fn coerce_with(value: SqlValue, policy: NullPolicy) -> SqlValue {
    let is_null = match policy {
        NullPolicy::Truthiness => value.is_falsy(),
        NullPolicy::Strict => value.is_null(),
    };
    if is_null {
        return SqlValue::Null;
    }

    match value {
        SqlValue::Decimal(d) => d
            .to_f64()
            .map(SqlValue::F64)
            .unwrap_or_else(|| SqlValue::String(d.to_string())),
        SqlValue::DateTime(dt) => SqlValue::String(dt.format(TIMESTAMP_FORMAT).to_string()),
        SqlValue::Date(d) => SqlValue::String(format!("{} 00:00:00", d.format("%Y-%m-%d"))),
        // Times carry no date; anchor them at 1900-01-01.
        SqlValue::Time(t) => SqlValue::String(format!("1900-01-01 {}", t.format("%H:%M:%S"))),
        SqlValue::String(s) => SqlValue::String(s.replace('\\', "\\\\")),
        other => other,
    }
}
