//! Schema metadata types for relations and their columns.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::typemap::{self, FieldType};

/// A user table read from the system catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Table name with the catalog's CHAR padding removed.
    pub name: String,
}

impl Relation {
    /// Create a relation from a (possibly padded) catalog name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Raw field metadata from `RDB$FIELDS`, as the engine stores it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    /// `RDB$FIELD_TYPE` code.
    pub field_type: i16,

    /// `RDB$FIELD_SUB_TYPE` (fixed-point kind or blob subtype).
    pub sub_type: i16,

    /// `RDB$FIELD_PRECISION`.
    pub precision: i16,

    /// `RDB$FIELD_SCALE` (zero or negative).
    pub scale: i16,

    /// `RDB$FIELD_LENGTH` in bytes.
    pub length: i32,

    /// `RDB$BYTES_PER_CHARACTER` of the column's character set.
    pub bytes_per_char: i16,

    /// `RDB$COMPUTED_SOURCE`, when the column is computed.
    pub computed_source: Option<String>,
}

impl FieldMeta {
    /// Resolve the field type code.
    pub fn kind(&self) -> FieldType {
        FieldType::from_code(self.field_type)
    }

    /// Whether values of this field are scaled integers (NUMERIC/DECIMAL).
    pub fn is_fixed_point(&self) -> bool {
        self.kind().is_integer() && (self.scale < 0 || matches!(self.sub_type, 1 | 2))
    }

    /// Portable SQL type for this field.
    pub fn sql_type(&self) -> String {
        typemap::map_type(
            self.field_type,
            self.sub_type,
            self.precision,
            self.scale,
            self.length,
            self.bytes_per_char,
            self.computed_source.as_deref(),
        )
    }
}

/// One column of a relation, in catalog field-position order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,

    /// Portable type declaration (e.g. `VARCHAR(50)`).
    pub sql_type: String,

    /// Whether the column is declared NOT NULL.
    pub required: bool,

    /// Default clause as written in the catalog (e.g. `DEFAULT 0`).
    pub default: Option<String>,

    /// Engine metadata the portable type was derived from.
    pub field: FieldMeta,
}

impl ColumnDescriptor {
    /// Build a descriptor, deriving the portable type from the field metadata.
    pub fn new(
        name: impl AsRef<str>,
        field: FieldMeta,
        required: bool,
        default: Option<String>,
    ) -> Self {
        let default = default
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Self {
            name: name.as_ref().trim().to_string(),
            sql_type: field.sql_type(),
            required,
            default,
            field,
        }
    }

    /// Whether the column is computed rather than stored.
    pub fn is_computed(&self) -> bool {
        self.sql_type.starts_with("COMPUTED BY ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_trims_padding() {
        let rel = Relation::new("EMPLOYEE                       ");
        assert_eq!(rel.name, "EMPLOYEE");
        assert_eq!(rel.to_string(), "EMPLOYEE");
    }

    #[test]
    fn test_descriptor_derives_type() {
        let field = FieldMeta {
            field_type: 37,
            length: 60,
            bytes_per_char: 4,
            ..Default::default()
        };
        let col = ColumnDescriptor::new("FIRST_NAME ", field, true, None);
        assert_eq!(col.name, "FIRST_NAME");
        assert_eq!(col.sql_type, "VARCHAR(15)");
        assert!(col.required);
        assert!(!col.is_computed());
    }

    #[test]
    fn test_blank_default_is_absent() {
        let field = FieldMeta {
            field_type: 8,
            ..Default::default()
        };
        let col = ColumnDescriptor::new("QTY", field.clone(), false, Some("   ".into()));
        assert_eq!(col.default, None);

        let col = ColumnDescriptor::new("QTY", field, false, Some(" DEFAULT 0 ".into()));
        assert_eq!(col.default.as_deref(), Some("DEFAULT 0"));
    }

    #[test]
    fn test_fixed_point_detection() {
        let numeric = FieldMeta {
            field_type: 16,
            sub_type: 1,
            precision: 18,
            scale: -2,
            ..Default::default()
        };
        assert!(numeric.is_fixed_point());

        let plain = FieldMeta {
            field_type: 8,
            ..Default::default()
        };
        assert!(!plain.is_fixed_point());

        let text = FieldMeta {
            field_type: 37,
            sub_type: 1,
            ..Default::default()
        };
        assert!(!text.is_fixed_point());
    }
}
