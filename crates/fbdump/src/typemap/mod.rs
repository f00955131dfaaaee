//! Type mapping from Firebird catalog metadata to portable SQL.

/// Firebird `RDB$FIELD_TYPE` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Short,
    Long,
    Quad,
    Float,
    DFloat,
    Date,
    Time,
    Text,
    Int64,
    Boolean,
    Dec16,
    Dec34,
    Int128,
    Double,
    TimeTz,
    TimestampTz,
    Timestamp,
    Varying,
    CString,
    Blob,
    Unknown(i16),
}

impl FieldType {
    /// Resolve a catalog type code.
    pub fn from_code(code: i16) -> Self {
        match code {
            7 => FieldType::Short,
            8 => FieldType::Long,
            9 => FieldType::Quad,
            10 => FieldType::Float,
            11 => FieldType::DFloat,
            12 => FieldType::Date,
            13 => FieldType::Time,
            14 => FieldType::Text,
            16 => FieldType::Int64,
            23 => FieldType::Boolean,
            24 => FieldType::Dec16,
            25 => FieldType::Dec34,
            26 => FieldType::Int128,
            27 => FieldType::Double,
            28 => FieldType::TimeTz,
            29 => FieldType::TimestampTz,
            35 => FieldType::Timestamp,
            37 => FieldType::Varying,
            40 => FieldType::CString,
            261 => FieldType::Blob,
            other => FieldType::Unknown(other),
        }
    }

    /// The catalog type code.
    pub fn code(self) -> i16 {
        match self {
            FieldType::Short => 7,
            FieldType::Long => 8,
            FieldType::Quad => 9,
            FieldType::Float => 10,
            FieldType::DFloat => 11,
            FieldType::Date => 12,
            FieldType::Time => 13,
            FieldType::Text => 14,
            FieldType::Int64 => 16,
            FieldType::Boolean => 23,
            FieldType::Dec16 => 24,
            FieldType::Dec34 => 25,
            FieldType::Int128 => 26,
            FieldType::Double => 27,
            FieldType::TimeTz => 28,
            FieldType::TimestampTz => 29,
            FieldType::Timestamp => 35,
            FieldType::Varying => 37,
            FieldType::CString => 40,
            FieldType::Blob => 261,
            FieldType::Unknown(code) => code,
        }
    }

    /// Integer storage types, which double as NUMERIC/DECIMAL storage.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            FieldType::Short | FieldType::Long | FieldType::Int64 | FieldType::Int128
        )
    }

    /// Digits an integer type can hold, used when the catalog has no precision.
    fn default_precision(self) -> i16 {
        match self {
            FieldType::Short => 4,
            FieldType::Long => 9,
            FieldType::Int64 => 18,
            FieldType::Int128 => 38,
            _ => 0,
        }
    }
}

/// Map Firebird field metadata to a portable SQL type declaration.
///
/// `scale` is the catalog value (zero or negative). `length` is in bytes and is
/// divided by `bytes_per_char` for character types. A VARCHAR column with a
/// non-blank `computed_source` maps to `COMPUTED BY <expression>`. Codes
/// outside the table map to `UNKNOWN(<code>)`.
pub fn map_type(
    field_type: i16,
    sub_type: i16,
    precision: i16,
    scale: i16,
    length: i32,
    bytes_per_char: i16,
    computed_source: Option<&str>,
) -> String {
    let kind = FieldType::from_code(field_type);

    match kind {
        FieldType::Short | FieldType::Long | FieldType::Int64 | FieldType::Int128 => {
            let p = if precision > 0 {
                precision
            } else {
                kind.default_precision()
            };
            let s = -i32::from(scale);
            match sub_type {
                1 => format!("NUMERIC({}, {})", p, s),
                2 => format!("DECIMAL({}, {})", p, s),
                _ if scale < 0 => format!("NUMERIC({}, {})", p, s),
                _ => match kind {
                    FieldType::Short => "SMALLINT".to_string(),
                    FieldType::Long => "INTEGER".to_string(),
                    FieldType::Int64 => "BIGINT".to_string(),
                    _ => "INT128".to_string(),
                },
            }
        }
        FieldType::Quad => "BIGINT".to_string(),

        FieldType::Float => "FLOAT".to_string(),
        FieldType::DFloat | FieldType::Double => "DOUBLE PRECISION".to_string(),
        FieldType::Dec16 => "DECFLOAT(16)".to_string(),
        FieldType::Dec34 => "DECFLOAT(34)".to_string(),

        FieldType::Date => "DATE".to_string(),
        FieldType::Time => "TIME".to_string(),
        FieldType::TimeTz => "TIME WITH TIME ZONE".to_string(),
        FieldType::Timestamp => "TIMESTAMP".to_string(),
        FieldType::TimestampTz => "TIMESTAMP WITH TIME ZONE".to_string(),

        FieldType::Boolean => "BOOLEAN".to_string(),

        FieldType::Text => format!("CHAR({})", char_length(length, bytes_per_char)),
        FieldType::Varying => match computed_source.map(str::trim) {
            Some(expr) if !expr.is_empty() => format!("COMPUTED BY {}", expr),
            _ => format!("VARCHAR({})", char_length(length, bytes_per_char)),
        },
        FieldType::CString => format!("VARCHAR({})", char_length(length, bytes_per_char)),

        FieldType::Blob => format!("BLOB SUB_TYPE {}", sub_type),

        FieldType::Unknown(code) => format!("UNKNOWN({})", code),
    }
}

/// Character count of a character column.
fn char_length(length: i32, bytes_per_char: i16) -> i32 {
    if bytes_per_char > 0 {
        length / i32::from(bytes_per_char)
    } else {
        length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(field_type: i16) -> String {
        map_type(field_type, 0, 0, 0, 0, 1, None)
    }

    #[test]
    fn test_integer_types() {
        assert_eq!(plain(7), "SMALLINT");
        assert_eq!(plain(8), "INTEGER");
        assert_eq!(plain(16), "BIGINT");
        assert_eq!(plain(26), "INT128");
        assert_eq!(plain(9), "BIGINT");
    }

    #[test]
    fn test_fixed_point_types() {
        assert_eq!(map_type(8, 1, 9, -2, 4, 0, None), "NUMERIC(9, 2)");
        assert_eq!(map_type(16, 2, 18, -4, 8, 0, None), "DECIMAL(18, 4)");
        assert_eq!(map_type(7, 1, 4, -1, 2, 0, None), "NUMERIC(4, 1)");
        // Dialect 1 style: scaled integer with no subtype
        assert_eq!(map_type(16, 0, 0, -3, 8, 0, None), "NUMERIC(18, 3)");
        // Missing precision falls back to the storage width
        assert_eq!(map_type(8, 2, 0, -2, 4, 0, None), "DECIMAL(9, 2)");
    }

    #[test]
    fn test_float_types() {
        assert_eq!(plain(10), "FLOAT");
        assert_eq!(plain(11), "DOUBLE PRECISION");
        assert_eq!(plain(27), "DOUBLE PRECISION");
        assert_eq!(plain(24), "DECFLOAT(16)");
        assert_eq!(plain(25), "DECFLOAT(34)");
    }

    #[test]
    fn test_datetime_types() {
        assert_eq!(plain(12), "DATE");
        assert_eq!(plain(13), "TIME");
        assert_eq!(plain(35), "TIMESTAMP");
        assert_eq!(plain(28), "TIME WITH TIME ZONE");
        assert_eq!(plain(29), "TIMESTAMP WITH TIME ZONE");
    }

    #[test]
    fn test_character_types() {
        assert_eq!(map_type(14, 0, 0, 0, 10, 1, None), "CHAR(10)");
        assert_eq!(map_type(14, 0, 0, 0, 40, 4, None), "CHAR(10)");
        assert_eq!(map_type(37, 0, 0, 0, 50, 1, None), "VARCHAR(50)");
        assert_eq!(map_type(37, 0, 0, 0, 200, 4, None), "VARCHAR(50)");
        assert_eq!(map_type(40, 0, 0, 0, 32, 1, None), "VARCHAR(32)");
        // No character set info: length is taken as-is
        assert_eq!(map_type(37, 0, 0, 0, 25, 0, None), "VARCHAR(25)");
    }

    #[test]
    fn test_computed_varchar() {
        assert_eq!(
            map_type(37, 0, 0, 0, 37, 1, Some("(last_name || ', ' || first_name)")),
            "COMPUTED BY (last_name || ', ' || first_name)"
        );
        assert_eq!(map_type(37, 0, 0, 0, 20, 1, Some("  ")), "VARCHAR(20)");
    }

    #[test]
    fn test_blob_and_boolean() {
        assert_eq!(map_type(261, 0, 0, 0, 8, 0, None), "BLOB SUB_TYPE 0");
        assert_eq!(map_type(261, 1, 0, 0, 8, 0, None), "BLOB SUB_TYPE 1");
        assert_eq!(plain(23), "BOOLEAN");
    }

    #[test]
    fn test_unknown_code_is_placeholder() {
        assert_eq!(plain(45), "UNKNOWN(45)");
        assert!(plain(-1).contains("-1"));
    }

    #[test]
    fn test_mapping_is_stable() {
        let first = map_type(16, 1, 15, -2, 8, 0, None);
        let second = map_type(16, 1, 15, -2, 8, 0, None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_code_round_trip() {
        for code in [7, 8, 9, 10, 11, 12, 13, 14, 16, 23, 24, 25, 26, 27, 28, 29, 35, 37, 40, 261, 99] {
            assert_eq!(FieldType::from_code(code).code(), code);
        }
    }
}
