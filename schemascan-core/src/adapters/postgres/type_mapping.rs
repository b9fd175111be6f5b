//! PostgreSQL to semantic column type conversion.
//!
//! Maps the `data_type` / `udt_name` pair reported by
//! `information_schema.columns` onto [`ColumnType`], keeping a readable
//! declared type string for reports.

use crate::models::{ColumnType, DataType};

/// Maps a PostgreSQL column type to the semantic data type.
///
/// # Arguments
/// * `data_type` - `data_type` from information_schema
/// * `udt_name` - underlying type name from information_schema
/// * `character_maximum_length` - Maximum length for character types
/// * `numeric_precision` - Precision for numeric types
/// * `numeric_scale` - Scale for numeric types
///
/// # Example
/// ```rust
/// use schemascan_core::adapters::postgres::map_postgres_type;
/// use schemascan_core::models::ColumnType;
///
/// let data_type = map_postgres_type("numeric", "numeric", None, Some(10), Some(2));
/// assert_eq!(data_type.kind, ColumnType::Decimal);
/// assert_eq!(data_type.raw, "numeric(10,2)");
/// ```
pub fn map_postgres_type(
    data_type: &str,
    udt_name: &str,
    character_maximum_length: Option<i32>,
    numeric_precision: Option<i32>,
    numeric_scale: Option<i32>,
) -> DataType {
    let normalized = data_type.to_lowercase();

    let kind = match normalized.as_str() {
        "character varying" | "varchar" | "character" | "char" | "text" | "citext" => {
            ColumnType::Text
        }
        "smallint" | "int2" | "integer" | "int" | "int4" | "bigint" | "int8" => {
            ColumnType::Integer
        }
        "real" | "float4" | "double precision" | "float8" => ColumnType::Float,
        "numeric" | "decimal" => ColumnType::Decimal,
        "boolean" | "bool" => ColumnType::Boolean,
        "timestamp without time zone"
        | "timestamp with time zone"
        | "timestamp"
        | "timestamptz"
        | "date"
        | "time without time zone"
        | "time with time zone"
        | "time"
        | "timetz"
        | "interval" => ColumnType::Temporal,
        // money, bytea, json, uuid, arrays, enums, and domains
        _ => ColumnType::Other,
    };

    let to_u32 = |value: Option<i32>| value.and_then(|v| u32::try_from(v).ok());

    let (precision, scale, raw) = match kind {
        ColumnType::Decimal => {
            let precision = to_u32(numeric_precision);
            let scale = to_u32(numeric_scale);
            let raw = match (precision, scale) {
                (Some(p), Some(s)) => format!("{}({},{})", normalized, p, s),
                (Some(p), None) => format!("{}({})", normalized, p),
                _ => normalized.clone(),
            };
            (precision, scale, raw)
        }
        ColumnType::Text => {
            let length = to_u32(character_maximum_length);
            let raw = match length {
                Some(l) => format!("{}({})", normalized, l),
                None => normalized.clone(),
            };
            (length, None, raw)
        }
        _ => {
            let raw = if matches!(normalized.as_str(), "user-defined" | "array") {
                udt_name.to_string()
            } else {
                normalized.clone()
            };
            (None, None, raw)
        }
    };

    let mut mapped = DataType::new(kind, raw);
    mapped.precision = precision;
    mapped.scale = scale;
    // PostgreSQL 15 allows a scale above the precision, e.g. numeric(2,5)
    mapped.without_invalid_decimal_parameters()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_text_types() {
        let data_type = map_postgres_type("character varying", "varchar", Some(255), None, None);
        assert_eq!(data_type.kind, ColumnType::Text);
        assert_eq!(data_type.precision, Some(255));
        assert_eq!(data_type.raw, "character varying(255)");

        let data_type = map_postgres_type("text", "text", None, None, None);
        assert_eq!(data_type.kind, ColumnType::Text);
        assert_eq!(data_type.raw, "text");
    }

    #[test]
    fn test_map_numeric_types() {
        assert_eq!(
            map_postgres_type("integer", "int4", None, Some(32), Some(0)).kind,
            ColumnType::Integer
        );
        assert_eq!(
            map_postgres_type("double precision", "float8", None, Some(53), None).kind,
            ColumnType::Float
        );

        let data_type = map_postgres_type("numeric", "numeric", None, Some(12), Some(0));
        assert_eq!(data_type.kind, ColumnType::Decimal);
        assert_eq!(data_type.scale, Some(0));

        let data_type = map_postgres_type("numeric", "numeric", None, None, None);
        assert_eq!(data_type.kind, ColumnType::Decimal);
        assert_eq!(data_type.raw, "numeric");

        let data_type = map_postgres_type("numeric", "numeric", None, Some(2), Some(5));
        assert_eq!(data_type.kind, ColumnType::Decimal);
        assert_eq!((data_type.precision, data_type.scale), (None, None));
        assert_eq!(data_type.raw, "numeric(2,5)");
    }

    #[test]
    fn test_money_is_not_decimal() {
        assert_eq!(
            map_postgres_type("money", "money", None, None, None).kind,
            ColumnType::Other
        );
    }

    #[test]
    fn test_map_other_types() {
        assert_eq!(
            map_postgres_type("boolean", "bool", None, None, None).kind,
            ColumnType::Boolean
        );
        assert_eq!(
            map_postgres_type("timestamp with time zone", "timestamptz", None, None, None).kind,
            ColumnType::Temporal
        );

        let data_type = map_postgres_type("USER-DEFINED", "order_status", None, None, None);
        assert_eq!(data_type.kind, ColumnType::Other);
        assert_eq!(data_type.raw, "order_status");

        let data_type = map_postgres_type("ARRAY", "_int4", None, None, None);
        assert_eq!(data_type.raw, "_int4");
    }
}
