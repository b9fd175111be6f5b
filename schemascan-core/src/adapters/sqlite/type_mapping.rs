//! SQLite declared type to semantic column type conversion.
//!
//! SQLite uses a dynamic type system with type affinity. The rules care
//! about what the schema author declared (a `price VARCHAR(20)` column is a
//! finding even though SQLite would happily store numbers in it), so the
//! mapping follows the declared name first and falls back to the affinity
//! rules:
//! 1. Contains "INT" -> INTEGER affinity
//! 2. Contains "CHAR", "CLOB", or "TEXT" -> TEXT affinity
//! 3. Contains "BLOB" or no type specified -> BLOB affinity
//! 4. Contains "REAL", "FLOA", or "DOUB" -> REAL affinity
//! 5. Otherwise -> NUMERIC affinity

use crate::models::{ColumnType, DataType};

/// Maps a SQLite declared type to the semantic data type.
///
/// # Example
/// ```rust
/// use schemascan_core::adapters::sqlite::map_sqlite_type;
/// use schemascan_core::models::ColumnType;
///
/// let data_type = map_sqlite_type("DECIMAL(10,2)");
/// assert_eq!(data_type.kind, ColumnType::Decimal);
/// assert_eq!(data_type.precision, Some(10));
/// assert_eq!(data_type.scale, Some(2));
/// ```
pub fn map_sqlite_type(sqlite_type: &str) -> DataType {
    let type_upper = sqlite_type.trim().to_uppercase();
    let (base_type, precision, scale) = parse_type_parameters(&type_upper);

    let mut data_type = DataType::new(classify(&base_type), sqlite_type.trim());
    data_type.precision = precision;
    data_type.scale = scale;
    // SQLite accepts any parameters, e.g. DECIMAL(2,5)
    data_type.without_invalid_decimal_parameters()
}

fn classify(base_type: &str) -> ColumnType {
    // Empty declared type has BLOB affinity
    if base_type.is_empty() {
        return ColumnType::Other;
    }

    // Names SQLite's affinity rules would misclassify
    match base_type {
        "BOOLEAN" | "BOOL" => return ColumnType::Boolean,
        "DATE" | "TIME" | "DATETIME" | "TIMESTAMP" => return ColumnType::Temporal,
        "NUMERIC" | "DECIMAL" | "NUMBER" => return ColumnType::Decimal,
        _ => {}
    }

    if base_type.contains("INT") {
        return ColumnType::Integer;
    }
    if base_type.contains("CHAR") || base_type.contains("CLOB") || base_type.contains("TEXT") {
        return ColumnType::Text;
    }
    if base_type.contains("BLOB") {
        return ColumnType::Other;
    }
    if base_type.contains("REAL") || base_type.contains("FLOA") || base_type.contains("DOUB") {
        return ColumnType::Float;
    }
    if base_type.contains("DEC") || base_type.contains("NUM") {
        return ColumnType::Decimal;
    }
    if base_type.contains("DATE") || base_type.contains("TIME") {
        return ColumnType::Temporal;
    }
    if base_type == "STRING" {
        return ColumnType::Text;
    }

    ColumnType::Other
}

/// Splits a type string into base name and up to two numeric parameters.
///
/// # Examples
/// - "VARCHAR(255)" -> ("VARCHAR", Some(255), None)
/// - "DECIMAL(10, 2)" -> ("DECIMAL", Some(10), Some(2))
/// - "INTEGER" -> ("INTEGER", None, None)
fn parse_type_parameters(type_str: &str) -> (String, Option<u32>, Option<u32>) {
    let Some((base, rest)) = type_str.split_once('(') else {
        return (type_str.trim().to_string(), None, None);
    };
    let params = rest.split(')').next().unwrap_or_default();
    let mut numbers = params.split(',').map(|p| p.trim().parse::<u32>().ok());

    let precision = numbers.next().flatten();
    let scale = numbers.next().flatten();
    (base.trim().to_string(), precision, scale)
}
