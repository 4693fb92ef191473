//! Row normalization: MySQL result rows to JSON maps.
//!
//! Every tool returns rows as `{column name -> scalar}` maps, keyed in the
//! order the database reported the columns. Scalars use the JSON value
//! kinds directly: integers and floats as numbers, text as strings, SQL
//! NULL as null. Types JSON cannot carry natively are rendered as their
//! canonical string forms (decimals, dates, times); binary columns become
//! lossy UTF-8 strings.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Map, Value};
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// Convert one row into an ordered column-name -> scalar map.
pub fn row_to_map(row: &MySqlRow) -> Map<String, Value> {
    let mut map = Map::new();
    for (idx, column) in row.columns().iter().enumerate() {
        map.insert(column.name().to_string(), column_to_json(row, idx));
    }
    map
}

/// Convert a full result set, one map per row.
pub fn rows_to_list(rows: &[MySqlRow]) -> Vec<Value> {
    rows.iter().map(|row| Value::Object(row_to_map(row))).collect()
}

fn column_to_json(row: &MySqlRow, idx: usize) -> Value {
    match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(_) => {}
        Err(_) => return Value::Null,
    }

    let type_name = row.columns()[idx].type_info().name().to_uppercase();

    decode_typed(row, idx, &type_name)
        // Unknown or mismatched type: fall back to text, then raw bytes.
        .or_else(|| row.try_get::<String, _>(idx).ok().map(Value::String))
        .or_else(|| row.try_get::<Vec<u8>, _>(idx).ok().map(|b| bytes_to_json(&b)))
        .unwrap_or(Value::Null)
}

fn decode_typed(row: &MySqlRow, idx: usize, type_name: &str) -> Option<Value> {
    match type_name {
        "BOOLEAN" => row.try_get::<bool, _>(idx).ok().map(Value::Bool),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => row
            .try_get::<i64, _>(idx)
            .ok()
            .map(|v| Value::Number(v.into())),
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" | "YEAR" | "BIT" => row
            .try_get::<u64, _>(idx)
            .ok()
            .map(|v| Value::Number(v.into())),
        "FLOAT" => float_to_json(row.try_get::<f32, _>(idx).ok()? as f64),
        "DOUBLE" => float_to_json(row.try_get::<f64, _>(idx).ok()?),
        "DECIMAL" => row
            .try_get::<rust_decimal::Decimal, _>(idx)
            .ok()
            .map(|v| Value::String(v.to_string())),
        "DATE" => row
            .try_get::<NaiveDate, _>(idx)
            .ok()
            .map(|v| Value::String(v.to_string())),
        "TIME" => row
            .try_get::<NaiveTime, _>(idx)
            .ok()
            .map(|v| Value::String(v.to_string())),
        "DATETIME" => row
            .try_get::<NaiveDateTime, _>(idx)
            .ok()
            .map(|v| Value::String(v.to_string())),
        "TIMESTAMP" => row
            .try_get::<DateTime<Utc>, _>(idx)
            .ok()
            .map(|v| Value::String(v.to_rfc3339())),
        "JSON" => row.try_get::<Value, _>(idx).ok(),
        "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET" => {
            row.try_get::<String, _>(idx).ok().map(Value::String)
        }
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => row
            .try_get::<Vec<u8>, _>(idx)
            .ok()
            .map(|b| bytes_to_json(&b)),
        _ => None,
    }
}

fn float_to_json(value: f64) -> Option<Value> {
    // NaN/inf have no JSON representation; report them as null.
    serde_json::Number::from_f64(value).map(Value::Number)
}

pub(crate) fn bytes_to_json(bytes: &[u8]) -> Value {
    Value::String(String::from_utf8_lossy(bytes).into_owned())
}
