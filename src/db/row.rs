//! Row decoding for dynamic `SELECT *` results.
//!
//! Result sets come from tables whose shape is only known at runtime, so rows
//! cannot be mapped onto structs. Each column is decoded by its declared
//! PostgreSQL type and rendered into a JSON object in column order. A column
//! whose type has no mapping here decodes as its text form when possible and
//! as null otherwise.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};
use tracing::debug;
use uuid::Uuid;

/// Convert a batch of rows into JSON objects, one per row.
pub fn rows_to_json(rows: &[PgRow]) -> Vec<Value> {
    rows.iter().map(row_to_json).collect()
}

/// Convert a single row into a JSON object keyed by column name.
pub fn row_to_json(row: &PgRow) -> Value {
    let mut object = Map::with_capacity(row.columns().len());
    for (index, column) in row.columns().iter().enumerate() {
        let value = decode_value(row, index, column.type_info().name());
        object.insert(column.name().to_string(), value);
    }
    Value::Object(object)
}

fn decode_value(row: &PgRow, index: usize, type_name: &str) -> Value {
    let decoded = match type_name {
        "BOOL" => row
            .try_get::<Option<bool>, _>(index)
            .map(|v| v.map(Value::Bool)),
        "INT2" => row
            .try_get::<Option<i16>, _>(index)
            .map(|v| v.map(|n| Value::Number(n.into()))),
        "INT4" => row
            .try_get::<Option<i32>, _>(index)
            .map(|v| v.map(|n| Value::Number(n.into()))),
        "INT8" => row
            .try_get::<Option<i64>, _>(index)
            .map(|v| v.map(|n| Value::Number(n.into()))),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(index)
            .map(|v| v.and_then(|n| float_to_json(n as f64))),
        "FLOAT8" => row
            .try_get::<Option<f64>, _>(index)
            .map(|v| v.and_then(float_to_json)),
        // Rendered as a string to preserve exact precision.
        "NUMERIC" => row
            .try_get::<Option<Decimal>, _>(index)
            .map(|v| v.map(|d| Value::String(d.to_string()))),
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => row
            .try_get::<Option<String>, _>(index)
            .map(|v| v.map(Value::String)),
        "UUID" => row
            .try_get::<Option<Uuid>, _>(index)
            .map(|v| v.map(|u| Value::String(u.to_string()))),
        "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(index),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(index)
            .map(|v| v.map(|d| Value::String(d.to_string()))),
        "TIME" => row
            .try_get::<Option<NaiveTime>, _>(index)
            .map(|v| v.map(|t| Value::String(t.to_string()))),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(index)
            .map(|v| v.map(|ts| Value::String(ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()))),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(index)
            .map(|v| v.map(|ts| Value::String(ts.to_rfc3339()))),
        "BYTEA" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .map(|v| v.map(|b| Value::String(bytea_hex(&b)))),
        _ => row
            .try_get::<Option<String>, _>(index)
            .map(|v| v.map(Value::String)),
    };

    match decoded {
        Ok(Some(value)) => value,
        Ok(None) => Value::Null,
        Err(error) => {
            debug!(type_name, column = index, %error, "column did not decode, rendering null");
            Value::Null
        }
    }
}

/// PostgreSQL's textual BYTEA form: `\x` followed by lowercase hex.
fn bytea_hex(bytes: &[u8]) -> String {
    format!("\\x{}", hex::encode(bytes))
}

fn float_to_json(value: f64) -> Option<Value> {
    Number::from_f64(value).map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytea_hex_format() {
        assert_eq!(bytea_hex(&[0xde, 0xad, 0xbe, 0xef]), "\\xdeadbeef");
        assert_eq!(bytea_hex(&[]), "\\x");
    }

    #[test]
    fn test_float_to_json_finite() {
        assert_eq!(float_to_json(1.5), Some(Value::Number(Number::from_f64(1.5).unwrap())));
    }

    #[test]
    fn test_float_to_json_non_finite_is_none() {
        assert_eq!(float_to_json(f64::NAN), None);
        assert_eq!(float_to_json(f64::INFINITY), None);
    }
}
