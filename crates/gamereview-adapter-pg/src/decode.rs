//! Postgres row values to JSON scalars.

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use gamereview_query::QueryError;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Row, TypeInfo, ValueRef};

/// Decode every column of a row, in SELECT-list order.
pub fn decode_row(row: &PgRow) -> Result<Vec<Value>, QueryError> {
    (0..row.len()).map(|i| decode_column(row, i)).collect()
}

pub(crate) fn decode_column(row: &PgRow, index: usize) -> Result<Value, QueryError> {
    let type_name = {
        let raw = row.try_get_raw(index).map_err(decode_error)?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        raw.type_info().name().to_string()
    };

    let value = match type_name.as_str() {
        "INT2" => Value::from(row.try_get::<i16, _>(index).map_err(decode_error)?),
        "INT4" => Value::from(row.try_get::<i32, _>(index).map_err(decode_error)?),
        "INT8" => Value::from(row.try_get::<i64, _>(index).map_err(decode_error)?),
        "FLOAT4" => float(f64::from(row.try_get::<f32, _>(index).map_err(decode_error)?)),
        "FLOAT8" => float(row.try_get::<f64, _>(index).map_err(decode_error)?),
        "NUMERIC" => numeric(&row.try_get::<BigDecimal, _>(index).map_err(decode_error)?),
        "BOOL" => Value::Bool(row.try_get::<bool, _>(index).map_err(decode_error)?),
        "DATE" => Value::String(
            row.try_get::<NaiveDate, _>(index)
                .map_err(decode_error)?
                .format("%Y-%m-%d")
                .to_string(),
        ),
        "TIMESTAMP" => Value::String(
            row.try_get::<NaiveDateTime, _>(index)
                .map_err(decode_error)?
                .format("%Y-%m-%dT%H:%M:%S%.f")
                .to_string(),
        ),
        "TIMESTAMPTZ" => Value::String(
            row.try_get::<DateTime<Utc>, _>(index)
                .map_err(decode_error)?
                .to_rfc3339(),
        ),
        "TIME" => Value::String(
            row.try_get::<NaiveTime, _>(index)
                .map_err(decode_error)?
                .to_string(),
        ),
        "JSON" | "JSONB" => row.try_get::<Value, _>(index).map_err(decode_error)?,
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => {
            Value::String(row.try_get::<String, _>(index).map_err(decode_error)?)
        }
        _ => Value::Null,
    };
    Ok(value)
}

fn float(n: f64) -> Value {
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn numeric(n: &BigDecimal) -> Value {
    if n.is_integer()
        && let Some(i) = n.to_i64()
    {
        return Value::from(i);
    }
    match n.to_f64() {
        Some(f) => float(f),
        None => Value::String(n.to_string()),
    }
}

fn decode_error(e: sqlx::Error) -> QueryError {
    QueryError::Execution(format!("failed to decode column: {}", e))
}
