use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Column, PgPool, Row as _, TypeInfo};

use crate::database::manager::DatabaseError;

/// One result row, keyed by column name in select-list order.
pub type Row = Map<String, Value>;

/// Runs one parameterized statement. Values only ever travel in `params`;
/// `$N` in `sql` refers to `params[N - 1]`.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DatabaseError>;
}

#[async_trait]
impl QueryExecutor for PgPool {
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DatabaseError> {
        // Bind types follow the JSON value, and one statement text can carry a
        // null, an integer or a float in the same slot: never reuse a cached plan.
        let mut q = sqlx::query(sql).persistent(false);
        for value in params {
            q = bind_param(q, value);
        }

        let rows = q.fetch_all(self).await?;
        rows.iter().map(row_to_json).collect()
    }
}

/// Bind parameter to SQL query
fn bind_param<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        // INT8 null: assignment casts carry it into integer, numeric and text columns alike
        Value::Null => q.bind(None::<i64>),
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.clone()),
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()), // JSONB
    }
}

/// Convert database row to JSON
fn row_to_json(row: &PgRow) -> Result<Row, DatabaseError> {
    let mut record = Map::new();
    for (i, column) in row.columns().iter().enumerate() {
        let value = extract_column_value(row, i, column.type_info().name())?;
        record.insert(column.name().to_string(), value);
    }
    Ok(record)
}

/// Extract typed value from database column
fn extract_column_value(row: &PgRow, index: usize, type_name: &str) -> Result<Value, DatabaseError> {
    let value = match type_name {
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => row.try_get::<Option<String>, _>(index)?.map(Value::String),
        "INT2" => row.try_get::<Option<i16>, _>(index)?.map(Value::from),
        "INT4" => row.try_get::<Option<i32>, _>(index)?.map(Value::from),
        "INT8" => row.try_get::<Option<i64>, _>(index)?.map(Value::from),
        "FLOAT4" => row.try_get::<Option<f32>, _>(index)?.map(Value::from),
        "FLOAT8" => row.try_get::<Option<f64>, _>(index)?.map(Value::from),
        "NUMERIC" => row
            .try_get::<Option<rust_decimal::Decimal>, _>(index)?
            .and_then(|d| d.to_f64())
            .map(Value::from),
        "BOOL" => row.try_get::<Option<bool>, _>(index)?.map(Value::Bool),
        "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(index)?,
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)?
            .map(|t| Value::String(t.to_rfc3339())),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(index)?
            .map(|t| Value::String(t.to_string())),
        other => {
            tracing::warn!("Unhandled PostgreSQL type: {}", other);
            return Err(DatabaseError::QueryError(format!("unsupported column type {}", other)));
        }
    };
    Ok(value.unwrap_or(Value::Null))
}
