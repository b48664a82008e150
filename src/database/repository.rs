use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::database::executor::{QueryExecutor, Row};
use crate::database::manager::DatabaseError;
use crate::database::models::ModelError;
use crate::filter::{build_set_clause, build_where_clause, ColumnMap, FilterPayload, FilterSpec, UpdatePayload};

/// Static description of one entity table.
#[derive(Debug)]
pub struct Table {
    /// Singular noun used in not-found messages
    pub label: &'static str,
    pub name: &'static str,
    pub key: &'static str,
    /// Select list with camelCase aliases, shared by SELECT and RETURNING
    pub columns: &'static str,
    pub order_by: &'static str,
}

/// Row access for one table, decoding rows into `T`.
pub struct Repository<T> {
    table: &'static Table,
    db: Arc<dyn QueryExecutor>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: DeserializeOwned,
{
    pub fn new(table: &'static Table, db: Arc<dyn QueryExecutor>) -> Self {
        Self {
            table,
            db,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn executor(&self) -> &dyn QueryExecutor {
        self.db.as_ref()
    }

    pub async fn select_any(&self, filters: &FilterPayload, spec: &FilterSpec) -> Result<Vec<T>, ModelError> {
        let fragment = build_where_clause(filters, spec);
        let sql = [
            format!("SELECT {}", self.table.columns),
            format!("FROM {}", self.table.name),
            fragment.where_sql(),
            format!("ORDER BY {}", self.table.order_by),
        ].into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ");
        tracing::debug!("select {}: {} ({} params)", self.table.name, sql, fragment.values.len());

        let rows = self.db.query(&sql, &fragment.values).await?;
        decode_rows(rows)
    }

    pub async fn exists(&self, key: &Value) -> Result<bool, ModelError> {
        let sql = format!(
            "SELECT {key} FROM {} WHERE {key} = $1",
            self.table.name,
            key = self.table.key
        );
        let rows = self.db.query(&sql, std::slice::from_ref(key)).await?;
        Ok(!rows.is_empty())
    }

    pub async fn select_404(&self, key: &Value) -> Result<T, ModelError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = $1",
            self.table.columns, self.table.name, self.table.key
        );
        let rows = self.db.query(&sql, std::slice::from_ref(key)).await?;
        self.first_or_404(rows, key)
    }

    /// INSERT the given (column, value) pairs and return the new row.
    pub async fn insert(&self, fields: Vec<(&'static str, Value)>) -> Result<T, ModelError> {
        let (columns, values): (Vec<&str>, Vec<Value>) = fields.into_iter().unzip();
        let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("${}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            self.table.name,
            columns.join(", "),
            placeholders.join(", "),
            self.table.columns
        );
        tracing::debug!("insert {}: {} params", self.table.name, values.len());

        let rows = self.db.query(&sql, &values).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DatabaseError::QueryError(format!("INSERT INTO {} returned no row", self.table.name)))?;
        decode_row(row)
    }

    /// Partial UPDATE of the row matching `key`; the key binds after the SET values.
    pub async fn update_404(&self, key: &Value, payload: &UpdatePayload, columns: &ColumnMap) -> Result<T, ModelError> {
        let fragment = build_set_clause(payload, columns)?;
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
            self.table.name,
            fragment.clause,
            self.table.key,
            fragment.next_param_index(),
            self.table.columns
        );
        tracing::debug!("update {}: {} ({} params)", self.table.name, sql, fragment.values.len() + 1);

        let mut params = fragment.values;
        params.push(key.clone());
        let rows = self.db.query(&sql, &params).await?;
        self.first_or_404(rows, key)
    }

    pub async fn delete_404(&self, key: &Value) -> Result<(), ModelError> {
        let sql = format!(
            "DELETE FROM {} WHERE {key} = $1 RETURNING {key}",
            self.table.name,
            key = self.table.key
        );
        let rows = self.db.query(&sql, std::slice::from_ref(key)).await?;
        if rows.is_empty() {
            return Err(self.not_found(key));
        }
        tracing::info!("Deleted {} {}", self.table.label, display_key(key));
        Ok(())
    }

    pub fn not_found(&self, key: &Value) -> ModelError {
        ModelError::NotFound(format!("No {}: {}", self.table.label, display_key(key)))
    }

    fn first_or_404(&self, rows: Vec<Row>, key: &Value) -> Result<T, ModelError> {
        match rows.into_iter().next() {
            Some(row) => decode_row(row),
            None => Err(self.not_found(key)),
        }
    }
}

pub fn decode_row<T: DeserializeOwned>(row: Row) -> Result<T, ModelError> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, ModelError> {
    rows.into_iter().map(decode_row).collect()
}

fn display_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
