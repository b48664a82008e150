use serde_json::Value;

use super::error::FilterError;
use super::types::{ColumnMap, SqlFragment, UpdatePayload};

/// Builds the assignment list of an `UPDATE ... SET` from a sparse payload.
///
/// `{firstName: "Aliya", age: 32}` becomes `"first_name"=$1, "age"=$2` with
/// values `["Aliya", 32]` when `firstName` maps to `first_name`. Nulls are
/// bound as-is so a caller can clear a column.
pub fn build_set_clause(payload: &UpdatePayload, columns: &ColumnMap) -> Result<SqlFragment, FilterError> {
    if payload.is_empty() {
        return Err(FilterError::EmptyUpdate);
    }

    let mut assignments = Vec::with_capacity(payload.len());
    let mut values: Vec<Value> = Vec::with_capacity(payload.len());

    for (field, value) in payload {
        let column = columns.column(field);
        validate_column_name(column)?;
        values.push(value.clone());
        assignments.push(format!("\"{}\"=${}", column, values.len()));
    }

    Ok(SqlFragment {
        clause: assignments.join(", "),
        values,
    })
}

// Column names are interpolated, so only plain identifiers get through.
fn validate_column_name(column: &str) -> Result<(), FilterError> {
    let mut chars = column.chars();
    let valid_start = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(FilterError::InvalidColumn(column.to_string()));
    }
    Ok(())
}
