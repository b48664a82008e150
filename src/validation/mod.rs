//! Request validation against JSON Schema documents embedded in the binary.

use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use thiserror::Error;

/// The request shapes the API accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    CompanyNew,
    CompanyUpdate,
    CompanySearch,
    JobNew,
    JobUpdate,
    JobSearch,
}

impl Schema {
    pub const ALL: [Schema; 6] = [
        Schema::CompanyNew,
        Schema::CompanyUpdate,
        Schema::CompanySearch,
        Schema::JobNew,
        Schema::JobUpdate,
        Schema::JobSearch,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Schema::CompanyNew => "companyNew",
            Schema::CompanyUpdate => "companyUpdate",
            Schema::CompanySearch => "companySearch",
            Schema::JobNew => "jobNew",
            Schema::JobUpdate => "jobUpdate",
            Schema::JobSearch => "jobSearch",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            Schema::CompanyNew => include_str!("schemas/companyNew.json"),
            Schema::CompanyUpdate => include_str!("schemas/companyUpdate.json"),
            Schema::CompanySearch => include_str!("schemas/companySearch.json"),
            Schema::JobNew => include_str!("schemas/jobNew.json"),
            Schema::JobUpdate => include_str!("schemas/jobUpdate.json"),
            Schema::JobSearch => include_str!("schemas/jobSearch.json"),
        }
    }

    /// The parsed schema document
    pub fn document(&self) -> Result<Value, ValidationError> {
        serde_json::from_str(self.source())
            .map_err(|e| ValidationError::single(format!("schema {} is malformed: {}", self.name(), e)))
    }
}

/// One message per violated constraint
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", messages.join("; "))]
pub struct ValidationError {
    pub messages: Vec<String>,
}

impl ValidationError {
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }
}

static VALIDATORS: Lazy<HashMap<Schema, Result<Validator, String>>> = Lazy::new(|| {
    Schema::ALL
        .iter()
        .map(|schema| (*schema, compile(*schema)))
        .collect()
});

fn compile(schema: Schema) -> Result<Validator, String> {
    let document = schema.document().map_err(|e| e.to_string())?;
    jsonschema::draft7::options()
        .should_validate_formats(true)
        .build(&document)
        .map_err(|e| {
            tracing::error!("Failed to compile schema {}: {}", schema.name(), e);
            format!("schema {} failed to compile", schema.name())
        })
}

/// Check `data` against `schema`, collecting every violation.
pub fn validate(data: &Value, schema: Schema) -> Result<(), ValidationError> {
    let validator = match VALIDATORS.get(&schema) {
        Some(Ok(validator)) => validator,
        Some(Err(message)) => return Err(ValidationError::single(message.clone())),
        None => return Err(ValidationError::single(format!("unknown schema {}", schema.name()))),
    };

    let messages: Vec<String> = validator.iter_errors(data).map(|e| e.to_string()).collect();
    if messages.is_empty() {
        Ok(())
    } else {
        tracing::debug!("{} rejected: {:?}", schema.name(), messages);
        Err(ValidationError { messages })
    }
}

/// Turn raw query-string pairs into typed JSON using the property types the
/// schema declares. Values that do not parse stay strings so validation
/// rejects them.
pub fn coerce_query(pairs: Vec<(String, String)>, schema: Schema) -> Map<String, Value> {
    let properties = schema
        .document()
        .ok()
        .and_then(|doc| doc.get("properties").cloned())
        .unwrap_or(Value::Null);

    let mut out = Map::new();
    for (key, raw) in pairs {
        let declared = properties
            .get(&key)
            .and_then(|p| p.get("type"))
            .and_then(Value::as_str);
        let value = match declared {
            Some("integer") => raw.parse::<i64>().map(Value::from).ok(),
            Some("number") => raw
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number),
            Some("boolean") => match raw.as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        };
        out.insert(key, value.unwrap_or(Value::String(raw)));
    }
    out
}
