// handlers/mod.rs - Route handlers
//
// Reads are public; every write requires an admin token (see middleware::auth).

pub mod companies; // /companies
pub mod jobs;      // /jobs
pub mod root;      // / and /health

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::validation::{self, Schema};

/// Unwrap a JSON body and check it against `schema`.
pub(crate) fn validated_body(body: Result<Json<Value>, JsonRejection>, schema: Schema) -> Result<Value, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    validation::validate(&body, schema)?;
    Ok(body)
}

/// Validated body decoded into the insert type
pub(crate) fn decode_body<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::bad_request(e.to_string()))
}

pub(crate) fn into_object(body: Value) -> Result<Map<String, Value>, ApiError> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::bad_request("Request body must be a JSON object")),
    }
}

/// Query string pairs coerced and checked against a search schema
pub(crate) fn validated_query(pairs: Vec<(String, String)>, schema: Schema) -> Result<Map<String, Value>, ApiError> {
    let query = validation::coerce_query(pairs, schema);
    let value = Value::Object(query);
    validation::validate(&value, schema)?;
    into_object(value)
}
