// handlers/companies.rs - /companies handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde_json::{Map, Value};

use crate::database::models::{Company, CompanyDetail, NewCompany};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, RequireAdmin};
use crate::server::AppState;
use crate::validation::Schema;

use super::{decode_body, into_object, validated_body, validated_query};

/// POST /companies - create a company (admin)
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Company> {
    let body = validated_body(body, Schema::CompanyNew)?;
    let company = state.companies().create(decode_body::<NewCompany>(body)?).await?;
    Ok(ApiResponse::created("company", company))
}

/// GET /companies - list companies, optionally filtered by nameLike, minEmployees, maxEmployees
pub async fn list(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Vec<Company>> {
    let filters = validated_query(pairs, Schema::CompanySearch)?;
    check_employee_range(&filters)?;

    let companies = state.companies().list(&filters).await?;
    Ok(ApiResponse::success("companies", companies))
}

/// GET /companies/:handle - one company with its jobs
pub async fn get(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<CompanyDetail> {
    let company = state.companies().get(&handle).await?;
    Ok(ApiResponse::success("company", company))
}

/// PATCH /companies/:handle - partial update (admin)
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(handle): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Company> {
    let body = validated_body(body, Schema::CompanyUpdate)?;
    let company = state.companies().update(&handle, &into_object(body)?).await?;
    Ok(ApiResponse::success("company", company))
}

/// DELETE /companies/:handle (admin)
pub async fn remove(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> ApiResult<String> {
    state.companies().remove(&handle).await?;
    Ok(ApiResponse::success("deleted", handle))
}

fn check_employee_range(filters: &Map<String, Value>) -> Result<(), ApiError> {
    let min = filters.get("minEmployees").and_then(Value::as_i64);
    let max = filters.get("maxEmployees").and_then(Value::as_i64);
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(ApiError::bad_request(
            "Maximum Employees must be greater than minimum employees",
        )),
        _ => Ok(()),
    }
}
