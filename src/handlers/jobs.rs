// handlers/jobs.rs - /jobs handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::database::models::{Job, JobRepository, NewJob};
use crate::middleware::{ApiResponse, ApiResult, RequireAdmin};
use crate::server::AppState;
use crate::validation::Schema;

use super::{decode_body, into_object, validated_body, validated_query};

/// POST /jobs - create a job for an existing company (admin)
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Job> {
    let body = validated_body(body, Schema::JobNew)?;
    let job = state.jobs().create(decode_body::<NewJob>(body)?).await?;
    Ok(ApiResponse::created("job", job))
}

/// GET /jobs - list jobs, optionally filtered by titleLike, minSalary, hasEquity
pub async fn list(State(state): State<AppState>, Query(pairs): Query<Vec<(String, String)>>) -> ApiResult<Vec<Job>> {
    let filters = validated_query(pairs, Schema::JobSearch)?;
    let jobs = state.jobs().list(&filters).await?;
    Ok(ApiResponse::success("jobs", jobs))
}

/// GET /jobs/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Job> {
    let job = state.jobs().get(JobRepository::parse_id(&id)?).await?;
    Ok(ApiResponse::success("job", job))
}

/// PATCH /jobs/:id - title, salary and equity only (admin)
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Job> {
    let id = JobRepository::parse_id(&id)?;
    let body = validated_body(body, Schema::JobUpdate)?;
    let job = state.jobs().update(id, &into_object(body)?).await?;
    Ok(ApiResponse::success("job", job))
}

/// DELETE /jobs/:id (admin)
pub async fn remove(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<String> {
    state.jobs().remove(JobRepository::parse_id(&id)?).await?;
    Ok(ApiResponse::success("deleted", id))
}
