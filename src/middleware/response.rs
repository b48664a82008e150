use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Successful response body `{ <key>: data }`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub key: &'static str,
    pub data: T,
    pub status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK with `data` under `key`
    pub fn success(key: &'static str, data: T) -> Self {
        Self {
            key,
            data,
            status_code: StatusCode::OK,
        }
    }

    /// 201 Created
    pub fn created(key: &'static str, data: T) -> Self {
        Self {
            key,
            data,
            status_code: StatusCode::CREATED,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": {
                            "message": "Failed to serialize response data",
                            "status": 500
                        }
                    })),
                )
                    .into_response();
            }
        };

        let mut body = Map::new();
        body.insert(self.key.to_string(), data_value);
        (self.status_code, Json(Value::Object(body))).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
