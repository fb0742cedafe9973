use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

/// Success envelope: `{ success: true, data?, message? }`.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Failure envelope: `{ success: false, error, code, details? }`.
#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

pub fn success<T>(data: T) -> Response
where
    T: Serialize,
{
    with_status(StatusCode::OK, data)
}

pub fn created<T>(data: T) -> Response
where
    T: Serialize,
{
    with_status(StatusCode::CREATED, data)
}

fn with_status<T>(status: StatusCode, data: T) -> Response
where
    T: Serialize,
{
    let body = ApiResponse {
        success: true,
        data: Some(data),
        message: None,
    };
    (status, Json(body)).into_response()
}

pub fn empty_success(message: impl Into<String>) -> Response {
    let body: ApiResponse<()> = ApiResponse {
        success: true,
        data: None,
        message: Some(message.into()),
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub fn error(
    code: &str,
    message: impl Into<String>,
    details: Option<Value>,
    status: StatusCode,
) -> Response {
    let body = ApiErrorResponse {
        success: false,
        error: message.into(),
        code: code.to_string(),
        details,
    };

    (status, Json(body)).into_response()
}
