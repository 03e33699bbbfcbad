//! `ApiError` → `IntoResponse`, the single mapping point for `spec.md` §7's
//! taxonomy. Every response body is `{ error: code, message?, details? }`;
//! uncaught errors fold to `internal_error` 500 with no stack trace.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Conflict(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("not_found")]
    NotFound,

    #[error("{0}")]
    Validation(&'static str),

    #[error("rate_limited")]
    RateLimited { retry_after_secs: u64 },

    #[error(transparent)]
    Store(#[from] clawed_store::StoreError),
}

impl From<clawed_auth::AuthError> for ApiError {
    fn from(e: clawed_auth::AuthError) -> Self {
        match e {
            clawed_auth::AuthError::Store(inner) => ApiError::Store(inner),
            other => ApiError::Unauthorized(other.code()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Conflict(code) => (StatusCode::CONFLICT, *code),
            ApiError::Forbidden(code) => (StatusCode::FORBIDDEN, *code),
            ApiError::Unauthorized(code) => (StatusCode::UNAUTHORIZED, *code),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Validation(code) => (StatusCode::BAD_REQUEST, *code),
            ApiError::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
            ApiError::Store(e) => {
                tracing::error!(error = %e, "unhandled store error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let details = match &self {
            ApiError::RateLimited { retry_after_secs } => Some(json!({ "retryAfter": retry_after_secs })),
            _ => None,
        };

        let mut response = (status, Json(ErrorBody { error: code, message: None, details })).into_response();
        if let ApiError::RateLimited { retry_after_secs } = self {
            if let Ok(value) = axum::http::HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert("retry-after", value);
            }
        }
        response
    }
}

pub fn json_ok<T: Serialize>(value: T) -> Response {
    Json(value).into_response()
}

#[allow(dead_code)]
pub(crate) fn internal(message: impl Into<String>) -> serde_json::Value {
    json!({ "error": "internal_error", "message": message.into() })
}
