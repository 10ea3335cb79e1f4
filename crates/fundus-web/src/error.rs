use axum::Json;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;

use fundus_core::error::CoreError;
use fundus_core::messages;
use fundus_export::error::ExportError;
use fundus_storage::error::StorageError;

/// Unified error type for all route handlers.
///
/// The payload is for the log only. Patients see a fixed message per
/// variant, never storage keys or error chains.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Internal(String),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, messages::NOT_FOUND),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, messages::MISSING_ACCESS_CODE),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, messages::SESSION_EXPIRED),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, messages::GENERIC_ERROR),
        }
    }

    fn log(&self) {
        match self {
            ApiError::Internal(msg) => tracing::error!("internal error: {msg}"),
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) | ApiError::Unauthorized(msg) => {
                tracing::debug!("request rejected: {msg}")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let (status, message) = self.status_and_message();
        let body = format!(
            "<!DOCTYPE html>\n<html lang=\"ja\"><head><meta charset=\"utf-8\">\
             <title>{}</title></head><body><p>{message}</p></body></html>",
            messages::PAGE_TITLE
        );
        (status, Html(body)).into_response()
    }
}

/// JSON rendering of [`ApiError`] for the `/api` routes.
#[derive(Debug)]
pub struct JsonError(pub ApiError);

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        self.0.log();
        let (status, message) = self.0.status_and_message();
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<ApiError> for JsonError {
    fn from(e: ApiError) -> Self {
        JsonError(e)
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound { key } => ApiError::NotFound(format!("object not found: {key}")),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(e: ExportError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        ApiError::Internal(format!("session token error: {e}"))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("background task failed: {e}"))
    }
}
