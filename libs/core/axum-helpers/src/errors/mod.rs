pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// {
///   "code": 1006,
///   "error": "UNRESOLVABLE_LOCATION",
///   "message": "Could not determine a city for these coordinates"
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable identifier, see [`ErrorCode::as_str`]
    pub error: String,
    pub message: String,
    /// Field-level validation errors, when there are any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Errors that handlers return; each maps to one status code and [`ErrorCode`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("JSON extraction error: {0}")]
    JsonRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryRejection(#[from] QueryRejection),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Unresolvable location: {0}")]
    UnresolvableLocation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The message is logged but never sent to the client
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::QueryRejection(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::JsonRejection(e) => e.status(),
            AppError::NotFound(_) | AppError::UnresolvableLocation(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            AppError::Validation(_) => ErrorCode::ValidationError,
            AppError::JsonRejection(_) => ErrorCode::InvalidJson,
            AppError::QueryRejection(_) => ErrorCode::InvalidQuery,
            AppError::BadRequest(_) => ErrorCode::BadRequest,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::UnresolvableLocation(_) => ErrorCode::UnresolvableLocation,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::InternalServerError(_) => ErrorCode::InternalError,
            AppError::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.error_code();

        let body = match self {
            AppError::Validation(errors) => {
                tracing::info!(error_code = code.code(), %errors, "validation failed");
                ErrorResponse::new(code, code.default_message())
                    .with_details(validation_details(&errors))
            }
            AppError::JsonRejection(e) => {
                tracing::info!(error_code = code.code(), error = %e, "rejected JSON body");
                ErrorResponse::new(code, e.body_text())
            }
            AppError::QueryRejection(e) => {
                tracing::info!(error_code = code.code(), error = %e, "rejected query string");
                ErrorResponse::new(code, e.body_text())
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = code.code(), error = %msg, "internal server error");
                ErrorResponse::new(code, code.default_message())
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(error_code = code.code(), error = %msg, "service unavailable");
                ErrorResponse::new(code, msg)
            }
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::UnresolvableLocation(msg)
            | AppError::Conflict(msg) => {
                tracing::info!(error_code = code.code(), message = %msg, "request failed");
                ErrorResponse::new(code, msg)
            }
        };

        (status, Json(body)).into_response()
    }
}

/// `{ "field": [{ "code", "message", "params" }] }` for each invalid field
pub fn validation_details(errors: &ValidationErrors) -> serde_json::Value {
    let fields = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let entries: Vec<serde_json::Value> = errors
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), serde_json::Value::Array(entries))
        })
        .collect::<serde_json::Map<_, _>>();

    serde_json::Value::Object(fields)
}
