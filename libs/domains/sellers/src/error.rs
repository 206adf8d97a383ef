use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SellerError {
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Reverse geocoding gave no city, or failed outright
    #[error("Could not determine a city for ({latitude}, {longitude})")]
    CityNotResolved { latitude: f64, longitude: f64 },

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type SellerResult<T> = Result<T, SellerError>;

impl From<validator::ValidationErrors> for SellerError {
    fn from(errors: validator::ValidationErrors) -> Self {
        SellerError::Validation(errors.to_string())
    }
}

impl From<sea_orm::DbErr> for SellerError {
    fn from(err: sea_orm::DbErr) -> Self {
        SellerError::Internal(format!("Database error: {}", err))
    }
}

impl From<SellerError> for AppError {
    fn from(err: SellerError) -> Self {
        match err {
            SellerError::Validation(msg) => AppError::BadRequest(msg),
            e @ SellerError::CityNotResolved { .. } => AppError::UnresolvableLocation(e.to_string()),
            e @ SellerError::NotFound(_) => AppError::NotFound(e.to_string()),
            SellerError::Conflict(msg) => AppError::Conflict(msg),
            SellerError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for SellerError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
