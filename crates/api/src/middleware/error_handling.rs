//! # Error Handling Middleware
//!
//! Maps `GymError` to HTTP status codes and `{"error": message}` JSON bodies
//! so every handler reports failures the same way.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gymbook_core::errors::GymError;
use serde_json::json;
use tracing::{debug, error, warn};

/// Application error wrapper that provides HTTP status code mapping
///
/// Handlers return `Result<_, AppError>` and use `?` on store calls; the
/// `From<GymError>` impl does the wrapping.
#[derive(Debug)]
pub struct AppError(pub GymError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            GymError::SlotNotFound(_) | GymError::BookingNotFound { .. } => StatusCode::NOT_FOUND,
            GymError::CapacityExceeded(_)
            | GymError::DuplicateBooking { .. }
            | GymError::Validation(_) => StatusCode::BAD_REQUEST,
            GymError::AuthenticationRequired(_) | GymError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            GymError::Forbidden(_) => StatusCode::FORBIDDEN,
            GymError::Conflict(_) | GymError::TrainerConflict { .. } => StatusCode::CONFLICT,
            GymError::LockTimeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
            GymError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self.0 {
            GymError::Storage(report) => error!("Request failed: {:?}", report),
            GymError::LockTimeout { .. } => warn!("{}", self.0),
            _ => {}
        }

        let body = Json(json!({ "error": self.0.client_message() }));
        (status, body).into_response()
    }
}

impl From<GymError> for AppError {
    fn from(err: GymError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(GymError::Storage(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        AppError(GymError::Validation("Invalid JSON format".to_string()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        debug!("Rejected path: {}", rejection.body_text());
        AppError(GymError::Validation("Invalid slot ID format".to_string()))
    }
}

/// Maps a GymError straight to an HTTP response.
pub fn map_error(err: GymError) -> Response {
    AppError(err).into_response()
}
