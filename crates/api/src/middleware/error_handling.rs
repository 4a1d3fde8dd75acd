//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the slotbook API.
//! It maps domain-specific errors to appropriate HTTP status codes and JSON
//! error responses of the form `{"error": "<message>"}`.
//!
//! Server-side failures are logged with their full cause chain and answered
//! with a generic message, so file paths and parser details stay out of
//! responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use slotbook_core::errors::ScheduleError;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `ScheduleError` instances and implements
/// `IntoResponse` to convert them into HTTP responses.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use slotbook_api::middleware::error_handling::AppError;
/// use slotbook_core::{errors::ScheduleError, models::schedule::Schedule};
///
/// async fn handler(id: String) -> Result<Json<Schedule>, AppError> {
///     Err(AppError(ScheduleError::NotFound(format!("Schedule with ID {} not found", id))))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub ScheduleError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ScheduleError::NotFound(_) => StatusCode::NOT_FOUND,
            ScheduleError::Validation(_) => StatusCode::BAD_REQUEST,
            ScheduleError::Conflict(_) => StatusCode::CONFLICT,
            ScheduleError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self.0 {
            ScheduleError::NotFound(msg)
            | ScheduleError::Validation(msg)
            | ScheduleError::Conflict(msg) => msg.clone(),
            ScheduleError::Storage(report) => {
                tracing::error!("Storage failure: {:?}", report);
                "Storage failure".to_string()
            }
        };
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Automatic conversion from ScheduleError to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, ScheduleError>` in handler functions that return `Result<T, AppError>`.
impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// Reports always describe a storage-side failure.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ScheduleError::Storage(err))
    }
}

/// Malformed or mistyped request bodies are client errors.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(ScheduleError::Validation(format!(
            "Invalid schedule data: {}",
            rejection.body_text()
        )))
    }
}
