use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use lodgic_core::error::{BookingError, StoreError};

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound,
    Conflict(String),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(err) => {
                // Backend detail is logged, never echoed to the caller.
                tracing::error!("Internal Server Error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(_)
            | BookingError::InvalidRoomNumber(_)
            | BookingError::RoomNotFound(_) => AppError::BadRequest(err.to_string()),
            BookingError::RoomUnavailable(_) => AppError::Conflict(err.to_string()),
            BookingError::Storage(source) => AppError::Internal(anyhow::Error::new(source)),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFound,
            StoreError::RoomNotFound(_) => AppError::BadRequest(err.to_string()),
            StoreError::Conflict(_) => AppError::Conflict(err.to_string()),
            StoreError::Backend { .. } => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}
