use axum::{
    Json,
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::{error, warn};

#[derive(Debug, ThisError)]
pub enum TrackerError {
    #[error("validation failed: {0}")]
    Validation(&'static str),

    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("request body rejected: {0}")]
    Body(#[from] BytesRejection),
}

impl TrackerError {
    pub fn status(&self) -> StatusCode {
        match self {
            TrackerError::Validation(_) => StatusCode::BAD_REQUEST,
            TrackerError::DeviceNotFound(_) => StatusCode::NOT_FOUND,
            TrackerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TrackerError::Body(rejection) => rejection.status(),
        }
    }

    /// Message sent to the client. Never carries driver detail.
    pub fn public_message(&self) -> String {
        match self {
            TrackerError::Validation(msg) => (*msg).to_string(),
            TrackerError::DeviceNotFound(_) => "Device not found".to_string(),
            TrackerError::Database(_) => "Internal server error".to_string(),
            TrackerError::Body(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                "Request body too large".to_string()
            }
            TrackerError::Body(_) => "Failed to read request body".to_string(),
        }
    }
}

impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, "request rejected");
        }
        ApiError::new(status, self.public_message()).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// Error reply not tied to a `TrackerError`, e.g. an unknown route.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ApiErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_hide_driver_detail() {
        let err = TrackerError::Database(SqlxError::PoolTimedOut);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = TrackerError::DeviceNotFound("Nonexistent Phone".to_string());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "Device not found");
    }

    #[test]
    fn validation_keeps_its_message() {
        let err = TrackerError::Validation("Device is required");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "Device is required");
    }
}
