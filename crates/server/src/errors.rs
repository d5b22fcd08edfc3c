use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use tracing::warn;

/// HTTP face of a request failure: status code plus `{"error": msg}`.
#[derive(Debug)]
pub enum ApiError {
    Service(ServiceError),
    /// Body exceeded the router's `DefaultBodyLimit`.
    PayloadTooLarge,
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self::Service(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Service(ServiceError::Validation(_) | ServiceError::InvalidId(_)) => StatusCode::BAD_REQUEST,
            Self::Service(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Service(ServiceError::Persistence(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Message shown to clients; storage details stay in the logs.
    pub fn message(&self) -> String {
        match self {
            Self::Service(ServiceError::Validation(msg)) => msg.clone(),
            Self::Service(ServiceError::InvalidId(_)) => "invalid id".to_string(),
            Self::Service(ServiceError::NotFound(_)) => "record not found".to_string(),
            Self::Service(ServiceError::Persistence(_)) => "failed to persist data".to_string(),
            Self::PayloadTooLarge => "request body too large".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            match &self {
                Self::Service(e) => warn!(status = status.as_u16(), error = %e, "request rejected"),
                Self::PayloadTooLarge => warn!(status = status.as_u16(), "request body too large"),
            }
        }
        (status, Json(serde_json::json!({ "error": self.message() }))).into_response()
    }
}
