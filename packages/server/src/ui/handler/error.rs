//! Mapping of use case errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    domain::ValueObjectError, infrastructure::dto::http::FailureResponse, usecase::ChatError,
};

/// Error returned by every HTTP handler; renders as `{"status":"fail",...}`.
#[derive(Debug)]
pub struct ApiError(ChatError);

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        ApiError(e)
    }
}

impl From<ValueObjectError> for ApiError {
    fn from(e: ValueObjectError) -> Self {
        ApiError(e.into())
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            ChatError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ChatError::UserExists(_) => StatusCode::CONFLICT,
            ChatError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ChatError::NotFound(_) => StatusCode::NOT_FOUND,
            ChatError::PersistenceFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
            ChatError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }
        let body = FailureResponse::new(self.0.to_string(), self.0.is_retryable());
        (status, Json(body)).into_response()
    }
}
