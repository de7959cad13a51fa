//! API error types with HTTP response mapping.
//!
//! Every error response carries the structured body
//! `{"error": <class>, "message": <detail>}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use saga::SagaError;
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request from the client. No side effects occurred.
    #[error("{0}")]
    BadRequest(String),
    /// Saga or service adapter error.
    #[error(transparent)]
    Saga(#[from] SagaError),
    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Saga(err) => saga_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let error = match status {
            StatusCode::BAD_REQUEST => "Bad Request",
            StatusCode::BAD_GATEWAY => "Bad Gateway",
            _ => "Internal Server Error",
        };

        let body = serde_json::json!({ "error": error, "message": message });
        (status, axum::Json(body)).into_response()
    }
}

fn saga_error_to_response(err: SagaError) -> (StatusCode, String) {
    match &err {
        // Client errors: rejected before any side effects.
        SagaError::InvalidOrder(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        // Transient faults: the whole submission is retryable.
        SagaError::Gateway(_) => (StatusCode::BAD_GATEWAY, err.to_string()),
        SagaError::StateStore(_) | SagaError::Serialization(_) => {
            tracing::error!(error = %err, "saga infrastructure error");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match &rejection {
            JsonRejection::MissingJsonContentType(_) => "Request must be JSON".to_string(),
            _ => rejection.body_text(),
        };
        ApiError::BadRequest(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::OrderError;
    use statestore::StateStoreError;

    #[test]
    fn invalid_order_maps_to_400() {
        let (status, _) = saga_error_to_response(SagaError::InvalidOrder(OrderError::NoItems));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_outage_maps_to_500() {
        let err = SagaError::StateStore(StateStoreError::unavailable("statestore", "down"));
        let (status, _) = saga_error_to_response(err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn gateway_outage_maps_to_502() {
        let (status, _) = saga_error_to_response(SagaError::Gateway("reset".to_string()));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
