use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use node_call_bridge::CallError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Node not ready")]
    NotReady,

    #[error("Node unavailable: {0}")]
    Transport(String),

    #[error("Node call timed out: {0}")]
    Timeout(String),

    #[error("Node call cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotReady | ApiError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Transport(_) => StatusCode::BAD_GATEWAY,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::NotReady => "NOT_READY",
            ApiError::Transport(_) => "TRANSPORT_FAILURE",
            ApiError::Timeout(_) => "TIMEOUT",
            ApiError::Cancelled => "CANCELLED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<CallError> for ApiError {
    fn from(err: CallError) -> Self {
        match err {
            CallError::NotReady => ApiError::NotReady,
            CallError::TransportFailure(reason) => ApiError::Transport(reason),
            CallError::TimedOut(after) => ApiError::Timeout(format!("{:?}", after)),
            CallError::Cancelled => ApiError::Cancelled,
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
