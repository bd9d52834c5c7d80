//! Mapping of failures to HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::dto::{ErrorBody, ErrorResponse};
use crate::error::RagError;

/// Error returned by request handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The body could not be decoded.
    InvalidRequest(String),
    /// The orchestrator failed.
    Rag(RagError),
}

impl ApiError {
    /// HTTP status and stable kind for this error.
    #[must_use]
    pub fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            Self::Rag(e) => {
                let status = match e {
                    _ if e.is_client_error() => StatusCode::BAD_REQUEST,
                    RagError::RetrievalUnavailable { .. }
                    | RagError::ChatServiceUnavailable { .. } => StatusCode::BAD_GATEWAY,
                    RagError::AgentRoundLimitExceeded { .. } => StatusCode::GATEWAY_TIMEOUT,
                    RagError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.kind())
            }
        }
    }
}

impl From<RagError> for ApiError {
    fn from(e: RagError) -> Self {
        Self::Rag(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::InvalidRequest(e.body_text())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest(message) => write!(f, "invalid request: {message}"),
            Self::Rag(e) => write!(f, "{e}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status, kind, error = %message, "request failed");
        } else {
            tracing::warn!(status = %status, kind, error = %message, "rejected request");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                kind: kind.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(RagError::EmptyConversation, StatusCode::BAD_REQUEST; "empty")]
    #[test_case(RagError::InvalidConversation { message: "x".into() }, StatusCode::BAD_REQUEST; "invalid")]
    #[test_case(RagError::RetrievalUnavailable { message: "x".into() }, StatusCode::BAD_GATEWAY; "retrieval")]
    #[test_case(RagError::ChatServiceUnavailable { message: "x".into() }, StatusCode::BAD_GATEWAY; "chat")]
    #[test_case(RagError::AgentRoundLimitExceeded { max_rounds: 5 }, StatusCode::GATEWAY_TIMEOUT; "round limit")]
    #[test_case(RagError::Cancelled, StatusCode::SERVICE_UNAVAILABLE; "cancelled")]
    #[test_case(RagError::MissingConfig { key: "X" }, StatusCode::INTERNAL_SERVER_ERROR; "config")]
    fn test_status_mapping(error: RagError, expected: StatusCode) {
        let (status, _) = ApiError::from(error).status_and_kind();
        assert_eq!(status, expected);
    }

    #[test]
    fn test_round_limit_kind_is_distinct() {
        let (_, kind) = ApiError::from(RagError::AgentRoundLimitExceeded { max_rounds: 2 })
            .status_and_kind();
        assert_eq!(kind, "agent_round_limit_exceeded");
    }
}
