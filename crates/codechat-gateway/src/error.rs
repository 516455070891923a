//! Error-to-status mapping for the HTTP surface.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use codechat_core::SessionError;
use codechat_index::IndexError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Index(err) | Self::Session(SessionError::Index(err)) => match err {
                IndexError::InvalidDirectory(_) | IndexError::FileRead { .. } => {
                    StatusCode::BAD_REQUEST
                }
                IndexError::Embedding(_) | IndexError::DimensionMismatch { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Session(SessionError::Llm(_)) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        } else {
            tracing::warn!(%status, error = %self, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
