use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use super::validation::Violation;

/// Errors surfaced by the HTTP layer.
///
/// Storage failures keep their source for the server log, but clients only
/// see the short context message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid data")]
    Validation(Vec<Violation>),

    #[error("Invalid estimate ID")]
    InvalidId,

    #[error("Estimate not found")]
    NotFound,

    #[error("{context}")]
    Internal {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    /// Wrap a storage error with the message the client will see.
    pub fn internal(context: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| Self::Internal { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidId => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        let body = match self {
            Self::Validation(errors) => {
                tracing::warn!(count = errors.len(), "Rejected invalid estimate payload");
                json!({ "message": message, "errors": errors })
            }
            Self::Internal { source, .. } => {
                tracing::error!("{}: {:#}", message, source);
                json!({ "message": message })
            }
            Self::InvalidId | Self::NotFound => json!({ "message": message }),
        };

        (status, Json(body)).into_response()
    }
}
