//! Error types surfaced by the HTTP handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::metrics::MetricsError;

/// Errors a handler turns into an HTTP response.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The request body stream failed before completing.
    #[error("failed to read request body: {0}")]
    BodyRead(#[source] axum::Error),

    /// The metrics registry could not be rendered.
    #[error("failed to render metrics: {0}")]
    Metrics(#[from] MetricsError),
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::BodyRead(_) => StatusCode::BAD_REQUEST,
            WebhookError::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message; internal details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            WebhookError::BodyRead(_) => "Error reading the body",
            WebhookError::Metrics(_) => "Error encoding metrics",
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (self.status(), self.public_message()).into_response()
    }
}
