//! Web server module.
//!
//! Routes:
//! - `/health` and `/metrics` answer any method
//! - `/` and every other path go to the webhook handler

pub mod handlers;
pub mod payload;

use axum::{routing::any, Router};
use tower_http::trace::TraceLayer;

pub use handlers::{health, metrics, receive, AppState, HealthResponse, ACK_BODY, SIGNATURE_HEADER};
pub use payload::{pretty_json, PayloadSize};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(receive))
        .route("/health", any(health))
        .route("/metrics", any(metrics))
        .fallback(receive)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
