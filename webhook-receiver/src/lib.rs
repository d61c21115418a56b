//! Webhook receiver.
//!
//! A small HTTP service that:
//! - Answers webhook subscription challenges on `GET /?challenge=...`
//! - Logs the signature header, size and body of every `POST`
//! - Reports liveness on `/health`
//! - Exposes per-method request counts and latencies on `/metrics`

pub mod config;
pub mod error;
pub mod metrics;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use error::WebhookError;
pub use metrics::{MetricsError, PrometheusRecorder, RequestRecorder};
pub use web::{router, AppState};
