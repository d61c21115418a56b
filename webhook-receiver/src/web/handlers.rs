//! Endpoint handlers.
//!
//! The webhook handler only logs what it receives and acknowledges it.
//! Nothing is parsed for behavior, stored or forwarded.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{self, Body},
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Local, SecondsFormat};
use serde::Serialize;
use tracing::{error, info};

use crate::error::WebhookError;
use crate::metrics::{RequestRecorder, CONTENT_TYPE};
use crate::web::payload::{pretty_json, PayloadSize};

/// Header carrying the webhook signature. Logged, never verified.
pub const SIGNATURE_HEADER: &str = "x-nylas-signature";

/// Body returned for every successfully read POST.
pub const ACK_BODY: &str = "Webhook Received";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub recorder: Arc<dyn RequestRecorder>,
}

impl AppState {
    pub fn new(recorder: Arc<dyn RequestRecorder>) -> Self {
        Self { recorder }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub time: String,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        time: Local::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

// =============================================================================
// Metrics
// =============================================================================

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<AppState>) -> Result<Response, WebhookError> {
    let text = state.recorder.render().map_err(|e| {
        error!(error = %e, "metrics_render_failed");
        WebhookError::from(e)
    })?;

    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE)], text).into_response())
}

// =============================================================================
// Webhook
// =============================================================================

/// Records method and elapsed time when dropped, so every exit path counts.
struct RequestTimer<'a> {
    recorder: &'a dyn RequestRecorder,
    method: &'a Method,
    start: Instant,
}

impl<'a> RequestTimer<'a> {
    fn start(recorder: &'a dyn RequestRecorder, method: &'a Method) -> Self {
        Self {
            recorder,
            method,
            start: Instant::now(),
        }
    }
}

impl Drop for RequestTimer<'_> {
    fn drop(&mut self) {
        self.recorder
            .record_request(self.method.as_str(), self.start.elapsed().as_secs_f64());
    }
}

/// Webhook endpoint, also mounted as the fallback for unrouted paths.
///
/// - `GET` with a non-empty `challenge` query parameter echoes it back
/// - `POST` logs the signature header, body size and body, then acknowledges
/// - anything else gets an empty 200
pub async fn receive(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let _timer = RequestTimer::start(state.recorder.as_ref(), &method);

    if method == Method::GET {
        if let Some(challenge) = challenge_param(&uri) {
            info!(challenge = %challenge, "challenge_received");
            info!(challenge = %challenge, "challenge_sending");
            return (StatusCode::OK, challenge).into_response();
        }
    }

    if method == Method::POST {
        return match receive_payload(&headers, body).await {
            Ok(()) => (StatusCode::OK, ACK_BODY).into_response(),
            Err(e) => {
                error!(error = %e, "webhook_body_read_failed");
                e.into_response()
            }
        };
    }

    StatusCode::OK.into_response()
}

/// Read and log a POSTed payload.
async fn receive_payload(headers: &HeaderMap, body: Body) -> Result<(), WebhookError> {
    info!(signature = %signature_value(headers), "webhook_signature");

    let bytes = body::to_bytes(body, usize::MAX)
        .await
        .map_err(WebhookError::BodyRead)?;

    info!(
        size = %PayloadSize(bytes.len()),
        size_bytes = bytes.len(),
        "webhook_size"
    );

    match pretty_json(&bytes) {
        Some(pretty) => info!(body = %pretty, "webhook_json_body"),
        None => info!(body = %String::from_utf8_lossy(&bytes), "webhook_raw_body"),
    }

    Ok(())
}

/// Raw signature header value, empty when absent.
fn signature_value(headers: &HeaderMap) -> String {
    headers
        .get(SIGNATURE_HEADER)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}

/// First `challenge` query value, if present and non-empty.
fn challenge_param(uri: &Uri) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "challenge")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
