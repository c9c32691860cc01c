// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact gate service.
//!
//! The rate check runs before the body is parsed, so malformed bodies still
//! count against the caller's quota.

use crate::config::Config;
use crate::gate::{Caller, SubmissionGate};
use crate::limiter::RateDecision;
use crate::submission::ContactSubmission;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

/// Headers the browser client is allowed to send.
const ALLOWED_HEADERS: [&str; 4] = ["authorization", "x-client-info", "apikey", "content-type"];

/// Shared application state.
pub struct AppState {
    pub gate: SubmissionGate,
    pub config: Config,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Success response body.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub data: Value,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static));

    let mut app = Router::new()
        .route("/", post(submit))
        .route("/send-contact-email", post(submit))
        .route("/health", get(health))
        .route("/healthz", get(health));

    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(metrics));
    }

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-gate",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Prometheus metrics endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.gate.metrics().render() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Contact form submission.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let caller = caller_from_headers(&headers);

    let remaining = match state.gate.admit(&caller).await {
        RateDecision::Limited { reset_in } => return rate_limited(reset_in),
        RateDecision::Allowed { remaining, .. } => remaining,
    };

    info!(identity = %caller.identity, "Contact form request received");

    let submission: ContactSubmission = match serde_json::from_slice(&body) {
        Ok(submission) => submission,
        Err(err) => {
            state.gate.metrics().record("invalid_body");
            warn!(identity = %caller.identity, error = %err, "Unparsable contact form body");
            return json_response(
                StatusCode::BAD_REQUEST,
                remaining,
                ErrorResponse {
                    error: "Invalid request body".to_string(),
                    details: Some(Value::from(vec![err.to_string()])),
                },
            );
        }
    };

    let sanitized = match state.gate.evaluate(&caller, &submission) {
        Ok(sanitized) => sanitized,
        Err(result) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                remaining,
                ErrorResponse {
                    error: "Validation failed".to_string(),
                    details: Some(Value::from(result.messages())),
                },
            );
        }
    };

    match state.gate.dispatch(&caller, &sanitized).await {
        Ok(data) => json_response(
            StatusCode::OK,
            remaining,
            SuccessResponse {
                success: true,
                data,
            },
        ),
        Err(err) => {
            let details = if state.config.expose_error_details {
                Value::String(err.to_string())
            } else {
                Value::Null
            };
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                remaining,
                ErrorResponse {
                    error: "Failed to send message".to_string(),
                    details: Some(details),
                },
            )
        }
    }
}

/// Derive the caller from proxy headers.
///
/// First `X-Forwarded-For` entry, then `X-Real-IP`, then `"unknown"`. Every
/// caller without either header shares the `"unknown"` bucket.
pub fn caller_from_headers(headers: &HeaderMap) -> Caller {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let identity = forwarded.or(real_ip).unwrap_or("unknown");
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    debug!(identity, user_agent = ?user_agent, "Resolved caller");
    Caller::new(identity, user_agent)
}

fn json_response<T: Serialize>(status: StatusCode, remaining: u32, body: T) -> Response {
    (
        status,
        [("X-RateLimit-Remaining", remaining.to_string())],
        Json(body),
    )
        .into_response()
}

fn rate_limited(reset_in: Duration) -> Response {
    let reset_at = chrono::Utc::now()
        + chrono::Duration::from_std(reset_in).unwrap_or_else(|_| chrono::Duration::zero());
    // Round up so clients never retry a moment too early
    let retry_secs = reset_in.as_secs() + u64::from(reset_in.subsec_nanos() > 0);

    (
        StatusCode::TOO_MANY_REQUESTS,
        [
            ("X-RateLimit-Remaining", "0".to_string()),
            ("X-RateLimit-Reset", reset_at.to_rfc3339()),
            ("Retry-After", retry_secs.to_string()),
        ],
        Json(ErrorResponse {
            error: "Rate limit exceeded. Please try again later.".to_string(),
            details: None,
        }),
    )
        .into_response()
}
