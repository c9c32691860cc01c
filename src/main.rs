// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Gate Service
//!
//! Receives contact form submissions, validates and escapes them, rate
//! limits each caller, and relays accepted messages to the email API.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables (a `.env` file is
//! honoured):
//!
//! - `RESEND_API_KEY`: Email API key (required)
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `RESEND_API_URL`: Email API base URL (default: https://api.resend.com)
//! - `CONTACT_FROM` / `CONTACT_TO`: Sender and comma-separated recipients
//! - `RATE_LIMIT_MAX_REQUESTS`: Submissions per window per caller (default: 5)
//! - `RATE_LIMIT_WINDOW_SECS`: Window length (default: 60)
//! - `EXPOSE_ERROR_DETAILS`: Echo email API errors in 500s (default: false)

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_gate::{
    config::Config,
    gate::SubmissionGate,
    handlers::{router, AppState},
    limiter::RateLimiter,
    mailer::ResendClient,
    validator::SubmissionValidator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables first so RUST_LOG from .env applies
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Missing API key is fatal here, never per request
    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window_secs,
        recipients = config.mail.to.len(),
        "Starting contact gate"
    );

    // Create application state
    let limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));
    let validator = SubmissionValidator::new(config.validation.clone());
    let sender = Arc::new(ResendClient::new(&config.mail)?);
    let gate = SubmissionGate::new(limiter, validator, sender, config.mail.clone())?;

    let addr = config.socket_addr()?;
    let state = Arc::new(AppState { gate, config });
    let app = router(state);

    // Start server
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
