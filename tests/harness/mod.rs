// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for the contact gate.
//!
//! Provides email sender doubles, gate builders and flood simulation
//! utilities shared by the integration and security tests.

#![allow(dead_code)]

pub mod attacks;
pub mod generators;
pub mod metrics;

use async_trait::async_trait;
use contact_gate::{
    config::{Config, RateLimitConfig},
    error::MailerError,
    gate::SubmissionGate,
    limiter::RateLimiter,
    mailer::{EmailSender, OutboundEmail},
    submission::ContactSubmission,
    validator::SubmissionValidator,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Records every email and answers like the Resend API.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingSender {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for RecordingSender {
    async fn send(&self, email: OutboundEmail) -> Result<Value, MailerError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(email);
        Ok(json!({ "id": format!("email-{}", sent.len()) }))
    }
}

/// Always fails with a provider error carrying internal detail.
pub struct FailingSender;

pub const PROVIDER_SECRET_DETAIL: &str = "invalid api key re_live_abc123";

#[async_trait]
impl EmailSender for FailingSender {
    async fn send(&self, _email: OutboundEmail) -> Result<Value, MailerError> {
        Err(MailerError::Api {
            status: 401,
            body: PROVIDER_SECRET_DETAIL.to_string(),
        })
    }
}

pub fn test_config() -> Config {
    Config::with_api_key("re_test")
}

/// Build a gate around `sender` with its own limiter.
pub fn gate_with(sender: Arc<dyn EmailSender>, rate_limit: RateLimitConfig) -> SubmissionGate {
    let config = test_config();
    SubmissionGate::new(
        Arc::new(RateLimiter::new(rate_limit)),
        SubmissionValidator::new(config.validation.clone()),
        sender,
        config.mail,
    )
    .unwrap()
}

pub fn jane_doe() -> ContactSubmission {
    ContactSubmission {
        name: "Jane Doe".into(),
        email: "jane@acme.com".into(),
        company: "Acme".into(),
        interested_in: "startup-advisory".into(),
        message: "Hello".into(),
    }
}
