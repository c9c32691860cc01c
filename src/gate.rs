// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! The submission gate.
//!
//! Runs a contact submission through rate check, validation, sanitization
//! and dispatch, in that order. The HTTP layer may call the steps separately
//! (`admit`, `evaluate`, `dispatch`) so the rate check happens before the
//! body is parsed; `handle` runs them all.

use crate::config::MailConfig;
use crate::error::GateError;
use crate::limiter::{RateDecision, RateLimiter};
use crate::mailer::{render_contact_email, EmailSender};
use crate::metrics::GateMetrics;
use crate::submission::{ContactSubmission, SanitizedSubmission};
use crate::validator::{SubmissionValidator, ValidationResult};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Longest user-agent string carried into logs.
const MAX_USER_AGENT_LEN: usize = 128;

/// Who is submitting: identity for rate limiting plus a coarse user agent
/// for the security log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub identity: String,
    pub user_agent: String,
}

impl Caller {
    pub fn new(identity: impl Into<String>, user_agent: Option<&str>) -> Self {
        let user_agent = match user_agent.map(str::trim) {
            Some(ua) if !ua.is_empty() => ua.chars().take(MAX_USER_AGENT_LEN).collect(),
            _ => "unknown".to_string(),
        };
        Self {
            identity: identity.into(),
            user_agent,
        }
    }
}

/// Result of handling one submission.
#[derive(Debug)]
pub enum Outcome {
    /// Identity exceeded its quota in the current window
    RateLimited { reset_in: Duration },
    /// One or more fields failed validation
    Invalid {
        errors: ValidationResult,
        remaining: u32,
    },
    /// The email was sent; `response` is the collaborator's reply
    Accepted {
        submission: SanitizedSubmission,
        response: Value,
        remaining: u32,
    },
    /// The email collaborator failed; the error itself is only logged
    DownstreamFailure { remaining: u32 },
}

/// Security events written to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityEvent {
    RateLimitExceeded,
    InputValidationFailed,
    ContactFormSubmitted,
    FunctionError,
}

impl SecurityEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::InputValidationFailed => "INPUT_VALIDATION_FAILED",
            Self::ContactFormSubmitted => "CONTACT_FORM_SUBMITTED",
            Self::FunctionError => "FUNCTION_ERROR",
        }
    }
}

impl std::fmt::Display for SecurityEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation, escaping and rate limiting in front of an [`EmailSender`].
pub struct SubmissionGate {
    limiter: Arc<RateLimiter>,
    validator: SubmissionValidator,
    sender: Arc<dyn EmailSender>,
    mail: MailConfig,
    metrics: GateMetrics,
}

impl SubmissionGate {
    pub fn new(
        limiter: Arc<RateLimiter>,
        validator: SubmissionValidator,
        sender: Arc<dyn EmailSender>,
        mail: MailConfig,
    ) -> prometheus::Result<Self> {
        Ok(Self {
            limiter,
            validator,
            sender,
            mail,
            metrics: GateMetrics::new()?,
        })
    }

    pub fn metrics(&self) -> &GateMetrics {
        &self.metrics
    }

    /// Step 1: count the request against the caller's quota.
    pub async fn admit(&self, caller: &Caller) -> RateDecision {
        let decision = self.limiter.check(&caller.identity).await;
        if let RateDecision::Limited { reset_in } = decision {
            self.metrics.record("rate_limited");
            log_event(
                SecurityEvent::RateLimitExceeded,
                caller,
                &format!("retry in {}s", reset_in.as_secs()),
            );
        }
        decision
    }

    /// Steps 2 and 3: validate every field, then escape them.
    pub fn evaluate(
        &self,
        caller: &Caller,
        submission: &ContactSubmission,
    ) -> Result<SanitizedSubmission, ValidationResult> {
        let result = self.validator.validate(submission);
        if !result.is_valid() {
            self.metrics.record("invalid");
            log_event(
                SecurityEvent::InputValidationFailed,
                caller,
                &result.messages().join("; "),
            );
            return Err(result);
        }
        Ok(submission.sanitize())
    }

    /// Step 4: hand the sanitized submission to the email collaborator.
    ///
    /// Collaborator errors are logged in full here; callers should only show
    /// a generic failure.
    pub async fn dispatch(
        &self,
        caller: &Caller,
        submission: &SanitizedSubmission,
    ) -> Result<Value, GateError> {
        let email = render_contact_email(submission, &self.mail);

        match self.sender.send(email).await {
            Ok(response) => {
                self.metrics.record("accepted");
                info!(
                    event = %SecurityEvent::ContactFormSubmitted,
                    identity = %caller.identity,
                    user_agent = %caller.user_agent,
                    timestamp = %chrono::Utc::now().to_rfc3339(),
                    name = %submission.name(),
                    email = %submission.email(),
                    company = %submission.company(),
                    response = %response,
                    "Contact email sent"
                );
                Ok(response)
            }
            Err(err) => {
                self.metrics.record("downstream_failure");
                error!(error = ?err, "Email collaborator failed");
                log_event(SecurityEvent::FunctionError, caller, &err.to_string());
                Err(GateError::Downstream(err))
            }
        }
    }

    /// Run the full pipeline for one submission.
    pub async fn handle(&self, caller: &Caller, submission: &ContactSubmission) -> Outcome {
        let remaining = match self.admit(caller).await {
            RateDecision::Limited { reset_in } => return Outcome::RateLimited { reset_in },
            RateDecision::Allowed { remaining, .. } => remaining,
        };

        let sanitized = match self.evaluate(caller, submission) {
            Ok(sanitized) => sanitized,
            Err(errors) => return Outcome::Invalid { errors, remaining },
        };

        match self.dispatch(caller, &sanitized).await {
            Ok(response) => Outcome::Accepted {
                submission: sanitized,
                response,
                remaining,
            },
            Err(_) => Outcome::DownstreamFailure { remaining },
        }
    }
}

/// Write a rejection-type security event. Never includes the message body.
fn log_event(event: SecurityEvent, caller: &Caller, details: &str) {
    warn!(
        event = %event,
        identity = %caller.identity,
        user_agent = %caller.user_agent,
        timestamp = %chrono::Utc::now().to_rfc3339(),
        details = %details,
        "[SECURITY] {}",
        event
    );
}
