// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Gate
//!
//! This crate guards the contact form of a consulting landing page before
//! anything reaches the email API:
//!
//! - Per-caller fixed-window rate limiting (5 per minute default)
//! - Fail-collect validation of all five form fields
//! - HTML escaping of every field before it is embedded in the email
//! - Generic 500s when the email API fails, with full detail kept in logs

pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod limiter;
pub mod mailer;
pub mod metrics;
pub mod sanitize;
pub mod submission;
pub mod validator;

pub use config::Config;
pub use error::{ConfigError, GateError, MailerError};
pub use gate::{Caller, Outcome, SubmissionGate};
pub use limiter::{RateDecision, RateLimiter};
pub use mailer::{EmailSender, OutboundEmail, ResendClient};
pub use submission::{ContactSubmission, SanitizedSubmission};
pub use validator::{SubmissionValidator, ValidationResult};
