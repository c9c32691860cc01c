// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for the contact gate

use thiserror::Error;

/// Startup configuration errors. Fatal; never produced per request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

/// Failures of the email-sending collaborator.
#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Email API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Email API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Email API response could not be decoded: {0}")]
    Decode(String),
}

/// Errors raised while the gate dispatches an accepted submission.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Failed to send message: {0}")]
    Downstream(#[from] MailerError),
}
