// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact submission validator.
//!
//! Every field is checked and every violation is collected, so the form can
//! show all problems at once:
//! - Presence after trimming
//! - Email shape (`local@domain.tld`)
//! - Per-field maximum length

use crate::config::ValidationConfig;
use crate::submission::ContactSubmission;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"));

/// Form fields, in the order they are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Company,
    InterestedIn,
    Message,
}

impl Field {
    /// Field name as it appears in the JSON payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Company => "company",
            Self::InterestedIn => "interestedIn",
            Self::Message => "message",
        }
    }
}

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,
    #[error("Name must be less than {max} characters")]
    NameTooLong { max: usize },

    #[error("Valid email is required")]
    InvalidEmail,
    #[error("Email must be less than {max} characters")]
    EmailTooLong { max: usize },

    #[error("Company is required")]
    CompanyRequired,
    #[error("Company name must be less than {max} characters")]
    CompanyTooLong { max: usize },

    #[error("Interest selection is required")]
    InterestRequired,
    #[error("Interest selection must be less than {max} characters")]
    InterestTooLong { max: usize },

    #[error("Message is required")]
    MessageRequired,
    #[error("Message must be less than {max} characters")]
    MessageTooLong { max: usize },
}

impl ValidationError {
    /// The field this error refers to.
    pub fn field(&self) -> Field {
        match self {
            Self::NameRequired | Self::NameTooLong { .. } => Field::Name,
            Self::InvalidEmail | Self::EmailTooLong { .. } => Field::Email,
            Self::CompanyRequired | Self::CompanyTooLong { .. } => Field::Company,
            Self::InterestRequired | Self::InterestTooLong { .. } => Field::InterestedIn,
            Self::MessageRequired | Self::MessageTooLong { .. } => Field::Message,
        }
    }
}

/// Result of validation: empty error list means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Human-readable messages in field order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Payload names of the failing fields, in field order.
    pub fn fields(&self) -> Vec<&'static str> {
        self.errors.iter().map(|e| e.field().as_str()).collect()
    }
}

/// Contact submission validator.
pub struct SubmissionValidator {
    config: ValidationConfig,
}

impl SubmissionValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate all five fields, collecting every violation.
    pub fn validate(&self, submission: &ContactSubmission) -> ValidationResult {
        let c = &self.config;
        let mut errors = Vec::new();

        check_text(
            &submission.name,
            c.max_name_len,
            ValidationError::NameRequired,
            ValidationError::NameTooLong { max: c.max_name_len },
            &mut errors,
        );

        if !is_email_shaped(&submission.email) {
            errors.push(ValidationError::InvalidEmail);
        } else if char_len(&submission.email) > c.max_email_len {
            errors.push(ValidationError::EmailTooLong { max: c.max_email_len });
        }

        check_text(
            &submission.company,
            c.max_company_len,
            ValidationError::CompanyRequired,
            ValidationError::CompanyTooLong { max: c.max_company_len },
            &mut errors,
        );
        check_text(
            &submission.interested_in,
            c.max_interest_len,
            ValidationError::InterestRequired,
            ValidationError::InterestTooLong { max: c.max_interest_len },
            &mut errors,
        );
        check_text(
            &submission.message,
            c.max_message_len,
            ValidationError::MessageRequired,
            ValidationError::MessageTooLong { max: c.max_message_len },
            &mut errors,
        );

        let result = ValidationResult { errors };
        if !result.is_valid() {
            debug!(
                violations = result.errors.len(),
                fields = %result.fields().join(","),
                "Submission invalid"
            );
        }
        result
    }
}

/// Presence check, then length check only for present values.
fn check_text(
    value: &str,
    max: usize,
    missing: ValidationError,
    too_long: ValidationError,
    errors: &mut Vec<ValidationError>,
) {
    if value.trim().is_empty() {
        errors.push(missing);
    } else if char_len(value) > max {
        errors.push(too_long);
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// `local@domain.tld` shape: no whitespace, exactly one `@`, and a dot inside
/// the domain part.
pub fn is_email_shaped(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}
