// SPDX-License-Identifier: PMPL-1.0-or-later
// Outbound email for accepted contact submissions
//
// The gate only sees the `EmailSender` trait; `ResendClient` is the
// production implementation talking to a Resend-compatible HTTP API.

use crate::config::MailConfig;
use crate::error::MailerError;
use crate::submission::SanitizedSubmission;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// A fully rendered email, serialized as the `POST /emails` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// The "send email" capability.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send one email and return the provider's response object.
    async fn send(&self, email: OutboundEmail) -> Result<Value, MailerError>;
}

/// Resend API client
pub struct ResendClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl ResendClient {
    /// Create a client from mail configuration
    pub fn new(config: &MailConfig) -> Result<Self, MailerError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client,
        })
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send(&self, email: OutboundEmail) -> Result<Value, MailerError> {
        let url = format!("{}/emails", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailerError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| MailerError::Decode(e.to_string()))
    }
}

/// Render the notification email for a sanitized submission.
pub fn render_contact_email(submission: &SanitizedSubmission, config: &MailConfig) -> OutboundEmail {
    let html = format!(
        "<h2>New Contact Form Submission</h2>\n\
         <p><strong>Name:</strong> {name}</p>\n\
         <p><strong>Email:</strong> {email}</p>\n\
         <p><strong>Company:</strong> {company}</p>\n\
         <p><strong>Interested In:</strong> {interest}</p>\n\
         <p><strong>Message:</strong></p>\n\
         <p>{message}</p>\n\
         <hr>\n\
         <p><em>This email was sent from the contact form on {site}</em></p>\n",
        name = submission.name(),
        email = submission.email(),
        company = submission.company(),
        interest = submission.interested_in(),
        message = submission.message(),
        site = config.site_name,
    );

    OutboundEmail {
        from: config.from.clone(),
        to: config.to.clone(),
        subject: format!("New Contact Form Submission from {}", submission.name()),
        html,
    }
}
