// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact gate.
//!
//! Defaults match the limits the contact form has always enforced:
//! 5 submissions per minute per caller and the per-field length caps.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Longest accepted rate window: one day.
pub const MAX_WINDOW_SECS: u64 = 86_400;

/// Configuration for the contact gate service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Validation configuration
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Outbound email configuration
    pub mail: MailConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Echo collaborator error text in 500 responses (default: false)
    #[serde(default)]
    pub expose_error_details: bool,
}

/// Fixed-window rate limiting, keyed by caller identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum submissions per window per identity (default: 5)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds (default: 60, at most one day)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

/// Maximum field lengths, counted in characters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,

    #[serde(default = "default_max_email_len")]
    pub max_email_len: usize,

    #[serde(default = "default_max_company_len")]
    pub max_company_len: usize,

    #[serde(default = "default_max_interest_len")]
    pub max_interest_len: usize,

    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,
}

/// Email API and message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Bearer token for the email API. Required.
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Base URL of the Resend-compatible API (default: https://api.resend.com)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Sender mailbox
    #[serde(default = "default_from")]
    pub from: String,

    /// Recipients of contact messages
    #[serde(default = "default_to")]
    pub to: Vec<String>,

    /// Site name printed in the email footer
    #[serde(default = "default_site_name")]
    pub site_name: String,

    /// Request timeout for the email API in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_requests() -> u32 {
    5
}

fn default_window_secs() -> u64 {
    60
}

fn default_max_name_len() -> usize {
    100
}

fn default_max_email_len() -> usize {
    254
}

fn default_max_company_len() -> usize {
    200
}

fn default_max_interest_len() -> usize {
    100
}

fn default_max_message_len() -> usize {
    2000
}

fn default_api_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_from() -> String {
    "Contact Form <onboarding@resend.dev>".to_string()
}

fn default_to() -> Vec<String> {
    vec!["marco.krebs.84@googlemail.com".to_string()]
}

fn default_site_name() -> String {
    "marcokrebs-consulting.de".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_name_len: default_max_name_len(),
            max_email_len: default_max_email_len(),
            max_company_len: default_max_company_len(),
            max_interest_len: default_max_interest_len(),
            max_message_len: default_max_message_len(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl MailConfig {
    /// Mail settings with every default filled in around the given key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: default_api_url(),
            from: default_from(),
            to: default_to(),
            site_name: default_site_name(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Get the email API request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RateLimitConfig {
    /// Get the rate window duration, clamped to [`MAX_WINDOW_SECS`]
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs.min(MAX_WINDOW_SECS))
    }
}

impl Config {
    /// Configuration with defaults everywhere except the API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            validation: ValidationConfig::default(),
            mail: MailConfig::with_api_key(api_key),
            metrics: MetricsConfig::default(),
            expose_error_details: false,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `RESEND_API_KEY` is required; every other variable falls back to its
    /// default. Unparsable values are rejected rather than silently ignored.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("RESEND_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar("RESEND_API_KEY"))?;

        let mut config = Self::with_api_key(api_key);

        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(url) = lookup("RESEND_API_URL") {
            config.mail.api_url = url;
        }
        if let Some(from) = lookup("CONTACT_FROM") {
            config.mail.from = from;
        }
        if let Some(to) = lookup("CONTACT_TO") {
            config.mail.to = to
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(site) = lookup("CONTACT_SITE_NAME") {
            config.mail.site_name = site;
        }

        config.rate_limit.max_requests =
            parse_var(&lookup, "RATE_LIMIT_MAX_REQUESTS", config.rate_limit.max_requests)?;
        config.rate_limit.window_secs =
            parse_var(&lookup, "RATE_LIMIT_WINDOW_SECS", config.rate_limit.window_secs)?;
        config.mail.timeout_secs =
            parse_var(&lookup, "MAIL_TIMEOUT_SECS", config.mail.timeout_secs)?;
        config.expose_error_details =
            parse_var(&lookup, "EXPOSE_ERROR_DETAILS", config.expose_error_details)?;
        config.metrics.enabled = parse_var(&lookup, "METRICS_ENABLED", config.metrics.enabled)?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;

        url::Url::parse(&self.mail.api_url).map_err(|e| ConfigError::InvalidValue {
            var: "RESEND_API_URL",
            reason: e.to_string(),
        })?;

        if self.mail.to.is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "CONTACT_TO",
                reason: "at least one recipient is required".to_string(),
            });
        }
        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::InvalidValue {
                var: "RATE_LIMIT_MAX_REQUESTS",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(1..=MAX_WINDOW_SECS).contains(&self.rate_limit.window_secs) {
            return Err(ConfigError::InvalidValue {
                var: "RATE_LIMIT_WINDOW_SECS",
                reason: format!("must be between 1 and {MAX_WINDOW_SECS}"),
            });
        }
        Ok(())
    }

    /// Parsed bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                var: "BIND_ADDR",
                reason: e.to_string(),
            })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            var,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
