// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form payloads.

use crate::sanitize::escape_html;
use serde::{Deserialize, Deserializer, Serialize};

/// Raw contact form submission as sent by the browser.
///
/// Missing and `null` fields deserialize as empty strings so that validation
/// reports them as required instead of the body being rejected outright.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub interested_in: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A submission whose fields have all been HTML-escaped.
///
/// Only constructed through [`ContactSubmission::sanitize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedSubmission {
    name: String,
    email: String,
    company: String,
    interested_in: String,
    message: String,
}

impl ContactSubmission {
    /// Escape every field for embedding in HTML.
    pub fn sanitize(&self) -> SanitizedSubmission {
        SanitizedSubmission {
            name: escape_html(&self.name),
            email: escape_html(&self.email),
            company: escape_html(&self.company),
            interested_in: escape_html(&self.interested_in),
            message: escape_html(&self.message),
        }
    }
}

impl SanitizedSubmission {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn interested_in(&self) -> &str {
        &self.interested_in
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
