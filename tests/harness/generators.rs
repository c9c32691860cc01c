// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for flood simulation.

use contact_gate::submission::ContactSubmission;

/// Generate a pool of caller identities for testing.
pub fn generate_identities(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = (i >> 16) & 0xFF;
            let b = (i >> 8) & 0xFF;
            let c = i & 0xFF;
            format!("10.{}.{}.{}", a, b, c)
        })
        .collect()
}

/// A well-formed submission, numbered so senders can tell them apart.
pub fn generate_valid_submission(i: usize) -> ContactSubmission {
    ContactSubmission {
        name: format!("Visitor {}", i),
        email: format!("visitor{}@example.com", i),
        company: format!("Company {}", i),
        interested_in: "strategic-project".to_string(),
        message: format!("Message number {}", i),
    }
}

/// Markup and script injection attempts for the free-text fields.
pub fn generate_injection_payloads() -> Vec<&'static str> {
    vec![
        "<script>alert(1)</script>",
        "<img src=x onerror=alert(1)>",
        "\"><svg onload=alert(1)>",
        "' onmouseover='alert(1)",
        "<a href=\"javascript:alert(1)\">click</a>",
        "&lt;script&gt; already escaped",
        "<iframe src=//evil.example></iframe>",
    ]
}

/// Email values that must be rejected.
pub fn generate_malformed_emails() -> Vec<&'static str> {
    vec![
        "",
        "   ",
        "not-an-email",
        "foo@bar",
        "@example.com",
        "user@",
        "user@@example.com",
        "user name@example.com",
        "user@example.",
        "<script>@x.y z",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_identities() {
        let ids = generate_identities(256);
        assert_eq!(ids.len(), 256);
        // All should be unique
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 256);
    }
}
