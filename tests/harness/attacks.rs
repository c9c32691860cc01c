// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Flood patterns for security testing.

/// Flood pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of submissions to send
    pub total_requests: usize,
    /// Number of unique caller identities
    pub unique_identities: usize,
    /// Whether submissions pass validation
    pub valid_payload: bool,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            unique_identities: 1,
            valid_payload: true,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// Single identity flood - one caller hammering the form.
    pub fn single_identity_flood() -> Self {
        Self {
            total_requests: 200,
            unique_identities: 1,
            ..Default::default()
        }
    }

    /// Distributed flood - many callers, few submissions each.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 500,
            unique_identities: 100,
            ..Default::default()
        }
    }

    /// Junk flood - invalid payloads still consume quota.
    pub fn junk_flood() -> Self {
        Self {
            total_requests: 50,
            unique_identities: 5,
            valid_payload: false,
        }
    }

    /// Most submissions that may get through within one window.
    pub fn max_admitted(&self, quota: usize) -> usize {
        self.unique_identities.min(self.total_requests) * quota
    }
}
