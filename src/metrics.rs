// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for gate outcomes.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Outcome labels used on `contact_gate_requests_total`.
pub const OUTCOMES: &[&str] = &[
    "accepted",
    "invalid",
    "invalid_body",
    "rate_limited",
    "downstream_failure",
];

/// Gate metrics in a private registry.
pub struct GateMetrics {
    registry: Registry,
    requests: IntCounterVec,
}

impl GateMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        let requests = IntCounterVec::new(
            Opts::new(
                "contact_gate_requests_total",
                "Contact submissions by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(requests.clone()))?;

        // Pre-create every series so dashboards see zeros
        for outcome in OUTCOMES {
            requests.with_label_values(&[*outcome]);
        }

        Ok(Self { registry, requests })
    }

    pub fn record(&self, outcome: &str) {
        self.requests.with_label_values(&[outcome]).inc();
    }

    pub fn count(&self, outcome: &str) -> u64 {
        self.requests.with_label_values(&[outcome]).get()
    }

    /// Render the registry in the Prometheus text format.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
