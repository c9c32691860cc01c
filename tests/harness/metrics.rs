// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outcome tallies for flood simulation results.

use contact_gate::gate::Outcome;
use std::collections::HashMap;

/// Possible outcomes for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Accepted,
    Invalid,
    RateLimited,
    DownstreamFailure,
}

impl From<&Outcome> for Kind {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Accepted { .. } => Kind::Accepted,
            Outcome::Invalid { .. } => Kind::Invalid,
            Outcome::RateLimited { .. } => Kind::RateLimited,
            Outcome::DownstreamFailure { .. } => Kind::DownstreamFailure,
        }
    }
}

/// Collects outcomes during a simulation.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    outcomes: HashMap<Kind, usize>,
    requests_per_identity: HashMap<String, usize>,
}

impl AttackMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &Outcome, identity: &str) {
        *self.outcomes.entry(Kind::from(outcome)).or_insert(0) += 1;
        *self
            .requests_per_identity
            .entry(identity.to_string())
            .or_insert(0) += 1;
    }

    pub fn count(&self, kind: Kind) -> usize {
        self.outcomes.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.outcomes.values().sum()
    }

    pub fn unique_identities(&self) -> usize {
        self.requests_per_identity.len()
    }

    /// Ratio of requests not accepted.
    pub fn block_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (total - self.count(Kind::Accepted)) as f64 / total as f64
    }
}

impl std::fmt::Display for AttackMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Flood Report ===")?;
        writeln!(f, "Total Requests:    {}", self.total())?;
        writeln!(f, "Accepted:          {}", self.count(Kind::Accepted))?;
        writeln!(f, "Invalid:           {}", self.count(Kind::Invalid))?;
        writeln!(f, "Rate Limited:      {}", self.count(Kind::RateLimited))?;
        writeln!(f, "Downstream Failed: {}", self.count(Kind::DownstreamFailure))?;
        writeln!(f, "Block Rate:        {:.1}%", self.block_rate() * 100.0)?;
        writeln!(f, "Unique Identities: {}", self.unique_identities())?;
        Ok(())
    }
}
