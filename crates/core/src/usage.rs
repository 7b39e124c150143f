//! Derived token usage of the current sequence.

use serde::{Deserialize, Serialize};

use crate::block::MessageBlock;

/// Ratio at which the usage bar starts signalling that the deck is filling up.
pub const FILLING_THRESHOLD: f64 = 0.75;

/// Token totals computed from a sequence. Never patched incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageAggregate {
    pub total_tokens: u64,
    pub capacity: u64,
    /// `total_tokens / capacity`; exceeds 1.0 when over budget.
    pub usage_ratio: f64,
}

/// Coarse reading of the usage ratio for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageLevel {
    Comfortable,
    Filling,
    Overflowing,
}

impl UsageAggregate {
    /// Recompute from scratch over `blocks`.
    pub fn compute(blocks: &[MessageBlock], capacity: u64) -> Self {
        let total_tokens: u64 = blocks.iter().map(|b| u64::from(b.token_cost())).sum();
        let usage_ratio = if capacity == 0 {
            0.0
        } else {
            total_tokens as f64 / capacity as f64
        };
        Self {
            total_tokens,
            capacity,
            usage_ratio,
        }
    }

    /// Tokens left before the budget is reached (zero once over).
    pub fn remaining(&self) -> u64 {
        self.capacity.saturating_sub(self.total_tokens)
    }

    pub fn is_over_capacity(&self) -> bool {
        self.total_tokens > self.capacity
    }

    pub fn level(&self) -> UsageLevel {
        if self.usage_ratio > 1.0 {
            UsageLevel::Overflowing
        } else if self.usage_ratio >= FILLING_THRESHOLD {
            UsageLevel::Filling
        } else {
            UsageLevel::Comfortable
        }
    }

    /// Usage as a percentage, unclamped.
    pub fn percent(&self) -> f64 {
        self.usage_ratio * 100.0
    }
}
