//! Token cost sources for synthesized blocks.
//!
//! Costs are synthetic: a new block gets a value drawn from the configured
//! range. The draw sits behind `TokenCostSource` so tests and reproducible
//! CLI runs can pin the numbers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

use crate::settings::CostRange;

/// Supplies the token cost of each newly inserted block.
pub trait TokenCostSource: Send {
    /// Return a cost inside `range` (inclusive).
    fn next_cost(&mut self, range: CostRange) -> u32;
}

/// Uniformly random costs.
pub struct RandomCost {
    seeded: Option<StdRng>,
}

impl RandomCost {
    /// Draw from the thread-local RNG.
    pub fn new() -> Self {
        Self { seeded: None }
    }

    /// Draw from a seeded RNG so a run can be replayed exactly.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seeded: Some(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomCost {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCostSource for RandomCost {
    fn next_cost(&mut self, range: CostRange) -> u32 {
        match &mut self.seeded {
            Some(rng) => rng.random_range(range.min..=range.max),
            None => rand::rng().random_range(range.min..=range.max),
        }
    }
}

/// Always the same cost, clamped into the range.
#[derive(Debug, Clone, Copy)]
pub struct FixedCost(pub u32);

impl TokenCostSource for FixedCost {
    fn next_cost(&mut self, range: CostRange) -> u32 {
        range.clamp(self.0)
    }
}

/// Hands out a queue of costs in order, then falls back to `range.min`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCost {
    costs: VecDeque<u32>,
}

impl ScriptedCost {
    pub fn new(costs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            costs: costs.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.costs.len()
    }
}

impl TokenCostSource for ScriptedCost {
    fn next_cost(&mut self, range: CostRange) -> u32 {
        self.costs
            .pop_front()
            .map(|c| range.clamp(c))
            .unwrap_or(range.min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_cost_stays_in_range() {
        let range = CostRange::default();
        let mut source = RandomCost::new();
        for _ in 0..500 {
            assert!(range.contains(source.next_cost(range)));
        }
    }

    #[test]
    fn seeded_random_is_reproducible() {
        let range = CostRange::default();
        let mut a = RandomCost::seeded(42);
        let mut b = RandomCost::seeded(42);
        let xs: Vec<u32> = (0..20).map(|_| a.next_cost(range)).collect();
        let ys: Vec<u32> = (0..20).map(|_| b.next_cost(range)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn degenerate_range_always_hits_the_single_value() {
        let range = CostRange { min: 9, max: 9 };
        let mut source = RandomCost::seeded(1);
        assert_eq!(source.next_cost(range), 9);
    }

    #[test]
    fn fixed_cost_is_clamped() {
        let range = CostRange::default();
        assert_eq!(FixedCost(10).next_cost(range), 10);
        assert_eq!(FixedCost(1000).next_cost(range), 24);
    }

    #[test]
    fn scripted_cost_drains_then_falls_back() {
        let range = CostRange::default();
        let mut source = ScriptedCost::new([11, 6]);
        assert_eq!(source.next_cost(range), 11);
        assert_eq!(source.next_cost(range), 6);
        assert_eq!(source.remaining(), 0);
        assert_eq!(source.next_cost(range), 5);
    }
}
