//! Reference backend: one draft at a time on the calling thread.
//!
//! Each draft draws `R_i` uniformly from `0..=10000` and counts trials with `p_i < R_i`.
//! This is the direct formulation the other backends are checked against.

use crate::core::TrialSet;
use crate::math::fast_rng::{FastRng, FastRngKind};
use crate::math::probability::DRAW_CARDINALITY;

use super::backend::DraftSimulator;

/// Outcome of one draft: `true` when fewer than `limit` trials succeed.
#[inline]
pub fn simulate_draft(rng: &mut FastRng, parameters: &[u16], limit: i64) -> bool {
    let successes = parameters
        .iter()
        .filter(|&&p| u64::from(p) < rng.random_below(DRAW_CARDINALITY))
        .count();
    (successes as i64) < limit
}

/// Runs `drafts` drafts on one stream and returns the number with outcome 1.
pub fn simulate_drafts(rng: &mut FastRng, parameters: &[u16], limit: i64, drafts: u64) -> u64 {
    let mut ones = 0_u64;
    for _ in 0..drafts {
        if simulate_draft(rng, parameters, limit) {
            ones += 1;
        }
    }
    ones
}

#[derive(Debug, Clone)]
pub struct SequentialSimulator {
    rng: FastRng,
}

impl SequentialSimulator {
    pub fn new(kind: FastRngKind, seed: u64) -> Self {
        Self {
            rng: FastRng::from_seed(kind, seed),
        }
    }
}

impl DraftSimulator for SequentialSimulator {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn simulate(&mut self, trials: &TrialSet, limit: i64, drafts: u64) -> u64 {
        simulate_drafts(&mut self.rng, trials.parameters(), limit, drafts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_reproduces_counts() {
        let trials = TrialSet::new(&[4667, 4400, 4000, 1304, 857]).unwrap();
        let mut a = SequentialSimulator::new(FastRngKind::Xoshiro256PlusPlus, 5);
        let mut b = SequentialSimulator::new(FastRngKind::Xoshiro256PlusPlus, 5);
        assert_eq!(a.simulate(&trials, 3, 10_000), b.simulate(&trials, 3, 10_000));
    }

    #[test]
    fn consecutive_chunks_continue_the_stream() {
        let trials = TrialSet::new(&[5_000; 8]).unwrap();
        let mut sim = SequentialSimulator::new(FastRngKind::Pcg64, 9);
        let first = sim.simulate(&trials, 4, 2_000);
        let second = sim.simulate(&trials, 4, 2_000);
        let mut fresh = SequentialSimulator::new(FastRngKind::Pcg64, 9);
        assert_eq!(fresh.simulate(&trials, 4, 4_000), first + second);
    }

    #[test]
    fn certain_trials_have_no_variance() {
        let never = TrialSet::new(&[10_000; 6]).unwrap();
        let always = TrialSet::new(&[0; 6]).unwrap();
        let mut sim = SequentialSimulator::new(FastRngKind::StdRng, 1);

        assert_eq!(sim.simulate(&never, 1, 1_000), 1_000);
        assert_eq!(sim.simulate(&never, 0, 1_000), 0);
        // p = 0 fails only when R = 0, so S = n almost always but not surely.
        let ones = sim.simulate(&always, 6, 100_000);
        assert!(ones < 200, "ones={ones}");
        assert_eq!(sim.simulate(&always, 7, 1_000), 1_000);
    }
}
