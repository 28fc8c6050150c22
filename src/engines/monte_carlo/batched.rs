//! Batched backend over one or more independent device streams.
//!
//! Each stream owns its generator and a drop-count buffer sized to its share of the chunk.
//! Sampling proceeds one trial column at a time: a block of uniforms `u` is drawn for all
//! drafts of the share, and every draft with `u >= q_i` records a drop. A draft is outcome 1
//! when its drop count reaches `needed_drops = n - limit + 1`, which is the same event as
//! `successes < limit`.
//!
//! One stream is the single-device variant, two streams the dual-device variant; the
//! partition-and-reduce logic is shared. A chunk is split with `ceil(m / S)` on the first
//! stream, streams run concurrently (with the `parallel` feature), and the chunk completes
//! once every stream has reported its partial count.
//!
//! Draws compare against `q_i` on a continuous scale instead of against `p_i` on the
//! integer scale, so outcomes match the sequential backend in distribution only.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::{EstimationError, TrialSet};
use crate::math::fast_rng::{FastRng, FastRngKind, stream_seed};
use crate::math::probability::needed_drops;

use super::backend::DraftSimulator;

/// One independent execution stream.
#[derive(Debug, Clone)]
pub struct BatchStream {
    rng: FastRng,
    drops: Vec<u32>,
}

impl BatchStream {
    pub fn new(index: usize, rng_kind: FastRngKind, base_seed: u64) -> Self {
        Self {
            rng: FastRng::from_seed(rng_kind, stream_seed(base_seed, index)),
            drops: Vec::new(),
        }
    }

    /// Simulates `drafts` drafts and returns the number with at least `needed_drops` drops.
    pub fn run(&mut self, probabilities: &[f64], needed_drops: i64, drafts: usize) -> u64 {
        if drafts == 0 {
            return 0;
        }
        if self.drops.len() == drafts {
            self.drops.fill(0);
        } else {
            self.drops = vec![0; drafts];
        }

        for &q in probabilities {
            for drop in self.drops.iter_mut() {
                *drop += u32::from(self.rng.random_f64() >= q);
            }
        }

        self.drops
            .iter()
            .filter(|&&d| i64::from(d) >= needed_drops)
            .count() as u64
    }
}

/// Split of a chunk across streams: the first `m % S` streams take one extra draft.
pub fn split_across_streams(drafts: u64, streams: usize) -> Vec<usize> {
    let streams = streams.max(1);
    let base = (drafts / streams as u64) as usize;
    let remainder = (drafts % streams as u64) as usize;
    (0..streams)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

#[derive(Debug, Clone)]
pub struct BatchedSimulator {
    streams: Vec<BatchStream>,
}

impl BatchedSimulator {
    /// Creates `streams` streams seeded from `base_seed` with distinct stream seeds.
    pub fn new(
        streams: usize,
        rng_kind: FastRngKind,
        base_seed: u64,
    ) -> Result<Self, EstimationError> {
        if streams == 0 {
            return Err(EstimationError::InvalidInput(
                "batched backend needs at least one stream".to_string(),
            ));
        }
        Ok(Self::with_streams(streams, rng_kind, base_seed))
    }

    pub fn single_device(rng_kind: FastRngKind, base_seed: u64) -> Self {
        Self::with_streams(1, rng_kind, base_seed)
    }

    pub fn dual_device(rng_kind: FastRngKind, base_seed: u64) -> Self {
        Self::with_streams(2, rng_kind, base_seed)
    }

    fn with_streams(count: usize, rng_kind: FastRngKind, base_seed: u64) -> Self {
        Self {
            streams: (0..count)
                .map(|i| BatchStream::new(i, rng_kind, base_seed))
                .collect(),
        }
    }

    pub fn num_streams(&self) -> usize {
        self.streams.len()
    }
}

impl DraftSimulator for BatchedSimulator {
    fn name(&self) -> &'static str {
        match self.streams.len() {
            1 => "batched_single",
            2 => "batched_dual",
            _ => "batched_multi",
        }
    }

    fn parallelism(&self) -> usize {
        self.streams.len()
    }

    fn simulate(&mut self, trials: &TrialSet, limit: i64, drafts: u64) -> u64 {
        let probabilities = trials.probabilities();
        let needed = needed_drops(trials.len(), limit);
        let shares = split_across_streams(drafts, self.streams.len());

        #[cfg(feature = "parallel")]
        let total = self
            .streams
            .par_iter_mut()
            .zip(shares.par_iter())
            .map(|(stream, &m)| stream.run(probabilities, needed, m))
            .sum::<u64>();

        #[cfg(not(feature = "parallel"))]
        let total = self
            .streams
            .iter_mut()
            .zip(shares.iter())
            .map(|(stream, &m)| stream.run(probabilities, needed, m))
            .sum::<u64>();

        total
    }
}
