//! Worker-pool backend.
//!
//! A chunk of `m` drafts is split across `W` workers of a dedicated rayon pool; the first
//! worker also takes the `m % W` remainder. Every worker receives a read-only view of the
//! trial parameters and a private generator seeded from `(base_seed, chunk, worker)`, runs
//! its share to completion and returns a scalar count. The driver only sums the counts.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::core::{EstimationError, TrialSet};
use crate::math::fast_rng::{FastRng, FastRngKind, stream_seed};

use super::backend::DraftSimulator;
use super::sequential::simulate_drafts;

/// Even split of `drafts` over `workers`, remainder on the first worker.
pub fn split_drafts(drafts: u64, workers: usize) -> Vec<u64> {
    let workers = workers.max(1);
    let base = drafts / workers as u64;
    let remainder = drafts % workers as u64;
    let mut shares = vec![base; workers];
    shares[0] += remainder;
    shares
}

pub struct WorkerPoolSimulator {
    pool: ThreadPool,
    workers: usize,
    rng_kind: FastRngKind,
    base_seed: u64,
    chunks_run: usize,
}

impl std::fmt::Debug for WorkerPoolSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPoolSimulator")
            .field("workers", &self.workers)
            .field("rng_kind", &self.rng_kind)
            .field("base_seed", &self.base_seed)
            .field("chunks_run", &self.chunks_run)
            .finish()
    }
}

impl WorkerPoolSimulator {
    /// Builds a pool of `workers` threads; `None` uses the available parallelism.
    pub fn new(
        workers: Option<usize>,
        rng_kind: FastRngKind,
        base_seed: u64,
    ) -> Result<Self, EstimationError> {
        let workers = match workers {
            Some(0) => {
                return Err(EstimationError::InvalidInput(
                    "workers must be > 0".to_string(),
                ));
            }
            Some(w) => w,
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        };

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("poibin-worker-{i}"))
            .build()
            .map_err(|e| EstimationError::WorkerPool(e.to_string()))?;

        Ok(Self {
            pool,
            workers,
            rng_kind,
            base_seed,
            chunks_run: 0,
        })
    }
}

impl DraftSimulator for WorkerPoolSimulator {
    fn name(&self) -> &'static str {
        "worker_pool"
    }

    fn parallelism(&self) -> usize {
        self.workers
    }

    fn simulate(&mut self, trials: &TrialSet, limit: i64, drafts: u64) -> u64 {
        let shares = split_drafts(drafts, self.workers);
        let first_stream = self.chunks_run * self.workers;
        self.chunks_run += 1;

        let kind = self.rng_kind;
        let base_seed = self.base_seed;
        let parameters = trials.parameters();

        self.pool.install(|| {
            shares
                .par_iter()
                .enumerate()
                .filter(|&(_, &share)| share > 0)
                .map(|(worker, &share)| {
                    let seed = stream_seed(base_seed, first_stream + worker);
                    let mut rng = FastRng::from_seed(kind, seed);
                    simulate_drafts(&mut rng, parameters, limit, share)
                })
                .sum::<u64>()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remainder_goes_to_the_first_worker() {
        assert_eq!(split_drafts(10, 3), vec![4, 3, 3]);
        assert_eq!(split_drafts(2, 4), vec![2, 0, 0, 0]);
        assert_eq!(split_drafts(12, 4), vec![3, 3, 3, 3]);
        assert_eq!(split_drafts(0, 2).iter().sum::<u64>(), 0);
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(matches!(
            WorkerPoolSimulator::new(Some(0), FastRngKind::default(), 1),
            Err(EstimationError::InvalidInput(_))
        ));
    }

    #[test]
    fn results_do_not_depend_on_thread_scheduling() {
        let trials = TrialSet::new(&[4667, 4400, 4000, 4000, 1304, 2128]).unwrap();
        let kind = FastRngKind::Xoshiro256PlusPlus;
        let mut a = WorkerPoolSimulator::new(Some(4), kind, 77).unwrap();
        let mut b = WorkerPoolSimulator::new(Some(4), kind, 77).unwrap();
        for _ in 0..3 {
            assert_eq!(a.simulate(&trials, 4, 20_001), b.simulate(&trials, 4, 20_001));
        }
    }

    #[test]
    fn chunks_draw_from_fresh_streams() {
        let trials = TrialSet::new(&[5_000; 10]).unwrap();
        let mut sim = WorkerPoolSimulator::new(Some(2), FastRngKind::Pcg64, 3).unwrap();
        let counts = (0..4)
            .map(|_| sim.simulate(&trials, 5, 5_000))
            .collect::<Vec<_>>();
        assert!(counts.windows(2).any(|w| w[0] != w[1]), "counts={counts:?}");
    }

    #[test]
    fn degenerate_trials_are_exact() {
        let trials = TrialSet::new(&[10_000; 5]).unwrap();
        let mut sim = WorkerPoolSimulator::new(Some(3), FastRngKind::StdRng, 1).unwrap();
        assert_eq!(sim.simulate(&trials, 1, 9_999), 9_999);
        assert_eq!(sim.simulate(&trials, 0, 9_999), 0);
    }
}
