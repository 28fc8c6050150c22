//! Monte Carlo estimation of `P(S < L)` with a configurable execution backend.

use std::time::Instant;

use tracing::{debug_span, info};

use crate::core::{
    BackendKind, ConvergencePoint, DiagKey, Diagnostics, EstimationError, McConfig,
    SimulationTally, TrialSet,
};
use crate::math::fast_rng::FastRngKind;
use crate::math::probability::{proportion_confidence_95, proportion_stderr};

use super::backend::DraftSimulator;
use super::batched::BatchedSimulator;
use super::scheduler::BatchScheduler;
use super::sequential::SequentialSimulator;
#[cfg(feature = "parallel")]
use super::worker_pool::WorkerPoolSimulator;

/// Outcome of one Monte Carlo run.
#[derive(Debug, Clone, PartialEq)]
pub struct McEstimate {
    /// Final outcome counts; `count_1 + count_0` equals the requested drafts.
    pub tally: SimulationTally,
    /// Estimated `P(S < L)`.
    pub probability_one: f64,
    pub probability_zero: f64,
    /// Binomial standard error of `probability_one`.
    pub stderr: f64,
    /// 95% normal confidence interval of `probability_one`.
    pub confidence_95: (f64, f64),
    /// Running estimate after each chunk, when enabled.
    pub history: Vec<ConvergencePoint>,
    pub diagnostics: Diagnostics,
}

/// Monte Carlo engine configured once and reusable across inputs.
///
/// ```rust
/// use poibin::core::BackendKind;
/// use poibin::engines::monte_carlo::MonteCarloEngine;
///
/// let engine = MonteCarloEngine::new(200_000, 7)
///     .with_backend(BackendKind::single_device())
///     .with_batch_size(50_000);
/// let est = engine.estimate(&[5_000, 5_000, 5_000, 5_000], 2).unwrap();
///
/// assert_eq!(est.tally.count_1 + est.tally.count_0, 200_000);
/// assert!((est.probability_one - 0.3124).abs() < 0.01);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MonteCarloEngine {
    config: McConfig,
}

impl MonteCarloEngine {
    pub fn new(drafts: u64, seed: u64) -> Self {
        Self {
            config: McConfig::new(drafts, seed),
        }
    }

    pub fn from_config(config: McConfig) -> Self {
        Self { config }
    }

    pub fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.config.batch_size = Some(batch_size);
        self
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.config.backend = backend;
        self
    }

    pub fn with_rng_kind(mut self, rng: FastRngKind) -> Self {
        self.config.rng = rng;
        self
    }

    pub fn with_history(mut self, record_history: bool) -> Self {
        self.config.record_history = record_history;
        self
    }

    pub fn config(&self) -> &McConfig {
        &self.config
    }

    /// Instantiates the configured backend with fresh generator state.
    pub fn build_simulator(&self) -> Result<Box<dyn DraftSimulator>, EstimationError> {
        let seed = self.config.seed;
        let rng = self.config.rng;
        let simulator: Box<dyn DraftSimulator> = match self.config.backend {
            BackendKind::Sequential => Box::new(SequentialSimulator::new(rng, seed)),
            #[cfg(feature = "parallel")]
            BackendKind::WorkerPool { workers } => {
                Box::new(WorkerPoolSimulator::new(workers, rng, seed)?)
            }
            BackendKind::Batched { streams } => {
                Box::new(BatchedSimulator::new(streams, rng, seed)?)
            }
        };
        Ok(simulator)
    }

    /// Validates trial parameters and estimates `P(S < limit)`.
    pub fn estimate(
        &self,
        parameters: &[i64],
        limit: i64,
    ) -> Result<McEstimate, EstimationError> {
        let trials = TrialSet::new(parameters)?;
        self.estimate_trials(&trials, limit)
    }

    /// Estimates `P(S < limit)` for an already validated trial set.
    pub fn estimate_trials(
        &self,
        trials: &TrialSet,
        limit: i64,
    ) -> Result<McEstimate, EstimationError> {
        let drafts = self.config.drafts;
        if drafts == 0 {
            return Err(EstimationError::InvalidInput(
                "drafts must be > 0".to_string(),
            ));
        }
        let scheduler = BatchScheduler::new(self.config.effective_batch_size())?;
        let mut simulator = self.build_simulator()?;

        let span = debug_span!(
            "mc_estimate",
            backend = simulator.name(),
            trials = trials.len(),
            limit,
            drafts
        );
        let _guard = span.enter();

        let started = Instant::now();
        let record_history = self.config.record_history;
        let mut history = Vec::new();
        let tally = scheduler.run(&mut simulator, trials, limit, drafts, |_, tally| {
            if record_history {
                history.push(ConvergencePoint {
                    drafts: tally.drafts(),
                    probability_one: tally.probability_one(),
                });
            }
        });
        let elapsed = started.elapsed().as_secs_f64();

        let mut diagnostics = Diagnostics::new();
        diagnostics.insert_key(DiagKey::NumDrafts, drafts as f64);
        diagnostics.insert_key(DiagKey::NumTrials, trials.len() as f64);
        diagnostics.insert_key(DiagKey::BatchSize, scheduler.batch_size() as f64);
        diagnostics.insert_key(DiagKey::NumBatches, scheduler.num_chunks(drafts) as f64);
        match self.config.backend {
            BackendKind::Sequential => {}
            #[cfg(feature = "parallel")]
            BackendKind::WorkerPool { .. } => {
                diagnostics.insert_key(DiagKey::NumWorkers, simulator.parallelism() as f64);
            }
            BackendKind::Batched { .. } => {
                diagnostics.insert_key(DiagKey::NumStreams, simulator.parallelism() as f64);
            }
        }
        diagnostics.insert_key(DiagKey::ElapsedSeconds, elapsed);

        info!(
            count_1 = tally.count_1,
            count_0 = tally.count_0,
            p1 = tally.probability_one(),
            elapsed_seconds = elapsed,
            "monte carlo run complete"
        );

        Ok(McEstimate {
            tally,
            probability_one: tally.probability_one(),
            probability_zero: tally.probability_zero(),
            stderr: proportion_stderr(tally.count_1, drafts),
            confidence_95: proportion_confidence_95(tally.count_1, drafts),
            history,
            diagnostics,
        })
    }
}
