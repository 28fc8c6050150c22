use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::EstimationError;
use crate::math::probability::{PARAMETER_SCALE, success_probability};

/// Validated trial parameters `p_i` together with their success probabilities `q_i`.
///
/// Read-only for the whole computation. Cloning is cheap; workers and device streams
/// share the same buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialSet {
    parameters: Arc<[u16]>,
    probabilities: Arc<[f64]>,
}

impl TrialSet {
    /// Validates every parameter against `[0, 10000]` and derives `q_i`.
    pub fn new(parameters: &[i64]) -> Result<Self, EstimationError> {
        let mut validated = Vec::with_capacity(parameters.len());
        for (index, &value) in parameters.iter().enumerate() {
            if !(0..=PARAMETER_SCALE).contains(&value) {
                return Err(EstimationError::ParameterOutOfRange { index, value });
            }
            validated.push(value as u16);
        }
        let probabilities = parameters
            .iter()
            .map(|&p| success_probability(p))
            .collect::<Vec<_>>();

        Ok(Self {
            parameters: validated.into(),
            probabilities: probabilities.into(),
        })
    }

    /// Number of trials `n`.
    #[inline]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Trial parameters `p_i` in input order.
    #[inline]
    pub fn parameters(&self) -> &[u16] {
        &self.parameters
    }

    /// Success probabilities `q_i` in input order.
    #[inline]
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }
}

/// Running outcome counts of a Monte Carlo run.
///
/// Only grows; `count_1 + count_0` always equals the drafts recorded so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationTally {
    pub count_1: u64,
    pub count_0: u64,
}

impl SimulationTally {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one completed chunk of `drafts` drafts of which `ones` had outcome 1.
    #[inline]
    pub fn record(&mut self, drafts: u64, ones: u64) {
        debug_assert!(ones <= drafts, "chunk reported {ones} ones out of {drafts}");
        self.count_1 += ones;
        self.count_0 += drafts - ones;
    }

    #[inline]
    pub fn drafts(&self) -> u64 {
        self.count_1 + self.count_0
    }

    /// Observed P(1); `NaN` before any draft.
    #[inline]
    pub fn probability_one(&self) -> f64 {
        self.count_1 as f64 / self.drafts() as f64
    }

    /// Observed P(0); `NaN` before any draft.
    #[inline]
    pub fn probability_zero(&self) -> f64 {
        self.count_0 as f64 / self.drafts() as f64
    }
}

/// Estimate after a completed chunk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergencePoint {
    pub drafts: u64,
    pub probability_one: f64,
}

/// Compact key set for run diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagKey {
    BatchSize,
    ElapsedSeconds,
    NumBatches,
    NumDrafts,
    NumStreams,
    NumTrials,
    NumWorkers,
}

impl DiagKey {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BatchSize => "batch_size",
            Self::ElapsedSeconds => "elapsed_seconds",
            Self::NumBatches => "num_batches",
            Self::NumDrafts => "num_drafts",
            Self::NumStreams => "num_streams",
            Self::NumTrials => "num_trials",
            Self::NumWorkers => "num_workers",
        }
    }
}

impl std::str::FromStr for DiagKey {
    type Err = ();

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
            "batch_size" => Ok(Self::BatchSize),
            "elapsed_seconds" => Ok(Self::ElapsedSeconds),
            "num_batches" => Ok(Self::NumBatches),
            "num_drafts" => Ok(Self::NumDrafts),
            "num_streams" => Ok(Self::NumStreams),
            "num_trials" => Ok(Self::NumTrials),
            "num_workers" => Ok(Self::NumWorkers),
            _ => Err(()),
        }
    }
}

/// Inline diagnostics storage used in Monte Carlo estimates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    entries: [Option<(DiagKey, f64)>; 8],
}

impl Diagnostics {
    pub const CAPACITY: usize = 8;

    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries[0].is_none()
    }

    /// Inserts or replaces a value; returns the previous one.
    ///
    /// Every `DiagKey` fits, so the fixed capacity is never exceeded.
    #[inline]
    pub fn insert_key(&mut self, key: DiagKey, value: f64) -> Option<f64> {
        for (entry_key, existing) in self.entries.iter_mut().flatten() {
            if *entry_key == key {
                let prev = *existing;
                *existing = value;
                return Some(prev);
            }
        }

        if let Some(slot) = self.entries.iter_mut().find(|entry| entry.is_none()) {
            *slot = Some((key, value));
        }
        None
    }

    #[inline]
    fn iter_entries(&self) -> impl Iterator<Item = &(DiagKey, f64)> {
        self.entries.iter().filter_map(Option::as_ref)
    }

    #[inline]
    pub fn get_key(&self, key: DiagKey) -> Option<f64> {
        self.iter_entries()
            .find_map(|(entry_key, value)| (*entry_key == key).then_some(*value))
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<f64> {
        self.get_key(key.parse().ok()?)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.iter_entries().map(|(k, v)| (k.as_str(), *v))
    }
}
