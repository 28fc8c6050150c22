//! Serde payloads for Monte Carlo run configuration, with JSON helpers.
//!
//! # Examples
//! ```rust
//! use poibin::core::{BackendKind, McConfig, from_json, to_json_pretty};
//! use poibin::math::fast_rng::FastRngKind;
//!
//! let config = McConfig {
//!     drafts: 1_000_000,
//!     batch_size: Some(250_000),
//!     seed: 20250818,
//!     backend: BackendKind::dual_device(),
//!     rng: FastRngKind::Pcg64,
//!     record_history: true,
//! };
//!
//! let json = to_json_pretty(&config).expect("json serialization");
//! let decoded: McConfig = from_json(&json).expect("json deserialization");
//! assert_eq!(decoded, config);
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::EstimationError;
use crate::math::fast_rng::FastRngKind;

/// Default chunk size of the sequential backend.
pub const SEQUENTIAL_BATCH: u64 = 1_000_000;
/// Default chunk size of the worker-pool backend.
pub const WORKER_POOL_BATCH: u64 = 10_000_000;
/// Default chunk size per device stream of the batched backend.
pub const BATCHED_BATCH_PER_STREAM: u64 = 10_000_000;

/// Execution backend selection. One backend per run; there is no fallback between them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendKind {
    /// One draft at a time on the calling thread.
    #[default]
    Sequential,
    /// Fixed-size pool of independent workers; `None` uses the available parallelism.
    #[cfg(feature = "parallel")]
    WorkerPool { workers: Option<usize> },
    /// Column-streamed batched sampling over `streams` independent device streams.
    Batched { streams: usize },
}

impl BackendKind {
    pub fn single_device() -> Self {
        Self::Batched { streams: 1 }
    }

    pub fn dual_device() -> Self {
        Self::Batched { streams: 2 }
    }

    /// Backend-specific default chunk size.
    pub fn default_batch_size(&self) -> u64 {
        match self {
            Self::Sequential => SEQUENTIAL_BATCH,
            #[cfg(feature = "parallel")]
            Self::WorkerPool { .. } => WORKER_POOL_BATCH,
            Self::Batched { streams } => {
                BATCHED_BATCH_PER_STREAM.saturating_mul((*streams).max(1) as u64)
            }
        }
    }
}

/// Full description of one Monte Carlo run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McConfig {
    /// Total number of drafts.
    pub drafts: u64,
    /// Chunk size; `None` selects [`BackendKind::default_batch_size`].
    #[serde(default)]
    pub batch_size: Option<u64>,
    pub seed: u64,
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default)]
    pub rng: FastRngKind,
    /// Record the per-chunk convergence trace.
    #[serde(default = "default_record_history")]
    pub record_history: bool,
}

fn default_record_history() -> bool {
    true
}

impl McConfig {
    pub fn new(drafts: u64, seed: u64) -> Self {
        Self {
            drafts,
            batch_size: None,
            seed,
            backend: BackendKind::default(),
            rng: FastRngKind::default(),
            record_history: true,
        }
    }

    /// Chunk size actually used by the scheduler.
    pub fn effective_batch_size(&self) -> u64 {
        self.batch_size
            .unwrap_or_else(|| self.backend.default_batch_size())
    }
}

pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, EstimationError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, EstimationError> {
    Ok(serde_json::from_str(json)?)
}
