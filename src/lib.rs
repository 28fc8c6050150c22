//! Poibin estimates `P(S < L)` for a Poisson-binomial sum `S` of independent trials whose
//! success probabilities come from integer parameters on a `[0, 10000]` scale.
//!
//! Trial `i` succeeds when its parameter `p_i` is below an independent uniform draw
//! `R_i` on `0..=10000`, so its success probability is `q_i = (10000 - p_i) / 10001`.
//!
//! The crate answers the same question two ways:
//! - an exact `O(n L)` dynamic-programming convolution of the Bernoulli trials, and
//! - a Monte Carlo estimator that simulates drafts in bounded chunks on a selectable
//!   backend (sequential, worker pool, or batched over one or more device streams).
//!
//! Numerical considerations:
//! - The exact engine truncates the mass vector at `L`; the boundary cases `L <= 0` and
//!   `L > n` return exactly `0.0` and `1.0`.
//! - Monte Carlo error shrinks as `O(1 / sqrt(drafts))`; every estimate carries its binomial
//!   standard error and a 95% confidence interval.
//! - Backends agree in distribution only. The same seed does not give the same per-draft
//!   outcomes on two different backends.
//!
//! # Feature Flags
//! - `parallel` (default): enables the Rayon worker-pool backend and concurrent execution
//!   of batched device streams.
//!
//! # Quick Start
//! Exact probability:
//! ```rust
//! use poibin::engines::analytic::exact_probability;
//!
//! let p = [4667, 4400, 4000, 4000, 1304, 2128, 3103, 5217, 1111];
//! let prob = exact_probability(&p, 7).unwrap();
//! assert!(prob > 0.0 && prob < 1.0);
//! ```
//!
//! Monte Carlo estimate on two device streams:
//! ```rust
//! use poibin::core::BackendKind;
//! use poibin::engines::analytic::exact_probability;
//! use poibin::engines::monte_carlo::MonteCarloEngine;
//!
//! let p = [4667, 4400, 4000, 4000, 1304, 2128, 3103, 5217, 1111];
//! let exact = exact_probability(&p, 7).unwrap();
//! let est = MonteCarloEngine::new(400_000, 20250818)
//!     .with_backend(BackendKind::dual_device())
//!     .with_batch_size(100_000)
//!     .estimate(&p, 7)
//!     .unwrap();
//! assert!((est.probability_one - exact).abs() < 5.0 * est.stderr.max(1e-4));
//! ```

pub mod core;
pub mod engines;
pub mod math;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::core::*;
    pub use crate::engines::analytic::{cdf_less_than, exact_probability, pmf, truncated_pmf};
    pub use crate::engines::monte_carlo::{
        BatchScheduler, DraftSimulator, McEstimate, MonteCarloEngine,
    };
    pub use crate::math::fast_rng::FastRngKind;
}
