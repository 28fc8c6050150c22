//! Exact Poisson-binomial threshold probabilities by in-place DP convolution.
//!
//! For independent `X_i ~ Bernoulli(q_i)` and `S = sum X_i`, the mass vector `f[k] = P(S = k)`
//! is built one trial at a time:
//!
//! ```text
//! f'[k] = f[k] (1 - q_i) + f[k - 1] q_i    (k >= 1)
//! f'[0] = f[0] (1 - q_i)
//! ```
//!
//! Only `f[0..L]` is kept when the target is `P(S < L)`; mass that moves past `L - 1` is
//! dropped, which leaves `sum f = P(S < L)` after the last trial. Cost is `O(n L)` time and
//! `O(L)` space.

use crate::core::{EstimationError, TrialSet};

/// Applies one trial to a mass vector in place.
///
/// `f'` is a function of the old `f` only. Walking from the top index down reads `f[k - 1]`
/// before it is overwritten, so no slot sees a value already updated for this trial.
#[inline]
fn convolve_trial(f: &mut [f64], q: f64, top: usize) {
    let stay = 1.0 - q;
    for k in (1..=top).rev() {
        f[k] = f[k] * stay + f[k - 1] * q;
    }
    f[0] *= stay;
}

/// Mass vector of `S` truncated to `f[0..limit]`.
///
/// Returns an empty vector for `limit <= 0`. The width is capped at `n + 1`, so any
/// `limit > n` yields the complete distribution.
pub fn truncated_pmf(q: &[f64], limit: i64) -> Vec<f64> {
    if limit <= 0 {
        return Vec::new();
    }
    let n = q.len();
    let width = usize::try_from(limit).map_or(n + 1, |w| w.min(n + 1));

    let mut f = vec![0.0_f64; width];
    f[0] = 1.0;
    let top = (width - 1).min(n);
    for &qi in q {
        convolve_trial(&mut f, qi, top);
    }
    f
}

/// Full probability mass function `P(S = k)` for `k = 0..=n`.
pub fn pmf(q: &[f64]) -> Vec<f64> {
    truncated_pmf(q, q.len() as i64 + 1)
}

/// Exact `P(S < limit)` for success probabilities `q`.
///
/// `limit <= 0` gives exactly `0.0` and `limit > n` exactly `1.0`. Probabilities are
/// expected in `[0, 1]`; they are not re-validated here.
pub fn cdf_less_than(q: &[f64], limit: i64) -> f64 {
    let n = q.len();
    if limit <= 0 {
        return 0.0;
    }
    if limit > n as i64 {
        return 1.0;
    }
    // Rounding can push the sum of a complete mass vector just past 1.
    truncated_pmf(q, limit).iter().sum::<f64>().clamp(0.0, 1.0)
}

/// Exact `P(S < limit)` for trial parameters on the `[0, 10000]` scale.
///
/// ```rust
/// use poibin::engines::analytic::exact_probability;
///
/// // q = 0 for every trial, so S is always 0.
/// assert_eq!(exact_probability(&[10_000, 10_000, 10_000], 1).unwrap(), 1.0);
/// assert_eq!(exact_probability(&[10_000, 10_000, 10_000], 0).unwrap(), 0.0);
/// ```
pub fn exact_probability(parameters: &[i64], limit: i64) -> Result<f64, EstimationError> {
    let trials = TrialSet::new(parameters)?;
    Ok(cdf_less_than(trials.probabilities(), limit))
}
