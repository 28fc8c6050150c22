//! Conversion from trial parameters to success probabilities, and Bernoulli-proportion
//! statistics shared by the engines.

/// Size of the parameter scale. Draws `R_i` are uniform on `0..=PARAMETER_SCALE`.
pub const PARAMETER_SCALE: i64 = 10_000;

/// Number of equally likely values of one draw `R_i`.
pub const DRAW_CARDINALITY: u64 = PARAMETER_SCALE as u64 + 1;

/// Two-sided 95% normal quantile.
const Z_95: f64 = 1.959_963_984_540_054;

/// Success probability `q = clip((10000 - p) / 10001, 0, 1)` of a single trial.
///
/// This is exactly `P(p < R)` for `R` uniform on `0..=10000`.
#[inline]
pub fn success_probability(parameter: i64) -> f64 {
    let raw = (PARAMETER_SCALE as f64 - parameter as f64) / DRAW_CARDINALITY as f64;
    raw.clamp(0.0, 1.0)
}

/// Elementwise [`success_probability`], preserving trial order.
pub fn success_probabilities(parameters: &[i64]) -> Vec<f64> {
    parameters.iter().map(|&p| success_probability(p)).collect()
}

/// Minimum number of failed trials ("drops") that makes a draft count as outcome 1.
///
/// With `n` trials, `successes < limit` holds exactly when `n - successes >= n - limit + 1`.
/// The value can be `<= 0` (every draft is outcome 1) or `> n` (no draft is). It saturates
/// at the `i64` bounds, which keeps both meanings for extreme limits.
#[inline]
pub fn needed_drops(num_trials: usize, limit: i64) -> i64 {
    (num_trials as i64).saturating_sub(limit).saturating_add(1)
}

/// Binomial standard error `sqrt(p (1 - p) / n)` of an observed proportion.
pub fn proportion_stderr(successes: u64, total: u64) -> f64 {
    if total == 0 {
        return f64::NAN;
    }
    let n = total as f64;
    let p = successes as f64 / n;
    (p * (1.0 - p) / n).max(0.0).sqrt()
}

/// 95% normal-approximation confidence interval for an observed proportion, clipped to `[0, 1]`.
pub fn proportion_confidence_95(successes: u64, total: u64) -> (f64, f64) {
    if total == 0 {
        return (f64::NAN, f64::NAN);
    }
    let p = successes as f64 / total as f64;
    let half = Z_95 * proportion_stderr(successes, total);
    ((p - half).max(0.0), (p + half).min(1.0))
}
