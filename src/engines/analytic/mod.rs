//! Closed-form engines.

pub mod poisson_binomial;

pub use poisson_binomial::{cdf_less_than, exact_probability, pmf, truncated_pmf};
