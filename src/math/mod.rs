//! Random-number generation and probability helpers shared by the engines.

pub mod fast_rng;
pub mod probability;

pub use probability::{
    DRAW_CARDINALITY, PARAMETER_SCALE, needed_drops, success_probabilities, success_probability,
};
