//! Core domain types, run configuration, and the library-wide error type.

pub mod error;
pub mod serialization;
pub mod types;

pub use error::EstimationError;
pub use serialization::*;
pub use types::*;
