//! Monte Carlo estimation engines.
//!
//! A run is a [`BatchScheduler`] feeding bounded chunks to one [`DraftSimulator`] backend
//! and folding the per-chunk counts into a [`SimulationTally`](crate::core::SimulationTally).

pub mod backend;
pub mod batched;
pub mod engine;
pub mod scheduler;
pub mod sequential;
#[cfg(feature = "parallel")]
pub mod worker_pool;

pub use backend::DraftSimulator;
pub use batched::{BatchStream, BatchedSimulator};
pub use engine::{McEstimate, MonteCarloEngine};
pub use scheduler::BatchScheduler;
pub use sequential::SequentialSimulator;
#[cfg(feature = "parallel")]
pub use worker_pool::WorkerPoolSimulator;
