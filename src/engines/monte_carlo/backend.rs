use crate::core::TrialSet;

/// Capability shared by every execution backend: simulate `drafts` drafts of the trial set
/// and return how many had outcome 1 (`S < limit`).
///
/// Backends own their random-generator state, so consecutive calls continue their streams
/// rather than replaying them. Results from different backends agree in distribution only;
/// per-draft outcomes differ even for the same seed.
pub trait DraftSimulator: Send {
    /// Short backend identifier for diagnostics and logs.
    fn name(&self) -> &'static str;

    /// Number of independent workers or streams a chunk is spread over.
    fn parallelism(&self) -> usize {
        1
    }

    /// Runs one chunk. The returned count never exceeds `drafts`.
    fn simulate(&mut self, trials: &TrialSet, limit: i64, drafts: u64) -> u64;
}

impl<S: DraftSimulator + ?Sized> DraftSimulator for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn parallelism(&self) -> usize {
        (**self).parallelism()
    }

    fn simulate(&mut self, trials: &TrialSet, limit: i64, drafts: u64) -> u64 {
        (**self).simulate(trials, limit, drafts)
    }
}
