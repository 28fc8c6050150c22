//! Splits a draft budget into bounded chunks and folds chunk counts into one tally.
//!
//! The batch size bounds memory (host or device buffers), not correctness: any batch size
//! yields the same distribution of the final estimate.

use tracing::debug;

use crate::core::{EstimationError, SimulationTally, TrialSet};

use super::backend::DraftSimulator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchScheduler {
    batch_size: u64,
}

impl BatchScheduler {
    pub fn new(batch_size: u64) -> Result<Self, EstimationError> {
        if batch_size == 0 {
            return Err(EstimationError::InvalidInput(
                "batch_size must be > 0".to_string(),
            ));
        }
        Ok(Self { batch_size })
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    pub fn num_chunks(&self, drafts: u64) -> u64 {
        drafts.div_ceil(self.batch_size)
    }

    /// Consecutive chunk sizes; all equal `batch_size` except possibly the last.
    pub fn chunks(&self, drafts: u64) -> impl Iterator<Item = u64> {
        let batch = self.batch_size;
        (0..drafts.div_ceil(batch)).map(move |i| (drafts - i * batch).min(batch))
    }

    /// Runs every chunk through `simulator` in order.
    ///
    /// `on_chunk` observes the tally after each chunk; the invariant
    /// `count_1 + count_0 == drafts executed so far` holds at every call.
    pub fn run<S, F>(
        &self,
        simulator: &mut S,
        trials: &TrialSet,
        limit: i64,
        drafts: u64,
        mut on_chunk: F,
    ) -> SimulationTally
    where
        S: DraftSimulator + ?Sized,
        F: FnMut(usize, &SimulationTally),
    {
        let mut tally = SimulationTally::new();
        for (index, chunk) in self.chunks(drafts).enumerate() {
            let ones = simulator.simulate(trials, limit, chunk);
            debug_assert!(
                ones <= chunk,
                "{} reported {ones} ones for a chunk of {chunk}",
                simulator.name()
            );
            tally.record(chunk, ones);
            debug!(
                backend = simulator.name(),
                chunk = index,
                size = chunk,
                ones,
                drafts_done = tally.drafts(),
                p1 = tally.probability_one(),
                "chunk complete"
            );
            on_chunk(index, &tally);
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reports every other draft as outcome 1 and remembers the chunk sizes it saw.
    struct Alternating {
        seen: Vec<u64>,
    }

    impl DraftSimulator for Alternating {
        fn name(&self) -> &'static str {
            "alternating"
        }

        fn simulate(&mut self, _trials: &TrialSet, _limit: i64, drafts: u64) -> u64 {
            self.seen.push(drafts);
            drafts / 2
        }
    }

    struct Overcounting;

    impl DraftSimulator for Overcounting {
        fn name(&self) -> &'static str {
            "overcounting"
        }

        fn simulate(&mut self, _trials: &TrialSet, _limit: i64, drafts: u64) -> u64 {
            drafts + 1
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "overcounting reported")]
    fn backend_reporting_too_many_ones_is_caught() {
        let trials = TrialSet::new(&[1, 2, 3]).unwrap();
        let scheduler = BatchScheduler::new(5).unwrap();
        scheduler.run(&mut Overcounting, &trials, 2, 10, |_, _| {});
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(BatchScheduler::new(0).is_err());
    }

    #[test]
    fn chunks_cover_the_budget_exactly() {
        let scheduler = BatchScheduler::new(4).unwrap();
        assert_eq!(scheduler.chunks(10).collect::<Vec<_>>(), vec![4, 4, 2]);
        assert_eq!(scheduler.chunks(8).collect::<Vec<_>>(), vec![4, 4]);
        assert_eq!(scheduler.chunks(3).collect::<Vec<_>>(), vec![3]);
        assert_eq!(scheduler.chunks(0).count(), 0);
        assert_eq!(scheduler.num_chunks(10), 3);
    }

    #[test]
    fn tally_invariant_holds_after_every_chunk() {
        let trials = TrialSet::new(&[1, 2, 3]).unwrap();
        let scheduler = BatchScheduler::new(7).unwrap();
        let mut sim = Alternating { seen: Vec::new() };
        let mut observed = Vec::new();

        let tally = scheduler.run(&mut sim, &trials, 2, 30, |index, tally| {
            observed.push((index, tally.drafts()));
        });

        assert_eq!(sim.seen, vec![7, 7, 7, 7, 2]);
        assert_eq!(observed, vec![(0, 7), (1, 14), (2, 21), (3, 28), (4, 30)]);
        assert_eq!(tally.drafts(), 30);
        assert_eq!(tally.count_1, 3 * 4 + 1);
        assert_eq!(tally.count_0, 30 - tally.count_1);
    }
}
