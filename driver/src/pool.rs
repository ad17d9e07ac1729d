use std::collections::BTreeMap;

use comms::{CacheKey, DenseBlock, Key};

use crate::Result;

/// Every combined output of one round, ordered by key.
pub type CombinedResult = BTreeMap<Key, DenseBlock>;

/// Addresses one in-flight broadcast round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundHandle {
    pub round: u64,
    pub key: CacheKey,
}

/// The completion signal of a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundStatus {
    Success,
    Failure { detail: String },
}

impl RoundStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, RoundStatus::Success)
    }
}

/// The remote worker pool a job is driven through.
///
/// Rounds are strictly sequential: a new dynamic block is only cached once
/// the previous round was observed complete.
#[allow(unused)]
#[trait_variant::make(WorkerPool: Send)]
pub trait WorkerPoolTemplate {
    /// Uploads the blocks every worker keeps for the whole job.
    ///
    /// # Arguments
    /// * `blocks` - One block per worker, addressed by its coordinate.
    async fn configure_static(&mut self, blocks: Vec<DenseBlock>) -> Result<()>;

    /// Caches the dynamic block of the next round at every worker.
    ///
    /// # Returns
    /// The key the block was cached under.
    async fn cache_dynamic(&mut self, block: DenseBlock) -> Result<CacheKey>;

    /// Drops the dynamic block cached under `key`.
    async fn evict_dynamic(&mut self, key: &CacheKey) -> Result<()>;

    /// Starts a broadcast round over the dynamic block cached under `key`.
    async fn run_round_broadcast(&mut self, key: &CacheKey) -> Result<RoundHandle>;

    /// Waits until the round behind `handle` reports its completion.
    ///
    /// Returns `Err` only if the pool itself broke, a round that completed
    /// unsuccessfully is `Ok(RoundStatus::Failure)`.
    async fn await_completion(&mut self, handle: &RoundHandle) -> Result<RoundStatus>;

    /// Takes the combined output of the last completed round.
    async fn round_result(&mut self) -> Result<CombinedResult>;

    /// Releases every remote resource held for the job.
    ///
    /// Closing an already closed pool is a no-op.
    async fn close(&mut self) -> Result<()>;
}
