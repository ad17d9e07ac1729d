use std::time::Instant;

use comms::DenseBlock;
use log::{debug, info, warn};
use tokio::time;

use crate::{
    CombinedResult, DriverConfig, DriverErr, JobId, Matrix, Result, RoundStatus, WorkerPool,
    assemble, partition,
};

/// Progress of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Operands are being validated and split.
    Configuring,
    /// The static blocks are held by the workers.
    StaticDataLoaded,
    /// Round `i` is in progress.
    Iterating(usize),
    Completed,
    Failed,
}

/// Drives an iterative broadcast job computing `A * B` through a worker pool.
///
/// The column blocks of `B` are uploaded once, then every round caches one row
/// block of `A`, broadcasts it, and appends the combined row block of the
/// product to the output.
pub struct IterativeDriver<P: WorkerPool> {
    pool: P,
    config: DriverConfig,
    job_id: JobId,
    state: DriverState,
}

impl<P: WorkerPool> IterativeDriver<P> {
    /// Creates a new `IterativeDriver`.
    ///
    /// # Arguments
    /// * `pool` - The worker pool the job runs on, it's closed when the job ends.
    /// * `config` - The shape and pacing of the job.
    /// * `job_id` - The job's name, for logs.
    pub fn new(pool: P, config: DriverConfig, job_id: JobId) -> Self {
        Self {
            pool,
            config,
            job_id,
            state: DriverState::Configuring,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn pool(&self) -> &P {
        &self.pool
    }

    /// Runs the whole job. A driver runs a single job.
    ///
    /// The pool is closed exactly once whatever the outcome, and a partially
    /// assembled output is dropped on failure.
    ///
    /// # Arguments
    /// * `a` - The left operand, split in one row block per iteration.
    /// * `b` - The right operand, split in one column block per worker.
    ///
    /// # Returns
    /// The product or the first error that stopped the job.
    pub async fn run(&mut self, a: Matrix, b: Matrix) -> Result<Matrix> {
        let outcome = self.drive(a, b).await;
        let closed = self.pool.close().await;

        match (outcome, closed) {
            (Ok(output), Ok(())) => {
                self.state = DriverState::Completed;
                info!(job_id = self.job_id.as_str(); "job completed");
                Ok(output)
            }
            (Ok(_), Err(e)) => {
                self.state = DriverState::Failed;
                warn!(job_id = self.job_id.as_str(); "failed to release the worker pool: {e}");
                Err(e)
            }
            (Err(e), closed) => {
                self.state = DriverState::Failed;
                if let Err(close_err) = closed {
                    warn!(job_id = self.job_id.as_str(); "failed to release the worker pool: {close_err}");
                }
                warn!(job_id = self.job_id.as_str(); "job failed: {e}");
                Err(e)
            }
        }
    }

    async fn drive(&mut self, a: Matrix, b: Matrix) -> Result<Matrix> {
        check_operands(&a, &b)?;

        let num_workers = self.config.num_workers.get();
        let num_iterations = self.config.num_iterations.get();
        info!(
            job_id = self.job_id.as_str(),
            workers = num_workers,
            iterations = num_iterations;
            "starting job over {}x{} * {}x{}",
            a.height(), a.width(), b.height(), b.width()
        );

        let started = Instant::now();
        let (height, width) = (a.height(), b.width());

        let columns = partition::split_columns(&b, num_workers)?;
        drop(b);
        let rows = partition::split_rows(&a, num_iterations)?;
        drop(a);

        let mut output = Matrix::zeros(height, width);
        info!("split operands in {:?}", started.elapsed());

        let started = Instant::now();
        self.pool.configure_static(columns).await?;
        self.state = DriverState::StaticDataLoaded;
        info!("uploaded {num_workers} static blocks in {:?}", started.elapsed());

        let started = Instant::now();
        let mut offset = 0;

        for (i, row_block) in rows.into_iter().enumerate() {
            self.state = DriverState::Iterating(i);
            offset = self.round(i, row_block, &mut output, offset).await?;
        }

        info!("ran {num_iterations} rounds in {:?}", started.elapsed());
        Ok(output)
    }

    /// Runs round `i` and appends its result at `offset`.
    ///
    /// # Returns
    /// The offset for the next round.
    async fn round(
        &mut self,
        i: usize,
        row_block: DenseBlock,
        output: &mut Matrix,
        offset: usize,
    ) -> Result<usize> {
        let key = self.pool.cache_dynamic(row_block).await?;
        let handle = self.pool.run_round_broadcast(&key).await?;

        let waited = self.config.round_timeout;
        let status = time::timeout(waited, self.pool.await_completion(&handle))
            .await
            .map_err(|_| DriverErr::RoundTimeout {
                iteration: i,
                waited,
            })??;

        if let RoundStatus::Failure { detail } = status {
            warn!(iteration = i, cache_key = key.as_str(); "round failed: {detail}");
            return Err(DriverErr::RoundFailure {
                iteration: i,
                detail,
            });
        }

        let result = self.pool.round_result().await?;
        self.pool.evict_dynamic(&key).await?;

        let Some(block) = pick_result(i, result) else {
            warn!(iteration = i, cache_key = key.as_str(); "round yielded no result");
            return Ok(offset);
        };

        let next = assemble::append(output, &block, offset)?;
        debug!(iteration = i, cache_key = key.as_str(), rows = block.height(); "appended round result");
        Ok(next)
    }
}

/// Checks that `a * b` is defined.
///
/// # Returns
/// `DimensionMismatch` if `a.width() != b.height()`.
pub fn check_operands(a: &Matrix, b: &Matrix) -> Result<()> {
    if a.width() != b.height() {
        return Err(DriverErr::DimensionMismatch {
            left_width: a.width(),
            right_height: b.height(),
        });
    }
    Ok(())
}

/// Picks the single result a round is expected to yield, the lowest key wins
/// if there are more.
fn pick_result(iteration: usize, mut result: CombinedResult) -> Option<DenseBlock> {
    if result.len() > 1 {
        let keys: Vec<_> = result.keys().map(ToString::to_string).collect();
        warn!(iteration = iteration; "round yielded {} results {keys:?}, keeping the lowest key", keys.len());
    }

    result.pop_first().map(|(_, block)| block)
}

#[cfg(test)]
mod tests {
    use comms::{BlockCoord, Key};

    use super::*;

    fn block(fill: f64) -> DenseBlock {
        DenseBlock::new(1, 1, BlockCoord::Row(0), vec![fill]).unwrap()
    }

    #[test]
    fn lowest_key_wins() {
        let result = CombinedResult::from([
            (Key::from("a"), block(3.0)),
            (Key::Int(7), block(2.0)),
            (Key::Int(-1), block(1.0)),
        ]);

        assert_eq!(pick_result(0, result), Some(block(1.0)));
    }

    #[test]
    fn no_result_is_none() {
        assert_eq!(pick_result(0, CombinedResult::new()), None);
    }
}
