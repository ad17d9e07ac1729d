use comms::{
    CacheKey, DenseBlock, Deserialize, Serialize,
    msg::{Command, Msg, Payload},
};
use log::{debug, info, warn};
use pubsub::Transport;

use crate::{CombinedResult, JobConf, Result, RoundHandle, RoundStatus, WorkerPool};

/// A `WorkerPool` spoken to through a publish/subscribe broker.
///
/// Topics, relative to the job id:
/// * `daemons` - broadcast to every daemon (job conf, dynamic blocks, rounds, eviction).
/// * `daemons/{i}` - the static block of daemon `i`.
/// * `driver` - round results and completion signals back to the driver.
pub struct BrokerWorkerPool {
    transport: Box<dyn Transport>,
    conf: JobConf,
    daemons_topic: String,
    driver_topic: String,
    next_cache_no: u64,
    next_round: u64,
    results: CombinedResult,
    closed: bool,
}

impl BrokerWorkerPool {
    /// Connects `transport` and subscribes to the driver topic of the job.
    ///
    /// # Arguments
    /// * `transport` - A selected, not yet connected, transport.
    /// * `conf` - The job configuration, shipped along the static blocks.
    ///
    /// # Returns
    /// The pool or the transport error that prevented the connection.
    pub async fn connect(mut transport: Box<dyn Transport>, conf: JobConf) -> Result<Self> {
        let job = conf.job_id.as_str();
        let daemons_topic = transport.topic(&[job, "daemons"]);
        let driver_topic = transport.topic(&[job, "driver"]);

        transport.connect().await?;
        if let Err(e) = transport.subscribe(&driver_topic).await {
            let _ = transport.close().await;
            return Err(e.into());
        }

        info!(job_id = job, client_id = transport.client_id(); "worker pool ready");

        Ok(Self {
            transport,
            conf,
            daemons_topic,
            driver_topic,
            next_cache_no: 0,
            next_round: 0,
            results: CombinedResult::new(),
            closed: false,
        })
    }

    async fn broadcast(&mut self, msg: &Msg) -> Result<()> {
        let body = msg.to_bytes();
        self.transport.publish(&self.daemons_topic, &body).await?;
        Ok(())
    }
}

impl WorkerPool for BrokerWorkerPool {
    async fn configure_static(&mut self, blocks: Vec<DenseBlock>) -> Result<()> {
        let conf = Msg::Data(Payload::JobConf(self.conf.to_params()));
        self.broadcast(&conf).await?;

        let job = self.conf.job_id.as_str();
        for block in blocks {
            let daemon = block.coord().index().to_string();
            let topic = self.transport.topic(&[job, "daemons", &daemon]);
            let body = Msg::Data(Payload::StaticBlock(block)).to_bytes();
            self.transport.publish(&topic, &body).await?;
        }

        Ok(())
    }

    async fn cache_dynamic(&mut self, block: DenseBlock) -> Result<CacheKey> {
        let key = CacheKey(format!("{}-cache-{}", self.conf.job_id, self.next_cache_no));
        self.next_cache_no += 1;

        let msg = Msg::Data(Payload::DynamicBlock {
            key: key.clone(),
            block,
        });
        self.broadcast(&msg).await?;
        Ok(key)
    }

    async fn evict_dynamic(&mut self, key: &CacheKey) -> Result<()> {
        let msg = Msg::Control(Command::Evict { key: key.clone() });
        self.broadcast(&msg).await
    }

    async fn run_round_broadcast(&mut self, key: &CacheKey) -> Result<RoundHandle> {
        let round = self.next_round;
        self.next_round += 1;
        self.results.clear();

        let msg = Msg::Control(Command::RunRound {
            round,
            key: key.clone(),
        });
        self.broadcast(&msg).await?;

        debug!(round = round, cache_key = key.as_str(); "round broadcast");
        Ok(RoundHandle {
            round,
            key: key.clone(),
        })
    }

    async fn await_completion(&mut self, handle: &RoundHandle) -> Result<RoundStatus> {
        loop {
            let delivery = self.transport.next_delivery().await?;
            if delivery.topic != self.driver_topic {
                debug!("ignoring delivery on {}", delivery.topic);
                continue;
            }

            match Msg::deserialize(&delivery.body)? {
                Msg::Data(Payload::RoundResult { round, key, block }) if round == handle.round => {
                    if self.results.insert(key.clone(), block).is_some() {
                        warn!(round = round; "result {key} was sent twice, keeping the last one");
                    }
                }
                Msg::Control(Command::RoundDone {
                    round,
                    success,
                    detail,
                }) if round == handle.round => {
                    return Ok(match success {
                        true => RoundStatus::Success,
                        false => RoundStatus::Failure {
                            detail: detail.unwrap_or_else(|| "no detail given".to_string()),
                        },
                    });
                }
                Msg::Err(detail) => return Ok(RoundStatus::Failure { detail }),
                msg => debug!(round = handle.round; "ignoring stale {} message", msg.kind()),
            }
        }
    }

    async fn round_result(&mut self) -> Result<CombinedResult> {
        Ok(std::mem::take(&mut self.results))
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let ended = self.broadcast(&Msg::Control(Command::EndJob)).await;
        let closed = self.transport.close().await;

        info!(job_id = self.conf.job_id.as_str(); "worker pool released");
        ended?;
        closed?;
        Ok(())
    }
}
