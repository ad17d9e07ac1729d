#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use comms::{CacheKey, DenseBlock, Key};
use driver::{CombinedResult, Matrix, Result, RoundHandle, RoundStatus, WorkerPool};
use pubsub::frame::BrokerFrame;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::mpsc,
};

/// Builds a `height x width` matrix holding `0, 1, 2, ...` in row-major order.
pub fn counting(height: usize, width: usize) -> Matrix {
    let data = (0..height * width).map(|v| v as f64).collect();
    Matrix::new(height, width, data).unwrap()
}

/// What a combiner yields for one round: the row block times every column
/// block, stitched in column order.
pub fn combine(row: &DenseBlock, columns: &[DenseBlock]) -> DenseBlock {
    let lhs = Matrix::from(row.clone());
    let partials: Vec<Matrix> = columns
        .iter()
        .map(|col| lhs.multiply(&Matrix::from(col.clone())).unwrap())
        .collect();

    let width = partials.iter().map(Matrix::width).sum();
    let mut data = Vec::with_capacity(row.height() * width);
    for i in 0..row.height() {
        for partial in &partials {
            data.extend_from_slice(partial.row(i));
        }
    }

    DenseBlock::new(row.height(), width, row.coord(), data).unwrap()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Calls {
    pub configure_static: usize,
    pub cache_dynamic: usize,
    pub evict_dynamic: usize,
    pub run_round_broadcast: usize,
    pub await_completion: usize,
    pub round_result: usize,
    pub close: usize,
}

/// An in-process worker pool that counts every call it gets.
#[derive(Default)]
pub struct MockPool {
    pub calls: Calls,
    pub max_cached: usize,
    statics: Vec<DenseBlock>,
    cached: HashMap<CacheKey, DenseBlock>,
    results: CombinedResult,
    next_round: u64,
    fail_round: Option<u64>,
    empty_round: Option<u64>,
    hang: bool,
}

impl MockPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports a failure for `round` instead of computing it.
    pub fn failing_at(round: u64) -> Self {
        Self {
            fail_round: Some(round),
            ..Self::default()
        }
    }

    /// Completes `round` successfully but without any result.
    pub fn empty_at(round: u64) -> Self {
        Self {
            empty_round: Some(round),
            ..Self::default()
        }
    }

    /// Never signals the completion of any round.
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    pub fn cached(&self) -> usize {
        self.cached.len()
    }
}

impl WorkerPool for MockPool {
    async fn configure_static(&mut self, mut blocks: Vec<DenseBlock>) -> Result<()> {
        self.calls.configure_static += 1;
        blocks.sort_by_key(|b| b.coord().index());
        self.statics = blocks;
        Ok(())
    }

    async fn cache_dynamic(&mut self, block: DenseBlock) -> Result<CacheKey> {
        self.calls.cache_dynamic += 1;
        let key = CacheKey(format!("mock-cache-{}", self.calls.cache_dynamic));
        self.cached.insert(key.clone(), block);
        self.max_cached = self.max_cached.max(self.cached.len());
        Ok(key)
    }

    async fn evict_dynamic(&mut self, key: &CacheKey) -> Result<()> {
        self.calls.evict_dynamic += 1;
        self.cached.remove(key);
        Ok(())
    }

    async fn run_round_broadcast(&mut self, key: &CacheKey) -> Result<RoundHandle> {
        self.calls.run_round_broadcast += 1;
        let round = self.next_round;
        self.next_round += 1;
        self.results.clear();
        Ok(RoundHandle {
            round,
            key: key.clone(),
        })
    }

    async fn await_completion(&mut self, handle: &RoundHandle) -> Result<RoundStatus> {
        self.calls.await_completion += 1;

        if self.hang {
            std::future::pending::<()>().await;
        }

        if self.fail_round == Some(handle.round) {
            return Ok(RoundStatus::Failure {
                detail: format!("daemon crashed in round {}", handle.round),
            });
        }

        if self.empty_round != Some(handle.round) {
            let row = &self.cached[&handle.key];
            let block = combine(row, &self.statics);
            self.results.insert(Key::Int(handle.round as i32), block);
        }

        Ok(RoundStatus::Success)
    }

    async fn round_result(&mut self) -> Result<CombinedResult> {
        self.calls.round_result += 1;
        Ok(std::mem::take(&mut self.results))
    }

    async fn close(&mut self) -> Result<()> {
        self.calls.close += 1;
        Ok(())
    }
}

type Subscribers = Arc<Mutex<HashMap<String, Vec<mpsc::UnboundedSender<BrokerFrame>>>>>;

/// Spawns a minimal topic router on an ephemeral port and returns its address.
pub async fn spawn_broker() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let subs = Subscribers::default();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(serve(stream, subs.clone()));
        }
    });

    addr
}

async fn serve(stream: TcpStream, subs: Subscribers) {
    let (rx, tx) = stream.into_split();
    let (mut rx, mut tx) = comms::channel(rx, tx);
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<BrokerFrame>();

    tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if tx.send(&frame).await.is_err() {
                return;
            }
        }
    });

    while let Ok(frame) = rx.recv::<BrokerFrame>().await {
        match frame {
            BrokerFrame::Hello { .. } => {}
            BrokerFrame::Subscribe { topic } => {
                subs.lock().unwrap().entry(topic).or_default().push(out_tx.clone());
            }
            BrokerFrame::Publish { topic, body } => {
                let targets = subs.lock().unwrap().get(&topic).cloned().unwrap_or_default();
                for target in targets {
                    let _ = target.send(BrokerFrame::Deliver {
                        topic: topic.clone(),
                        body: body.clone(),
                    });
                }
            }
            BrokerFrame::Bye | BrokerFrame::Deliver { .. } => break,
        }
    }
}
