use std::{
    env,
    num::NonZeroUsize,
    process::ExitCode,
    time::{Instant, SystemTime, UNIX_EPOCH},
};

use driver::{
    BrokerConfig, BrokerWorkerPool, DriverConfig, IterativeDriver, JobConf, JobId, Matrix, Result,
    ROW_BLOCK_COMBINER, check_operands,
};
use log::{error, info};
use pubsub::EntityKind;

const JOB_PREFIX: &str = "fully-in-mem-mat-mult";

const USAGE: &str = "\
usage: driver <matrix A> <matrix B> <output> <num workers> <num iterations> <block size>
  <matrix A>        binary file of the left operand
  <matrix B>        binary file of the right operand
  <output>          binary file the product is written to
  <num workers>     amount of column blocks of B, one per daemon
  <num iterations>  amount of row blocks of A, one per round
  <block size>      tile size of the daemons' local product, tunes cache use only

environment:
  BROKER              NaradaBrokering (default) or ActiveMQ
  BROKER_ADDR         broker endpoint, defaults to the backend's
  ROUND_TIMEOUT_SECS  bound on every round, defaults to 600
  RUST_LOG            log verbosity";

struct CliArgs {
    a_path: String,
    b_path: String,
    out_path: String,
    config: DriverConfig,
}

impl CliArgs {
    fn parse(args: &[String]) -> Option<Self> {
        let [a_path, b_path, out_path, workers, iterations, block_size] = args else {
            return None;
        };

        let config = DriverConfig::new(
            workers.parse::<NonZeroUsize>().ok()?,
            iterations.parse::<NonZeroUsize>().ok()?,
            block_size.parse::<NonZeroUsize>().ok()?,
        );

        Some(Self {
            a_path: a_path.clone(),
            b_path: b_path.clone(),
            out_path: out_path.clone(),
            config: config.with_env_timeout(),
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(cli) = CliArgs::parse(&args) else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: CliArgs) -> Result<()> {
    let a = Matrix::load(&cli.a_path).await?;
    let b = Matrix::load(&cli.b_path).await?;
    check_operands(&a, &b)?;

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let job_id = JobId::new(JOB_PREFIX, timestamp, rand::random());

    let conf = JobConf {
        job_id: job_id.clone(),
        num_map_tasks: cli.config.num_workers.get(),
        num_reduce_tasks: 1,
        combiner: ROW_BLOCK_COMBINER.to_string(),
        block_size: cli.config.block_size.get(),
        final_width: b.width(),
    };

    let transport = pubsub::select_transport(&BrokerConfig::from_env(), EntityKind::Driver, 0)?;
    let pool = BrokerWorkerPool::connect(transport, conf).await?;
    let mut driver = IterativeDriver::new(pool, cli.config, job_id);

    let started = Instant::now();
    let product = driver.run(a, b).await?;
    info!("matrix multiplication took {:?}", started.elapsed());

    for row in product.corner(3) {
        info!("{row:?}");
    }

    product.save(&cli.out_path).await?;
    info!("product written to {}", cli.out_path);
    Ok(())
}
