//! Client side control plane of an iterative broadcast matrix product.
//!
//! The right operand is cut in column blocks cached once by the workers, the
//! left operand in row blocks broadcast one per round. Every round yields one
//! row block of the product, appended in round order.

pub mod assemble;
mod broker_pool;
pub mod configs;
mod driver;
mod error;
mod job;
mod matrix;
pub mod partition;
mod pool;

pub use broker_pool::BrokerWorkerPool;
pub use configs::{BrokerConfig, DriverConfig};
pub use driver::{DriverState, IterativeDriver, check_operands};
pub use error::{DriverErr, Result};
pub use job::{JobConf, JobId, ROW_BLOCK_COMBINER};
pub use matrix::Matrix;
pub use pool::{CombinedResult, RoundHandle, RoundStatus, WorkerPool};
