use std::fmt::{self, Display};

use comms::{JobParameters, PayloadErr};

use crate::Result;

const JOB_ID: &str = "job_id";
const NUM_MAP_TASKS: &str = "num_map_tasks";
const NUM_REDUCE_TASKS: &str = "num_reduce_tasks";
const COMBINER: &str = "combiner";
const BLOCK_SIZE: &str = "block_size";
const FINAL_WIDTH: &str = "final_width";

/// The combiner that stitches the partial blocks of a round into one row block.
pub const ROW_BLOCK_COMBINER: &str = "row_block";

/// Unique name of a job, also the root of its topics and cache keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    /// Builds a job id as `{prefix}-{timestamp:x}-{salt:08x}`.
    ///
    /// # Arguments
    /// * `prefix` - Human readable name of the job kind.
    /// * `timestamp_millis` - Creation time, milliseconds since the epoch.
    /// * `salt` - Random salt telling apart jobs created in the same millisecond.
    pub fn new(prefix: &str, timestamp_millis: u64, salt: u32) -> Self {
        Self(format!("{prefix}-{timestamp_millis:x}-{salt:08x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Job configuration shipped to every daemon before the static blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConf {
    pub job_id: JobId,
    pub num_map_tasks: usize,
    pub num_reduce_tasks: usize,
    pub combiner: String,
    /// Tile size of the local block product, tunes cache locality only.
    pub block_size: usize,
    /// Width of the final output, the sum of every static block width.
    pub final_width: usize,
}

impl JobConf {
    /// Encodes the configuration as job parameters.
    pub fn to_params(&self) -> JobParameters {
        let mut params = JobParameters::new();
        params.insert(JOB_ID, self.job_id.as_str());
        params.insert(NUM_MAP_TASKS, self.num_map_tasks.to_string());
        params.insert(NUM_REDUCE_TASKS, self.num_reduce_tasks.to_string());
        params.insert(COMBINER, self.combiner.as_str());
        params.insert(BLOCK_SIZE, self.block_size.to_string());
        params.insert(FINAL_WIDTH, self.final_width.to_string());
        params
    }

    /// Decodes a configuration out of job parameters.
    ///
    /// # Returns
    /// The configuration or `MalformedPayload` if an entry is missing or isn't a
    /// valid number.
    pub fn from_params(params: &JobParameters) -> Result<Self> {
        Ok(Self {
            job_id: JobId(text(params, JOB_ID)?.to_string()),
            num_map_tasks: number(params, NUM_MAP_TASKS)?,
            num_reduce_tasks: number(params, NUM_REDUCE_TASKS)?,
            combiner: text(params, COMBINER)?.to_string(),
            block_size: number(params, BLOCK_SIZE)?,
            final_width: number(params, FINAL_WIDTH)?,
        })
    }
}

fn text<'a>(params: &'a JobParameters, field: &'static str) -> Result<&'a str> {
    let raw = params.get(field).ok_or(PayloadErr::MissingField { field })?;
    Ok(std::str::from_utf8(raw).map_err(|_| PayloadErr::InvalidUtf8 { field })?)
}

fn number(params: &JobParameters, field: &'static str) -> Result<usize> {
    let raw = text(params, field)?;
    raw.parse()
        .map_err(|_| PayloadErr::InvalidInteger(raw.to_string()).into())
}
