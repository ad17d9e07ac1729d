//! The job protocol spoken between the driver and the daemons.

use crate::{
    ByteReader, CacheKey, DenseBlock, Deserialize, JobParameters, Key, PayloadErr, Result,
    Serialize, cursor::write_prefixed,
};

type Header = u32;

const ERR_H: Header = 0;
const CONTROL_H: Header = 1;
const JOB_CONF_H: Header = 2;
const STATIC_BLOCK_H: Header = 3;
const DYNAMIC_BLOCK_H: Header = 4;
const ROUND_RESULT_H: Header = 5;

/// The command for the `Control` variant of the `Msg` enum.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Drop the dynamic block cached under `key`.
    Evict { key: CacheKey },
    /// Run one broadcast round over the dynamic block cached under `key`.
    RunRound { round: u64, key: CacheKey },
    /// Completion signal of a round, sent back to the driver.
    RoundDone {
        round: u64,
        success: bool,
        detail: Option<String>,
    },
    /// The job is over, daemons release everything they hold for it.
    EndJob,
}

/// The payload data for the `Data` variant of the `Msg` enum.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Serialized job configuration.
    JobConf(JobParameters),
    /// A block kept by one daemon for the whole job.
    StaticBlock(DenseBlock),
    /// A block cached for a single round.
    DynamicBlock { key: CacheKey, block: DenseBlock },
    /// One combined output of a round.
    RoundResult {
        round: u64,
        key: Key,
        block: DenseBlock,
    },
}

/// The application layer message of the job protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Control(Command),
    Data(Payload),
    Err(String),
}

impl Msg {
    /// Short name of the message kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Msg::Control(_) => "control",
            Msg::Err(_) => "err",
            Msg::Data(Payload::JobConf(_)) => "data/job_conf",
            Msg::Data(Payload::StaticBlock(_)) => "data/static_block",
            Msg::Data(Payload::DynamicBlock { .. }) => "data/dynamic_block",
            Msg::Data(Payload::RoundResult { .. }) => "data/round_result",
        }
    }
}

impl<'a> Serialize<'a> for Msg {
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]> {
        match self {
            Msg::Err(e) => {
                buf.extend_from_slice(&ERR_H.to_be_bytes());
                Some(e.as_bytes())
            }
            Msg::Control(cmd) => {
                buf.extend_from_slice(&CONTROL_H.to_be_bytes());

                // SAFETY: Serialize impl for `Command` is derived and not implemented
                //         by hand. Nor has a non string-key map inside.
                serde_json::to_writer(buf, cmd).unwrap();
                None
            }
            Msg::Data(Payload::JobConf(params)) => {
                buf.extend_from_slice(&JOB_CONF_H.to_be_bytes());
                params.serialize(buf)
            }
            Msg::Data(Payload::StaticBlock(block)) => {
                buf.extend_from_slice(&STATIC_BLOCK_H.to_be_bytes());
                block.serialize(buf)
            }
            Msg::Data(Payload::DynamicBlock { key, block }) => {
                buf.extend_from_slice(&DYNAMIC_BLOCK_H.to_be_bytes());
                write_prefixed(buf, key.as_str().as_bytes());
                block.serialize(buf)
            }
            Msg::Data(Payload::RoundResult { round, key, block }) => {
                buf.extend_from_slice(&ROUND_RESULT_H.to_be_bytes());
                buf.extend_from_slice(&round.to_be_bytes());
                write_prefixed(buf, &key.to_bytes());
                block.serialize(buf)
            }
        }
    }
}

impl Deserialize for Msg {
    fn deserialize(buf: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(buf);
        let kind = reader.read_u32("msg kind")?;

        match kind {
            ERR_H => {
                let detail = std::str::from_utf8(reader.read_rest())
                    .map_err(|_| PayloadErr::InvalidUtf8 { field: "err detail" })?;
                Ok(Msg::Err(detail.to_string()))
            }
            CONTROL_H => {
                let cmd = serde_json::from_slice(reader.read_rest())?;
                Ok(Msg::Control(cmd))
            }
            JOB_CONF_H => {
                let params = JobParameters::deserialize(reader.read_rest())?;
                Ok(Msg::Data(Payload::JobConf(params)))
            }
            STATIC_BLOCK_H => {
                let block = DenseBlock::deserialize(reader.read_rest())?;
                Ok(Msg::Data(Payload::StaticBlock(block)))
            }
            DYNAMIC_BLOCK_H => {
                let key = CacheKey(reader.read_str("cache key")?.to_string());
                let block = DenseBlock::deserialize(reader.read_rest())?;
                Ok(Msg::Data(Payload::DynamicBlock { key, block }))
            }
            ROUND_RESULT_H => {
                let round = reader.read_u64("round")?;
                let key = Key::deserialize(reader.read_prefixed("result key")?)?;
                let block = DenseBlock::deserialize(reader.read_rest())?;
                Ok(Msg::Data(Payload::RoundResult { round, key, block }))
            }
            tag => Err(PayloadErr::UnknownTag {
                field: "msg kind",
                tag,
            }),
        }
    }
}
