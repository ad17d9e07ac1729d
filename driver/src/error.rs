use std::{error::Error, fmt, io, time::Duration};

use comms::PayloadErr;
use pubsub::TransportErr;

/// The driver module's result type.
pub type Result<T> = std::result::Result<T, DriverErr>;

/// Every way a job can fail, all of them fatal to the job.
#[derive(Debug)]
pub enum DriverErr {
    /// The contraction dimensions of the operands disagree.
    DimensionMismatch {
        left_width: usize,
        right_height: usize,
    },
    /// A dimension can't be cut into `parts` non empty blocks.
    InvalidPartition {
        parts: usize,
        size: usize,
    },
    MalformedPayload(PayloadErr),
    UnsupportedTransport(String),
    /// A block doesn't fit the output at the requested offset.
    OutOfBounds {
        start_row: usize,
        block_height: usize,
        block_width: usize,
        output_height: usize,
        output_width: usize,
    },
    RoundFailure {
        iteration: usize,
        detail: String,
    },
    /// The round's completion signal never arrived.
    RoundTimeout {
        iteration: usize,
        waited: Duration,
    },
    Transport(TransportErr),
    Io(io::Error),
}

impl fmt::Display for DriverErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverErr::DimensionMismatch {
                left_width,
                right_height,
            } => write!(
                f,
                "dimension mismatch: left operand width {left_width} != right operand height {right_height}"
            ),
            DriverErr::InvalidPartition { parts, size } => {
                write!(f, "can't split a dimension of {size} into {parts} non empty blocks")
            }
            DriverErr::MalformedPayload(e) => write!(f, "malformed payload: {e}"),
            DriverErr::UnsupportedTransport(name) => {
                write!(f, "unsupported transport: {name:?}")
            }
            DriverErr::OutOfBounds {
                start_row,
                block_height,
                block_width,
                output_height,
                output_width,
            } => write!(
                f,
                "block of {block_height}x{block_width} at row {start_row} doesn't fit an output of {output_height}x{output_width}"
            ),
            DriverErr::RoundFailure { iteration, detail } => {
                write!(f, "round {iteration} failed: {detail}")
            }
            DriverErr::RoundTimeout { iteration, waited } => {
                write!(f, "round {iteration} didn't complete within {waited:?}")
            }
            DriverErr::Transport(e) => write!(f, "transport error: {e}"),
            DriverErr::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for DriverErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DriverErr::MalformedPayload(e) => Some(e),
            DriverErr::Transport(e) => Some(e),
            DriverErr::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DriverErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<PayloadErr> for DriverErr {
    fn from(value: PayloadErr) -> Self {
        Self::MalformedPayload(value)
    }
}

impl From<TransportErr> for DriverErr {
    fn from(value: TransportErr) -> Self {
        match value {
            TransportErr::UnsupportedTransport(name) => Self::UnsupportedTransport(name),
            other => Self::Transport(other),
        }
    }
}
