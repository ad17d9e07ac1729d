use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used across the comms crate.
pub type Result<T> = std::result::Result<T, PayloadErr>;

/// Error returned whenever a byte payload can't be turned back into a valid value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadErr {
    /// The input ended before `field` could be read.
    Truncated {
        field: &'static str,
        needed: usize,
        available: usize,
    },
    /// Bytes were left over after the value was fully decoded.
    TrailingBytes { consumed: usize, remaining: usize },
    /// A text field wasn't valid UTF-8.
    InvalidUtf8 { field: &'static str },
    /// An integer key payload wasn't a valid decimal integer.
    InvalidInteger(String),
    /// An unknown discriminant was found for `field`.
    UnknownTag { field: &'static str, tag: u32 },
    /// A block's declared shape doesn't match its storage.
    ShapeMismatch {
        height: usize,
        width: usize,
        len: usize,
    },
    /// A required entry of a parameter set is absent.
    MissingField { field: &'static str },
    /// The JSON body of a control message couldn't be parsed.
    Json(String),
}

impl Display for PayloadErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadErr::Truncated {
                field,
                needed,
                available,
            } => write!(
                f,
                "malformed payload: {field} needs {needed} bytes but only {available} remain"
            ),
            PayloadErr::TrailingBytes {
                consumed,
                remaining,
            } => write!(
                f,
                "malformed payload: {remaining} trailing bytes after {consumed} consumed"
            ),
            PayloadErr::InvalidUtf8 { field } => {
                write!(f, "malformed payload: {field} is not valid utf-8")
            }
            PayloadErr::InvalidInteger(raw) => {
                write!(f, "malformed payload: {raw:?} is not a decimal integer")
            }
            PayloadErr::UnknownTag { field, tag } => {
                write!(f, "malformed payload: unknown {field} tag {tag}")
            }
            PayloadErr::ShapeMismatch { height, width, len } => write!(
                f,
                "malformed payload: a {height}x{width} block can't hold {len} values"
            ),
            PayloadErr::MissingField { field } => {
                write!(f, "malformed payload: missing {field}")
            }
            PayloadErr::Json(e) => write!(f, "malformed payload: {e}"),
        }
    }
}

impl Error for PayloadErr {}

impl From<serde_json::Error> for PayloadErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value.to_string())
    }
}

/// Boundary conversion for the frame channel.
impl From<PayloadErr> for io::Error {
    fn from(value: PayloadErr) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, value)
    }
}
