use std::{error::Error, fmt, io};

/// The pubsub module's result type.
pub type Result<T> = std::result::Result<T, TransportErr>;

/// Transport selection and broker communication failures.
#[derive(Debug)]
pub enum TransportErr {
    /// The configured broker name isn't one of the known backends.
    UnsupportedTransport(String),
    /// An operation was attempted before `connect` or after `close`.
    NotConnected,
    /// The broker sent something the transport didn't expect.
    Protocol(String),
    Io(io::Error),
}

impl fmt::Display for TransportErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErr::UnsupportedTransport(name) => {
                write!(f, "unsupported pub/sub broker: {name:?}")
            }
            TransportErr::NotConnected => write!(f, "transport is not connected"),
            TransportErr::Protocol(detail) => write!(f, "broker protocol error: {detail}"),
            TransportErr::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for TransportErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TransportErr::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TransportErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
