//! Wire vocabulary shared by the job driver, the broker transports and the daemons.
//!
//! Everything that crosses a process boundary lives here: the frame channel,
//! the job configuration encoding, keys, dense blocks and the job protocol
//! messages.

mod block;
mod conf;
mod cursor;
mod deserialize;
mod error;
mod key;
pub mod msg;
mod receiver;
mod sender;
mod serialize;

use tokio::io::{AsyncRead, AsyncWrite};

pub use block::{BlockCoord, DenseBlock};
pub use conf::JobParameters;
pub use cursor::ByteReader;
pub use deserialize::Deserialize;
pub use error::{PayloadErr, Result};
pub use key::{CacheKey, Key};
pub use receiver::FrameReceiver;
pub use sender::FrameSender;
pub use serialize::Serialize;

type LenType = u64;
const LEN_TYPE_SIZE: usize = size_of::<LenType>();

/// Largest frame body either end accepts.
const MAX_FRAME_LEN: usize = u32::MAX as usize;

/// Wraps a reader and a writer into the two ends of a frame channel.
///
/// # Arguments
/// * `rx` - Where frames are read from.
/// * `tx` - Where frames are written to.
pub fn channel<R, W>(rx: R, tx: W) -> (FrameReceiver<R>, FrameSender<W>)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    (FrameReceiver::new(rx), FrameSender::new(tx))
}
