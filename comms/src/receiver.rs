//! Reading end of a frame channel.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{Deserialize, LEN_TYPE_SIZE, LenType, MAX_FRAME_LEN};

/// Reads length-prefixed frames off the inner reader.
///
/// The frame buffer is reused across calls, decoded values own their data.
pub struct FrameReceiver<R: AsyncRead + Unpin> {
    rx: R,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> FrameReceiver<R> {
    pub(super) fn new(rx: R) -> Self {
        Self {
            rx,
            buf: Vec::new(),
        }
    }

    /// Waits for the next frame and decodes it as `T`.
    ///
    /// # Returns
    /// The decoded value, `io::ErrorKind::UnexpectedEof` if the peer hung up, or
    /// `io::ErrorKind::InvalidData` for oversized or undecodable frames.
    pub async fn recv<T: Deserialize>(&mut self) -> io::Result<T> {
        let mut header = [0; LEN_TYPE_SIZE];
        self.rx.read_exact(&mut header).await?;
        let len = LenType::from_be_bytes(header) as usize;

        if len > MAX_FRAME_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("frame of {len} bytes exceeds the {MAX_FRAME_LEN} bytes limit"),
            ));
        }

        self.buf.resize(len, 0);
        self.rx.read_exact(&mut self.buf).await?;

        Ok(T::deserialize(&self.buf)?)
    }
}
