//! Writing end of a frame channel.

use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{LenType, MAX_FRAME_LEN, Serialize};

/// Writes length-prefixed frames to the inner writer.
///
/// A frame is the body length as a big-endian `LenType`, the encoded prefix of
/// the value and then its borrowed tail, if any. The tail is written straight
/// from the value so large blocks are never copied into the frame buffer.
pub struct FrameSender<W: AsyncWrite + Unpin> {
    tx: W,
    body: Vec<u8>,
}

impl<W: AsyncWrite + Unpin> FrameSender<W> {
    pub(super) fn new(tx: W) -> Self {
        Self {
            tx,
            body: Vec::new(),
        }
    }

    /// Sends `msg` as a single frame and flushes the writer.
    ///
    /// # Arguments
    /// * `msg` - A serializable value.
    ///
    /// # Returns
    /// `io::ErrorKind::InvalidInput` if the frame is too large for the
    /// receiving end, in which case nothing was written, or the writer's error.
    pub async fn send<'a, T: Serialize<'a>>(&mut self, msg: &'a T) -> io::Result<()> {
        self.body.clear();
        let tail = msg.serialize(&mut self.body).unwrap_or_default();

        let len = self.body.len() + tail.len();
        if len > MAX_FRAME_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("frame of {len} bytes exceeds the {MAX_FRAME_LEN} bytes limit"),
            ));
        }

        self.tx.write_all(&(len as LenType).to_be_bytes()).await?;
        self.tx.write_all(&self.body).await?;
        if !tail.is_empty() {
            self.tx.write_all(tail).await?;
        }

        self.tx.flush().await
    }

    /// Flushes and shuts down the inner writer, the peer reads end of stream.
    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.tx.shutdown().await
    }
}
