use crate::{PayloadErr, Result};

/// Cursor over a byte slice providing the length-prefixed reads every payload uses.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new cursor over `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Returns the number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Reads exactly `len` bytes.
    ///
    /// # Arguments
    /// * `len` - The amount of bytes to read.
    /// * `field` - Name of the field being read, used for error reporting.
    ///
    /// # Returns
    /// The borrowed bytes or `PayloadErr::Truncated` if there aren't enough left.
    pub fn read_exact(&mut self, len: usize, field: &'static str) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(PayloadErr::Truncated {
                field,
                needed: len,
                available: self.remaining(),
            });
        }

        let start = self.offset;
        self.offset += len;
        Ok(&self.bytes[start..self.offset])
    }

    /// Reads a big endian `u32`.
    pub fn read_u32(&mut self, field: &'static str) -> Result<u32> {
        let bytes = self.read_exact(size_of::<u32>(), field)?;
        // SAFETY: `read_exact` returned exactly four bytes.
        Ok(u32::from_be_bytes(bytes.try_into().unwrap()))
    }

    /// Reads a big endian `u64`.
    pub fn read_u64(&mut self, field: &'static str) -> Result<u64> {
        let bytes = self.read_exact(size_of::<u64>(), field)?;
        // SAFETY: `read_exact` returned exactly eight bytes.
        Ok(u64::from_be_bytes(bytes.try_into().unwrap()))
    }

    /// Reads a `u32` length prefix followed by that many bytes.
    pub fn read_prefixed(&mut self, field: &'static str) -> Result<&'a [u8]> {
        let len = self.read_u32(field)? as usize;
        self.read_exact(len, field)
    }

    /// Reads a `u32` length prefixed UTF-8 string.
    pub fn read_str(&mut self, field: &'static str) -> Result<&'a str> {
        let bytes = self.read_prefixed(field)?;
        std::str::from_utf8(bytes).map_err(|_| PayloadErr::InvalidUtf8 { field })
    }

    /// Consumes the rest of the input.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let rest = &self.bytes[self.offset..];
        self.offset = self.bytes.len();
        rest
    }

    /// Asserts that the whole input was consumed.
    ///
    /// # Returns
    /// `PayloadErr::TrailingBytes` if anything is left.
    pub fn finish(self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(PayloadErr::TrailingBytes {
                consumed: self.offset,
                remaining,
            }),
        }
    }
}

/// Appends a `u32` length prefix followed by `bytes` to `buf`.
pub(crate) fn write_prefixed(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    buf.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_prefixed_fields_in_order() {
        let mut buf = Vec::new();
        write_prefixed(&mut buf, b"block_size");
        buf.extend_from_slice(&7u64.to_be_bytes());

        let mut reader = ByteReader::new(&buf);
        assert_eq!(reader.read_str("key").unwrap(), "block_size");
        assert_eq!(reader.read_u64("value").unwrap(), 7);
        reader.finish().unwrap();
    }

    #[test]
    fn declared_length_past_the_end_is_truncated() {
        let mut buf = 10u32.to_be_bytes().to_vec();
        buf.extend_from_slice(b"abc");

        let err = ByteReader::new(&buf).read_prefixed("value").unwrap_err();
        assert_eq!(
            err,
            PayloadErr::Truncated {
                field: "value",
                needed: 10,
                available: 3
            }
        );
    }

    #[test]
    fn leftover_bytes_fail_finish() {
        let buf = [0, 0, 0, 1, 9, 9];
        let mut reader = ByteReader::new(&buf);
        reader.read_u32("count").unwrap();

        assert_eq!(
            reader.finish(),
            Err(PayloadErr::TrailingBytes {
                consumed: 4,
                remaining: 2
            })
        );
    }
}
