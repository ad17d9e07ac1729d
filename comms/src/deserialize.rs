use crate::Result;

/// A value that can be rebuilt from a complete frame body.
pub trait Deserialize: Sized {
    /// Decodes `buf`, which must contain exactly one encoded value.
    fn deserialize(buf: &[u8]) -> Result<Self>;
}
