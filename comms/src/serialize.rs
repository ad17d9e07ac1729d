/// A value that can be written into a frame body.
pub trait Serialize<'a> {
    /// Serializes `self` into `buf`.
    ///
    /// # Arguments
    /// * `buf` - The buffer where the encoded prefix is appended.
    ///
    /// # Returns
    /// An optional borrowed tail that must be written right after `buf`,
    /// used to avoid copying large numeric payloads.
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]>;

    /// Serializes `self` into a freshly allocated, self contained byte vector.
    fn to_bytes(&'a self) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(tail) = self.serialize(&mut buf) {
            buf.extend_from_slice(tail);
        }
        buf
    }
}
