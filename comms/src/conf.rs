//! Job and task configuration as an ordered list of string keyed properties.
//!
//! # Layout
//!
//! ```text
//! u32 body_len | body
//! body := u32 count | count * (u32 key_len | key | u32 value_len | value)
//! ```
//!
//! All integers are big endian. Values are raw bytes, so anything up to
//! `u32::MAX` bytes survives the round trip untouched.

use crate::{
    ByteReader, Deserialize, PayloadErr, Result, Serialize, cursor::write_prefixed,
};

/// An ordered mapping from string keys to byte string values.
///
/// Keys are unique. Setting an existing key replaces its value in place, so the
/// position of a key is the one it got when it was first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobParameters {
    entries: Vec<(String, Vec<u8>)>,
}

impl JobParameters {
    /// Creates an empty set of parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, overwriting any previous value.
    ///
    /// # Arguments
    /// * `key` - The property name.
    /// * `value` - The property value, text or raw bytes.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Returns the raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Returns the value stored under `key` if it's valid UTF-8.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| std::str::from_utf8(v).ok())
    }

    /// Returns the number of properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Encodes the parameters into a self describing, length prefixed blob.
    pub fn encode(&self) -> Vec<u8> {
        self.to_bytes()
    }

    /// Decodes a blob produced by `encode`.
    ///
    /// # Returns
    /// The parameters or `PayloadErr` if a declared length exceeds the available
    /// bytes or unexpected bytes remain.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::deserialize(bytes)
    }

    fn encode_body(&self) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&(self.entries.len() as u32).to_be_bytes());

        for (key, value) in &self.entries {
            write_prefixed(&mut body, key.as_bytes());
            write_prefixed(&mut body, value);
        }

        body
    }

    fn decode_body(body: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(body);
        let count = reader.read_u32("property count")? as usize;

        let mut params = Self::new();
        for _ in 0..count {
            let key = reader.read_str("property key")?;
            let value = reader.read_prefixed("property value")?;
            params.insert(key, value);
        }

        reader.finish()?;
        Ok(params)
    }
}

impl<'a> Serialize<'a> for JobParameters {
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]> {
        write_prefixed(buf, &self.encode_body());
        None
    }
}

impl Deserialize for JobParameters {
    fn deserialize(buf: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(buf);
        let body = reader.read_prefixed("parameters")?;
        reader.finish()?;
        Self::decode_body(body)
    }
}

impl<K, V> FromIterator<(K, V)> for JobParameters
where
    K: Into<String>,
    V: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl From<JobParameters> for Vec<u8> {
    fn from(value: JobParameters) -> Self {
        value.encode()
    }
}

impl TryFrom<&[u8]> for JobParameters {
    type Error = PayloadErr;

    fn try_from(value: &[u8]) -> Result<Self> {
        Self::decode(value)
    }
}
