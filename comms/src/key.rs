use std::fmt::{self, Display};

use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use crate::{ByteReader, Deserialize, PayloadErr, Result, Serialize};

const INT_TAG: u32 = 0;
const STR_TAG: u32 = 1;

/// A comparable, serializable scalar used to address combined results.
///
/// Equality, ordering and hashing depend only on the variant and the wrapped
/// value, keys of different variants are simply unequal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Int(i32),
    Str(String),
}

impl Key {
    /// Returns the untagged byte form of the wrapped value.
    ///
    /// Integers are written as decimal text, strings as their UTF-8 bytes.
    pub fn value_bytes(&self) -> Vec<u8> {
        match self {
            Key::Int(v) => v.to_string().into_bytes(),
            Key::Str(s) => s.clone().into_bytes(),
        }
    }

    /// Parses an integer key from its decimal text form.
    ///
    /// # Returns
    /// The key or `PayloadErr::InvalidInteger` if `bytes` isn't a decimal `i32`.
    pub fn int_from_bytes(bytes: &[u8]) -> Result<Self> {
        std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Key::Int)
            .ok_or_else(|| PayloadErr::InvalidInteger(String::from_utf8_lossy(bytes).into_owned()))
    }

    /// Parses a string key from its UTF-8 form.
    pub fn str_from_bytes(bytes: &[u8]) -> Result<Self> {
        std::str::from_utf8(bytes)
            .map(|s| Key::Str(s.to_string()))
            .map_err(|_| PayloadErr::InvalidUtf8 { field: "key" })
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(v) => write!(f, "{v}"),
            Key::Str(s) => f.write_str(s),
        }
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::Int(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Str(value)
    }
}

impl<'a> Serialize<'a> for Key {
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]> {
        let tag = match self {
            Key::Int(_) => INT_TAG,
            Key::Str(_) => STR_TAG,
        };

        buf.extend_from_slice(&tag.to_be_bytes());
        buf.extend_from_slice(&self.value_bytes());
        None
    }
}

impl Deserialize for Key {
    fn deserialize(buf: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(buf);
        let tag = reader.read_u32("key tag")?;
        let value = reader.read_rest();

        match tag {
            INT_TAG => Key::int_from_bytes(value),
            STR_TAG => Key::str_from_bytes(value),
            tag => Err(PayloadErr::UnknownTag { field: "key", tag }),
        }
    }
}

/// Handle addressing a dynamic block currently cached by the daemons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, SerdeSerialize, SerdeDeserialize)]
#[serde(transparent)]
pub struct CacheKey(pub String);

impl CacheKey {
    /// Returns the key as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
