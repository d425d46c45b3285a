//! Store-assigned document identities
//!
//! 12 bytes rendered as 24 lowercase hex characters: a big-endian unix
//! timestamp (4 bytes), a per-process random tag (5 bytes) and a wrapping
//! counter (3 bytes).

use crate::common::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static PROCESS_TAG: Lazy<[u8; 5]> = Lazy::new(rand::random::<[u8; 5]>);
static COUNTER: Lazy<AtomicU32> = Lazy::new(|| AtomicU32::new(rand::random()));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId([u8; 12]);

impl DocumentId {
    pub fn generate() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or_default();
        let count = COUNTER.fetch_add(1, Ordering::Relaxed);

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_TAG);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for DocumentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != 24 {
            return Err(Error::InvalidId(s.to_string()));
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| Error::InvalidId(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for DocumentId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique_and_hex() {
        let a = DocumentId::generate();
        let b = DocumentId::generate();
        assert_ne!(a, b);
        assert_eq!(a.to_hex().len(), 24);
        assert_eq!(a.to_hex().parse::<DocumentId>().unwrap(), a);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("nonexistent".parse::<DocumentId>().is_err());
        assert!("zzzzzzzzzzzzzzzzzzzzzzzz".parse::<DocumentId>().is_err());
        assert!("".parse::<DocumentId>().is_err());
        assert!(matches!(
            "abc".parse::<DocumentId>(),
            Err(Error::InvalidId(id)) if id == "abc"
        ));
    }
}
