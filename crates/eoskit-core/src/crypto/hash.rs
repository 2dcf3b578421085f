use ripemd::Ripemd160;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::codec::{Pack, Reader, Unpack, Writer};
use crate::error::CoreError;

/// A 32-byte checksum: chain ids, block ids, transaction ids and digests
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Checksum256(pub [u8; 32]);

impl Checksum256 {
    pub const ZERO: Checksum256 = Checksum256([0u8; 32]);

    pub fn new(data: [u8; 32]) -> Self {
        Checksum256(data)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != 32 {
            return None;
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Some(Checksum256(bytes))
    }

    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes).ok_or_else(|| {
            CoreError::validation(format!(
                "checksum256 must be 32 bytes, got {}",
                bytes.len()
            ))
        })
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Checksum256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum256({})", self.to_hex())
    }
}

impl fmt::Display for Checksum256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Checksum256 {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Checksum256::from_hex(s)
    }
}

impl Pack for Checksum256 {
    fn pack(&self, w: &mut Writer) {
        w.write_bytes(&self.0);
    }
}

impl Unpack for Checksum256 {
    fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError> {
        Ok(Checksum256(r.read_array()?))
    }
}

impl Serialize for Checksum256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Checksum256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Checksum256::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Compute SHA-256 of data
pub fn sha256(data: &[u8]) -> Checksum256 {
    Checksum256(Sha256::digest(data).into())
}

/// SHA-256 applied twice, as used by WIF checksums
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(Sha256::digest(data)).into()
}

/// Compute RIPEMD-160 of data
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}
