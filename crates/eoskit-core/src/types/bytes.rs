use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;

use crate::codec::{Pack, Reader, Unpack, Writer};
use crate::error::CoreError;

/// Length-prefixed opaque bytes; hex in JSON
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn new(data: Vec<u8>) -> Self {
        Bytes(data)
    }

    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        Ok(Bytes(hex::decode(s)?))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        Bytes(v)
    }
}

impl From<&[u8]> for Bytes {
    fn from(v: &[u8]) -> Self {
        Bytes(v.to_vec())
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bytes({})", self.to_hex())
    }
}

impl Pack for Bytes {
    fn pack(&self, w: &mut Writer) {
        w.write_len(self.0.len());
        w.write_bytes(&self.0);
    }
}

impl Unpack for Bytes {
    fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError> {
        let len = r.read_len()?;
        Ok(Bytes(r.read_bytes(len)?.to_vec()))
    }
}

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Bytes::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_prefix() {
        let b = Bytes::new(vec![0xaa; 130]);
        let packed = b.to_packed();
        assert_eq!(&packed[..2], &[0x82, 0x01]);
        assert_eq!(packed.len(), 132);

        let mut r = Reader::new(&packed);
        assert_eq!(Bytes::unpack(&mut r).unwrap(), b);
    }

    #[test]
    fn test_hex_serde() {
        let b = Bytes::new(vec![0xde, 0xad]);
        assert_eq!(serde_json::to_string(&b).unwrap(), "\"dead\"");
        let back: Bytes = serde_json::from_str("\"DEAD\"").unwrap();
        assert_eq!(back, b);
        assert!(serde_json::from_str::<Bytes>("\"xyz\"").is_err());
    }
}
