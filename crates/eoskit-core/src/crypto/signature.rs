use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use k256::FieldBytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::codec::{Pack, Reader, Unpack, Writer};
use crate::crypto::base58::{decode_ripemd_check, encode_ripemd_check};
use crate::crypto::hash::Checksum256;
use crate::crypto::keys::{KeyType, PublicKey};
use crate::error::CoreError;

/// Recovery byte offset for uncompressed keys
pub const RECOVERY_BASE: u8 = 27;
/// Additional offset when the signing key was flagged compressed
pub const COMPRESSED_OFFSET: u8 = 4;

/// Recoverable signature: `[v, r(32), s(32)]` with its curve tag
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    key_type: KeyType,
    data: [u8; 65],
}

impl Signature {
    pub fn from_bytes(key_type: KeyType, data: [u8; 65]) -> Self {
        Signature { key_type, data }
    }

    pub(crate) fn from_parts(v: u8, r: &[u8; 32], s: &[u8; 32]) -> Self {
        let mut data = [0u8; 65];
        data[0] = v;
        data[1..33].copy_from_slice(r);
        data[33..].copy_from_slice(s);
        Signature {
            key_type: KeyType::K1,
            data,
        }
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.data
    }

    /// Recovery byte `v`
    pub fn recovery_byte(&self) -> u8 {
        self.data[0]
    }

    pub fn r(&self) -> &[u8] {
        &self.data[1..33]
    }

    pub fn s(&self) -> &[u8] {
        &self.data[33..]
    }

    /// Recover the public key that produced this signature over `digest`
    pub fn recover(&self, digest: &Checksum256) -> Result<PublicKey, CoreError> {
        if self.key_type != KeyType::K1 {
            return Err(CoreError::UnsupportedType(
                "public key recovery for R1 signatures".into(),
            ));
        }
        let v = self.recovery_byte();
        if !(RECOVERY_BASE..RECOVERY_BASE + 2 * COMPRESSED_OFFSET).contains(&v) {
            return Err(CoreError::InvalidSignature(format!("recovery byte {v}")));
        }
        let recovery_id = RecoveryId::from_byte((v - RECOVERY_BASE) % COMPRESSED_OFFSET)
            .ok_or_else(|| CoreError::InvalidSignature(format!("recovery byte {v}")))?;
        let signature = EcdsaSignature::from_scalars(
            FieldBytes::clone_from_slice(self.r()),
            FieldBytes::clone_from_slice(self.s()),
        )
        .map_err(|e| CoreError::InvalidSignature(e.to_string()))?;
        let verifying_key =
            VerifyingKey::recover_from_prehash(digest.as_bytes(), &signature, recovery_id)
                .map_err(|e| CoreError::InvalidSignature(e.to_string()))?;
        Ok(PublicKey::from_k256(&k256::PublicKey::from(verifying_key)))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = self.key_type.suffix();
        write!(
            f,
            "SIG_{suffix}_{}",
            encode_ripemd_check(&self.data, suffix.as_bytes())
        )
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({self})")
    }
}

impl FromStr for Signature {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (curve, body) = s
            .strip_prefix("SIG_")
            .and_then(|rest| rest.split_once('_'))
            .ok_or_else(|| CoreError::InvalidSignature(format!("unrecognized format '{s}'")))?;
        let key_type = KeyType::from_suffix(curve)?;
        let payload = decode_ripemd_check(body, key_type.suffix().as_bytes(), 65, "signature")?;
        let mut data = [0u8; 65];
        data.copy_from_slice(&payload);
        Ok(Signature { key_type, data })
    }
}

impl Pack for Signature {
    fn pack(&self, w: &mut Writer) {
        w.write_u8(self.key_type.tag());
        w.write_bytes(&self.data);
    }
}

impl Unpack for Signature {
    fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError> {
        let key_type = KeyType::from_tag(r.read_u8()?)?;
        Ok(Signature {
            key_type,
            data: r.read_array()?,
        })
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
