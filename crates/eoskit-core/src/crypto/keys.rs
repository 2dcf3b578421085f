use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::codec::{Pack, Reader, Unpack, Writer};
use crate::crypto::base58::{
    decode_ripemd_check, decode_sha256d_check, encode_ripemd_check, encode_sha256d_check,
};
use crate::crypto::hash::Checksum256;
use crate::crypto::signature::Signature;
use crate::error::CoreError;

/// Legacy public key prefix
pub const LEGACY_KEY_PREFIX: &str = "EOS";

const WIF_VERSION: u8 = 0x80;
const WIF_COMPRESSED_FLAG: u8 = 0x01;

/// Elliptic curve a key or signature belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// secp256k1
    K1,
    /// secp256r1; carried through the codec but not used for signing
    R1,
}

impl KeyType {
    pub fn tag(&self) -> u8 {
        match self {
            KeyType::K1 => 0,
            KeyType::R1 => 1,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, CoreError> {
        match tag {
            0 => Ok(KeyType::K1),
            1 => Ok(KeyType::R1),
            other => Err(CoreError::UnsupportedType(format!("curve tag {other}"))),
        }
    }

    /// Suffix mixed into checksums and used in text prefixes
    pub fn suffix(&self) -> &'static str {
        match self {
            KeyType::K1 => "K1",
            KeyType::R1 => "R1",
        }
    }

    pub(crate) fn from_suffix(s: &str) -> Result<Self, CoreError> {
        match s {
            "K1" => Ok(KeyType::K1),
            "R1" => Ok(KeyType::R1),
            other => Err(CoreError::UnsupportedType(format!("curve '{other}'"))),
        }
    }
}

/// Compressed public key with its curve tag
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    key_type: KeyType,
    data: [u8; 33],
}

impl PublicKey {
    pub fn from_bytes(key_type: KeyType, data: [u8; 33]) -> Result<Self, CoreError> {
        if key_type == KeyType::K1 {
            k256::PublicKey::from_sec1_bytes(&data)
                .map_err(|_| CoreError::InvalidKey("not a valid secp256k1 point".into()))?;
        }
        Ok(PublicKey { key_type, data })
    }

    pub(crate) fn from_k256(key: &k256::PublicKey) -> Self {
        let mut data = [0u8; 33];
        data.copy_from_slice(key.to_encoded_point(true).as_bytes());
        PublicKey {
            key_type: KeyType::K1,
            data,
        }
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.data
    }

    /// `PUB_<curve>_...` form
    pub fn to_modern_string(&self) -> String {
        format!(
            "PUB_{}_{}",
            self.key_type.suffix(),
            encode_ripemd_check(&self.data, self.key_type.suffix().as_bytes())
        )
    }

    /// `EOS...` form; only defined for K1 keys
    pub fn to_legacy_string(&self) -> Option<String> {
        (self.key_type == KeyType::K1)
            .then(|| format!("{LEGACY_KEY_PREFIX}{}", encode_ripemd_check(&self.data, b"")))
    }

    /// Check that `signature` over `digest` was made by this key
    pub fn verify(&self, digest: &Checksum256, signature: &Signature) -> Result<(), CoreError> {
        let recovered = signature.recover(digest)?;
        if recovered.data != self.data || recovered.key_type != self.key_type {
            return Err(CoreError::InvalidSignature(
                "signature was made by a different key".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_legacy_string() {
            Some(legacy) => f.write_str(&legacy),
            None => f.write_str(&self.to_modern_string()),
        }
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({self})")
    }
}

impl FromStr for PublicKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("PUB_") {
            let (curve, body) = rest
                .split_once('_')
                .ok_or_else(|| CoreError::validation(format!("invalid public key '{s}'")))?;
            let key_type = KeyType::from_suffix(curve)?;
            let payload =
                decode_ripemd_check(body, key_type.suffix().as_bytes(), 33, "public key")?;
            let mut data = [0u8; 33];
            data.copy_from_slice(&payload);
            return PublicKey::from_bytes(key_type, data);
        }
        if let Some(body) = s.strip_prefix(LEGACY_KEY_PREFIX) {
            let payload = decode_ripemd_check(body, b"", 33, "public key")?;
            let mut data = [0u8; 33];
            data.copy_from_slice(&payload);
            return PublicKey::from_bytes(KeyType::K1, data);
        }
        Err(CoreError::validation(format!("invalid public key format '{s}'")))
    }
}

impl Pack for PublicKey {
    fn pack(&self, w: &mut Writer) {
        w.write_u8(self.key_type.tag());
        w.write_bytes(&self.data);
    }
}

impl Unpack for PublicKey {
    fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError> {
        let key_type = KeyType::from_tag(r.read_u8()?)?;
        PublicKey::from_bytes(key_type, r.read_array()?)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// secp256k1 private key.
/// Not serializable to prevent accidental exposure
#[derive(Clone)]
pub struct PrivateKey {
    secret: k256::SecretKey,
    compressed: bool,
}

impl PrivateKey {
    /// Generate a new random private key
    pub fn generate() -> Self {
        PrivateKey {
            secret: k256::SecretKey::random(&mut OsRng),
            compressed: false,
        }
    }

    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, CoreError> {
        let secret = k256::SecretKey::from_slice(bytes)
            .map_err(|_| CoreError::InvalidKey("scalar out of range".into()))?;
        Ok(PrivateKey {
            secret,
            compressed: false,
        })
    }

    /// Mark the key as belonging to a compressed public key
    pub fn with_compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    /// Whether the key was imported in compressed WIF form
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_k256(&self.secret.public_key())
    }

    pub(crate) fn secret(&self) -> &k256::SecretKey {
        &self.secret
    }

    /// Export raw bytes (use with caution)
    pub fn to_bytes(&self) -> [u8; 32] {
        self.secret.to_bytes().into()
    }

    /// Wallet import format (use with caution)
    pub fn to_wif(&self) -> String {
        let mut payload = Vec::with_capacity(34);
        payload.push(WIF_VERSION);
        payload.extend_from_slice(&self.to_bytes());
        if self.compressed {
            payload.push(WIF_COMPRESSED_FLAG);
        }
        encode_sha256d_check(&payload)
    }

    /// `PVT_K1_...` form (use with caution)
    pub fn to_modern_string(&self) -> String {
        format!("PVT_K1_{}", encode_ripemd_check(&self.to_bytes(), b"K1"))
    }

    fn from_wif(s: &str) -> Result<Self, CoreError> {
        let payload = decode_sha256d_check(s, "private key")?;
        let (compressed, key) = match payload.as_slice() {
            [WIF_VERSION, key @ ..] if key.len() == 32 => (false, key),
            [WIF_VERSION, key @ .., WIF_COMPRESSED_FLAG] if key.len() == 32 => (true, key),
            _ => return Err(CoreError::InvalidKey("malformed WIF payload".into())),
        };
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(key);
        Ok(Self::from_bytes(&bytes)?.with_compressed(compressed))
    }
}

impl FromStr for PrivateKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("PVT_") {
            let (curve, body) = rest
                .split_once('_')
                .ok_or_else(|| CoreError::InvalidKey("missing curve in private key".into()))?;
            if KeyType::from_suffix(curve)? != KeyType::K1 {
                return Err(CoreError::UnsupportedType(format!("{curve} private keys")));
            }
            let payload = decode_ripemd_check(body, b"K1", 32, "private key")?;
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(&payload);
            return Self::from_bytes(&bytes);
        }
        Self::from_wif(s)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey([REDACTED])")
    }
}
