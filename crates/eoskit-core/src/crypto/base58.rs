//! Base58 with a trailing 4-byte integrity check.
//!
//! Keys and signatures use a RIPEMD-160 check over the payload plus an
//! optional curve suffix; WIF private keys use double SHA-256.

use crate::crypto::hash::{double_sha256, ripemd160};
use crate::error::CoreError;

const CHECK_LEN: usize = 4;

fn ripemd_check(payload: &[u8], suffix: &[u8]) -> [u8; CHECK_LEN] {
    let mut data = Vec::with_capacity(payload.len() + suffix.len());
    data.extend_from_slice(payload);
    data.extend_from_slice(suffix);
    let digest = ripemd160(&data);
    [digest[0], digest[1], digest[2], digest[3]]
}

fn split_check<'a>(
    decoded: &'a [u8],
    expected_len: usize,
    what: &'static str,
) -> Result<(&'a [u8], &'a [u8]), CoreError> {
    if decoded.len() != expected_len + CHECK_LEN {
        return Err(CoreError::validation(format!(
            "{what} payload must be {} bytes, got {}",
            expected_len + CHECK_LEN,
            decoded.len()
        )));
    }
    Ok(decoded.split_at(expected_len))
}

/// Encode `payload ‖ ripemd160(payload ‖ suffix)[..4]`
pub fn encode_ripemd_check(payload: &[u8], suffix: &[u8]) -> String {
    let mut data = payload.to_vec();
    data.extend_from_slice(&ripemd_check(payload, suffix));
    bs58::encode(data).into_string()
}

/// Decode and verify a RIPEMD-160 checked string of a known payload length
pub fn decode_ripemd_check(
    text: &str,
    suffix: &[u8],
    expected_len: usize,
    what: &'static str,
) -> Result<Vec<u8>, CoreError> {
    let decoded = bs58::decode(text).into_vec()?;
    let (payload, check) = split_check(&decoded, expected_len, what)?;
    if ripemd_check(payload, suffix) != check {
        return Err(CoreError::ChecksumMismatch(what));
    }
    Ok(payload.to_vec())
}

/// Encode `payload ‖ sha256(sha256(payload))[..4]`
pub fn encode_sha256d_check(payload: &[u8]) -> String {
    let mut data = payload.to_vec();
    data.extend_from_slice(&double_sha256(payload)[..CHECK_LEN]);
    bs58::encode(data).into_string()
}

/// Decode and verify a double SHA-256 checked string
pub fn decode_sha256d_check(text: &str, what: &'static str) -> Result<Vec<u8>, CoreError> {
    let decoded = bs58::decode(text).into_vec()?;
    if decoded.len() <= CHECK_LEN {
        return Err(CoreError::validation(format!("{what} is too short")));
    }
    let (payload, check) = decoded.split_at(decoded.len() - CHECK_LEN);
    if double_sha256(payload)[..CHECK_LEN] != *check {
        return Err(CoreError::ChecksumMismatch(what));
    }
    Ok(payload.to_vec())
}
