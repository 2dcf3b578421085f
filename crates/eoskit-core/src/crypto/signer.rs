//! Deterministic canonical secp256k1 signing.
//!
//! The nonce is derived RFC 6979 style from the key and the digest, with
//! an attempt counter added to the digest. Attempts repeat until both `r`
//! and `s` lie in the lower half of the curve order, which is the only
//! form the chain accepts.

use hmac::{Hmac, Mac};
use k256::elliptic_curve::bigint::Encoding;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::point::AffineCoordinates;
use k256::elliptic_curve::scalar::IsHigh;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, ProjectivePoint, Scalar, U256};
use sha2::Sha256;
use tracing::debug;

use crate::crypto::hash::Checksum256;
use crate::crypto::keys::PrivateKey;
use crate::crypto::signature::{Signature, COMPRESSED_OFFSET, RECOVERY_BASE};
use crate::error::CoreError;

type HmacSha256 = Hmac<Sha256>;

/// Upper bound on nonce attempts before giving up
pub const MAX_SIGNING_ATTEMPTS: u32 = 1024;

fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> Result<[u8; 32], CoreError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| CoreError::InvalidKey(format!("hmac key: {e}")))?;
    for part in parts {
        mac.update(part);
    }
    Ok(mac.finalize().into_bytes().into())
}

/// `digest + attempt` as a 256-bit big-endian integer, wrapping
fn offset_digest(digest: &Checksum256, attempt: u32) -> [u8; 32] {
    U256::from_be_slice(digest.as_bytes())
        .wrapping_add(&U256::from_u32(attempt))
        .to_be_bytes()
}

/// Nonce candidate for one attempt
pub(crate) fn deterministic_nonce(
    secret: &[u8; 32],
    digest: &Checksum256,
    attempt: u32,
) -> Result<[u8; 32], CoreError> {
    let m = offset_digest(digest, attempt);
    let mut v = [0x01u8; 32];
    let mut k = [0x00u8; 32];

    k = hmac_sha256(&k, &[&v, &[0x00], secret, &m])?;
    v = hmac_sha256(&k, &[&v])?;
    k = hmac_sha256(&k, &[&v, &[0x01], secret, &m])?;
    v = hmac_sha256(&k, &[&v])?;
    hmac_sha256(&k, &[&v])
}

/// Canonical form: neither `r` nor `s` exceeds half the curve order
pub fn is_canonical(signature: &Signature) -> bool {
    let high = |bytes: &[u8]| -> bool {
        Option::<Scalar>::from(Scalar::from_repr(FieldBytes::clone_from_slice(bytes)))
            .map(|scalar| bool::from(scalar.is_high()))
            .unwrap_or(true)
    };
    !high(signature.r()) && !high(signature.s())
}

/// Sign a 32-byte digest, producing a canonical recoverable signature.
///
/// Output is a pure function of the key and digest.
pub fn sign_digest(key: &PrivateKey, digest: &Checksum256) -> Result<Signature, CoreError> {
    let secret_bytes: [u8; 32] = key.to_bytes();
    let d: Scalar = *key.secret().to_nonzero_scalar();
    let z = <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*digest.as_bytes()));
    let recovery_base = if key.is_compressed() {
        RECOVERY_BASE + COMPRESSED_OFFSET
    } else {
        RECOVERY_BASE
    };

    for attempt in 0..MAX_SIGNING_ATTEMPTS {
        let nonce = deterministic_nonce(&secret_bytes, digest, attempt)?;
        let k = match Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(nonce))) {
            Some(k) if !bool::from(k.is_zero()) => k,
            _ => {
                debug!("Nonce out of range on attempt {}", attempt);
                continue;
            }
        };

        let point = (ProjectivePoint::GENERATOR * k).to_affine();
        let r = match Option::<Scalar>::from(Scalar::from_repr(point.x())) {
            Some(r) if !bool::from(r.is_zero()) => r,
            _ => continue,
        };
        let k_inv = match Option::<Scalar>::from(k.invert()) {
            Some(inv) => inv,
            None => continue,
        };

        let mut s = k_inv * (z + r * d);
        let mut parity = point.y_is_odd().unwrap_u8();
        if bool::from(s.is_high()) {
            s = -s;
            parity ^= 1;
        }

        if bool::from(r.is_high()) || bool::from(s.is_high()) || bool::from(s.is_zero()) {
            debug!("Non-canonical signature on attempt {}, retrying", attempt);
            continue;
        }

        let r_bytes: [u8; 32] = r.to_bytes().into();
        let s_bytes: [u8; 32] = s.to_bytes().into();
        return Ok(Signature::from_parts(
            recovery_base + parity,
            &r_bytes,
            &s_bytes,
        ));
    }

    Err(CoreError::SigningExhausted(MAX_SIGNING_ATTEMPTS))
}
