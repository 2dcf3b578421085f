pub mod base58;
pub mod hash;
pub mod keys;
pub mod signature;
pub mod signer;

pub use hash::{double_sha256, ripemd160, sha256, Checksum256};
pub use keys::{KeyType, PrivateKey, PublicKey, LEGACY_KEY_PREFIX};
pub use signature::Signature;
pub use signer::{is_canonical, sign_digest, MAX_SIGNING_ATTEMPTS};
