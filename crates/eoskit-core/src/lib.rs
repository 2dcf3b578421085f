//! eoskit Core - wire codec, ABI packer and canonical signer
//!
//! This crate turns structured action and transaction data into the
//! byte-exact EOSIO/Antelope wire format, computes the signing digest over
//! it and produces canonical secp256k1 signatures. Network access is left to
//! callers through the traits in [`transaction`].

pub mod abi;
pub mod codec;
pub mod crypto;
pub mod error;
pub mod protocol;
pub mod serialize;
pub mod transaction;
pub mod types;

pub use abi::{Abi, AbiDef, AbiRegistry};
pub use codec::{Pack, Reader, Unpack, Writer};
pub use crypto::{
    sha256, sign_digest, Checksum256, KeyType, PrivateKey, PublicKey, Signature,
    MAX_SIGNING_ATTEMPTS,
};
pub use error::CoreError;
pub use protocol::{Action, PermissionLevel, RawTransaction, TransactionHeader};
pub use transaction::{
    ActionData, ActionDataPacker, ChainContext, ChainSource, DraftAction, LinkedTransaction,
    PackedTransaction, SentTransaction, SignedTransaction, TaposRef, Transaction,
    TransactionConfig, TransactionSubmitter,
};
pub use types::*;
