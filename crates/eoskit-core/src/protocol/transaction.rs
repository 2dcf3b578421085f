use serde::{Deserialize, Serialize};

use crate::crypto::{sha256, Checksum256, Signature};
use crate::packable_struct;
use crate::protocol::action::{Action, Extension};
use crate::serialize;
use crate::types::{Bytes, TimePointSec, VarUint32};

/// Fixed-size header that starts every transaction
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionHeader {
    pub expiration: TimePointSec,
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    pub max_net_usage_words: VarUint32,
    pub max_cpu_usage_ms: u8,
    pub delay_sec: VarUint32,
}

packable_struct!(TransactionHeader {
    expiration,
    ref_block_num,
    ref_block_prefix,
    max_net_usage_words,
    max_cpu_usage_ms,
    delay_sec
});

/// Transaction body whose packed bytes are hashed and signed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(flatten)]
    pub header: TransactionHeader,
    #[serde(default)]
    pub context_free_actions: Vec<Action>,
    pub actions: Vec<Action>,
    #[serde(default)]
    pub transaction_extensions: Vec<Extension>,
}

impl RawTransaction {
    /// SHA-256 of the packed transaction
    pub fn id(&self) -> Checksum256 {
        sha256(&serialize::to_bytes(self))
    }
}

packable_struct!(RawTransaction {
    header,
    context_free_actions,
    actions,
    transaction_extensions
});

/// Transaction together with its signatures and context-free data
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignedTransactionData {
    #[serde(flatten)]
    pub transaction: RawTransaction,
    #[serde(default)]
    pub signatures: Vec<Signature>,
    #[serde(default)]
    pub context_free_data: Vec<Bytes>,
}

packable_struct!(SignedTransactionData {
    transaction,
    signatures,
    context_free_data
});
