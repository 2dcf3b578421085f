//! Seams to the network layer. The core never performs I/O itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::crypto::Checksum256;
use crate::error::CoreError;
use crate::transaction::packed::PackedTransaction;
use crate::types::Name;

/// Chain metadata needed to link a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainContext {
    pub chain_id: Checksum256,
    /// Recent block the transaction refers to, usually the last irreversible one
    pub ref_block_id: Checksum256,
}

/// Source of [`ChainContext`], typically a node's `get_info`
pub trait ChainSource {
    fn chain_context(&self) -> Result<ChainContext, CoreError>;
}

impl ChainSource for ChainContext {
    fn chain_context(&self) -> Result<ChainContext, CoreError> {
        Ok(self.clone())
    }
}

/// Turns JSON action arguments into packed bytes
pub trait ActionDataPacker {
    fn pack_action_data(
        &self,
        account: Name,
        action: Name,
        args: &Value,
    ) -> Result<Vec<u8>, CoreError>;
}

/// Packer for transactions whose actions all carry packed data
#[derive(Debug, Clone, Copy, Default)]
pub struct PrepackedOnly;

impl ActionDataPacker for PrepackedOnly {
    fn pack_action_data(
        &self,
        account: Name,
        action: Name,
        _args: &Value,
    ) -> Result<Vec<u8>, CoreError> {
        Err(CoreError::schema(format!(
            "no packer available for {account}::{action} arguments"
        )))
    }
}

/// Accepts a signed transaction for broadcast
pub trait TransactionSubmitter {
    fn submit(&self, transaction: &PackedTransaction) -> Result<Value, CoreError>;
}
