use serde::{Deserialize, Serialize};

use crate::codec::{Reader, Unpack};
use crate::crypto::{sha256, Checksum256, Signature};
use crate::error::CoreError;
use crate::protocol::{RawTransaction, SignedTransactionData};
use crate::serialize;
use crate::types::Bytes;

/// Body of a `push_transaction` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedTransaction {
    pub signatures: Vec<Signature>,
    /// Whether `packed_trx` is zlib-compressed; always false when built here
    #[serde(default)]
    pub compression: bool,
    #[serde(default)]
    pub packed_context_free_data: Bytes,
    pub packed_trx: Bytes,
}

impl PackedTransaction {
    pub fn new(signatures: Vec<Signature>, packed_trx: Vec<u8>) -> Self {
        PackedTransaction {
            signatures,
            compression: false,
            packed_context_free_data: Bytes::default(),
            packed_trx: Bytes::new(packed_trx),
        }
    }

    /// Transaction id: SHA-256 of the packed transaction
    pub fn id(&self) -> Checksum256 {
        sha256(&self.packed_trx)
    }

    /// Decode back into a signed transaction
    pub fn unpack(&self) -> Result<SignedTransactionData, CoreError> {
        if self.compression {
            return Err(CoreError::UnsupportedType(
                "zlib-compressed transactions".into(),
            ));
        }
        let transaction: RawTransaction = serialize::from_bytes(&self.packed_trx)?;
        let context_free_data = if self.packed_context_free_data.is_empty() {
            Vec::new()
        } else {
            let mut r = Reader::new(&self.packed_context_free_data);
            let data = Vec::<Bytes>::unpack(&mut r)?;
            if !r.is_empty() {
                return Err(CoreError::TrailingBytes(r.remaining()));
            }
            data
        };
        Ok(SignedTransactionData {
            transaction,
            signatures: self.signatures.clone(),
            context_free_data,
        })
    }
}
