//! Transaction states as distinct types.
//!
//! `Transaction` (draft) is linked to chain state, producing a
//! `LinkedTransaction` whose bytes and digest are fixed. Signing yields a
//! `SignedTransaction`, which accepts further signatures over the same
//! digest, and sending it consumes it into a `SentTransaction`. Every
//! transition takes `self`; an `Err` leaves nothing to resume.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::crypto::{sha256, sign_digest, Checksum256, PrivateKey, Signature};
use crate::error::CoreError;
use crate::protocol::{
    Action, PermissionLevel, RawTransaction, TransactionHeader, MAX_AUTHORIZATIONS,
};
use crate::serialize;
use crate::transaction::collaborator::{
    ActionDataPacker, ChainContext, ChainSource, TransactionSubmitter,
};
use crate::transaction::config::TransactionConfig;
use crate::transaction::packed::PackedTransaction;
use crate::transaction::tapos::TaposRef;
use crate::types::{Bytes, Name, TimePointSec, VarUint32};

/// Maximum actions in one transaction
pub const MAX_ACTIONS: usize = 10;
/// Maximum signatures attached to one transaction
pub const MAX_SIGNATURES: usize = 10;

/// SHA-256 over chain id, packed transaction and an all-zero context-free digest
pub fn signing_digest(chain_id: &Checksum256, packed_trx: &[u8]) -> Checksum256 {
    let mut data = Vec::with_capacity(32 + packed_trx.len() + 32);
    data.extend_from_slice(chain_id.as_bytes());
    data.extend_from_slice(packed_trx);
    data.extend_from_slice(Checksum256::ZERO.as_bytes());
    sha256(&data)
}

fn check_action_count(count: usize) -> Result<(), CoreError> {
    if count == 0 || count > MAX_ACTIONS {
        return Err(CoreError::validation(format!(
            "transaction needs 1 to {MAX_ACTIONS} actions, got {count}"
        )));
    }
    Ok(())
}

fn check_authorization_count(account: Name, name: Name, count: usize) -> Result<(), CoreError> {
    if count == 0 || count > MAX_AUTHORIZATIONS {
        return Err(CoreError::validation(format!(
            "action {account}::{name} needs 1 to {MAX_AUTHORIZATIONS} authorizations, got {count}"
        )));
    }
    Ok(())
}

/// Action arguments, either packed already or awaiting a packer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionData {
    /// Hex in JSON
    Packed(Bytes),
    Json(Value),
}

/// Action as written by the caller, before its data is packed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftAction {
    pub account: Name,
    pub name: Name,
    pub authorization: Vec<PermissionLevel>,
    pub data: ActionData,
}

impl DraftAction {
    pub fn new(
        account: Name,
        name: Name,
        authorization: Vec<PermissionLevel>,
        data: ActionData,
    ) -> Self {
        DraftAction {
            account,
            name,
            authorization,
            data,
        }
    }

    fn resolve(self, packer: &impl ActionDataPacker) -> Result<Action, CoreError> {
        check_authorization_count(self.account, self.name, self.authorization.len())?;
        let data = match self.data {
            ActionData::Packed(bytes) => bytes,
            ActionData::Json(args) => Bytes::new(
                packer
                    .pack_action_data(self.account, self.name, &args)
                    .map_err(|e| match e {
                        delegated @ CoreError::Delegation(_) => delegated,
                        other => CoreError::validation(format!(
                            "packing {}::{} data: {other}",
                            self.account, self.name
                        )),
                    })?,
            ),
        };
        Ok(Action::new(self.account, self.name, self.authorization, data))
    }
}

/// Draft transaction
#[derive(Debug, Clone, Default)]
pub struct Transaction {
    actions: Vec<DraftAction>,
    config: TransactionConfig,
}

impl Transaction {
    pub fn new(config: TransactionConfig) -> Self {
        Transaction {
            actions: Vec::new(),
            config,
        }
    }

    pub fn with_action(mut self, action: DraftAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn push_action(&mut self, action: DraftAction) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[DraftAction] {
        &self.actions
    }

    pub fn config(&self) -> &TransactionConfig {
        &self.config
    }

    /// Attach chain state, pack every action and fix the transaction bytes.
    ///
    /// `now` is the link time; the expiration is `now` plus the configured
    /// delay.
    pub fn link(
        self,
        context: &ChainContext,
        packer: &impl ActionDataPacker,
        now: TimePointSec,
    ) -> Result<LinkedTransaction, CoreError> {
        check_action_count(self.actions.len())?;

        let tapos = TaposRef::from_block_id(&context.ref_block_id);
        let header = TransactionHeader {
            expiration: now.checked_add_secs(self.config.expiration_delay_sec)?,
            ref_block_num: tapos.ref_block_num,
            ref_block_prefix: tapos.ref_block_prefix,
            max_net_usage_words: VarUint32(self.config.max_net_usage_words),
            max_cpu_usage_ms: self.config.max_cpu_usage_ms,
            delay_sec: VarUint32(self.config.delay_sec),
        };

        let actions = self
            .actions
            .into_iter()
            .map(|a| a.resolve(packer))
            .collect::<Result<Vec<_>, _>>()?;

        LinkedTransaction::from_raw(
            context.chain_id,
            RawTransaction {
                header,
                context_free_actions: Vec::new(),
                actions,
                transaction_extensions: Vec::new(),
            },
        )
    }

    /// Link against the current time and a live chain source
    pub fn link_with(
        self,
        source: &impl ChainSource,
        packer: &impl ActionDataPacker,
    ) -> Result<LinkedTransaction, CoreError> {
        let context = source.chain_context()?;
        self.link(&context, packer, TimePointSec::now()?)
    }
}

/// Transaction with fixed bytes and digest, ready for signing
#[derive(Debug, Clone)]
pub struct LinkedTransaction {
    chain_id: Checksum256,
    transaction: RawTransaction,
    packed_trx: Vec<u8>,
    digest: Checksum256,
}

impl LinkedTransaction {
    /// Wrap an already assembled transaction body
    pub fn from_raw(chain_id: Checksum256, transaction: RawTransaction) -> Result<Self, CoreError> {
        check_action_count(transaction.actions.len())?;
        for action in &transaction.actions {
            check_authorization_count(action.account, action.name, action.authorization.len())?;
        }
        let packed_trx = serialize::to_bytes(&transaction);
        let digest = signing_digest(&chain_id, &packed_trx);
        let linked = LinkedTransaction {
            chain_id,
            transaction,
            packed_trx,
            digest,
        };
        info!(
            "Linked transaction {} ({} actions, expires {})",
            linked.id(),
            linked.transaction.actions.len(),
            linked.transaction.header.expiration
        );
        Ok(linked)
    }

    pub fn chain_id(&self) -> &Checksum256 {
        &self.chain_id
    }

    pub fn transaction(&self) -> &RawTransaction {
        &self.transaction
    }

    pub fn packed_trx(&self) -> &[u8] {
        &self.packed_trx
    }

    pub fn digest(&self) -> &Checksum256 {
        &self.digest
    }

    pub fn id(&self) -> Checksum256 {
        sha256(&self.packed_trx)
    }

    pub fn sign(self, key: &PrivateKey) -> Result<SignedTransaction, CoreError> {
        let signature = sign_digest(key, &self.digest)?;
        debug!("Signed {} with {}", self.id(), key.public_key());
        Ok(SignedTransaction {
            linked: self,
            signatures: vec![signature],
        })
    }
}

/// Transaction carrying one or more signatures
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    linked: LinkedTransaction,
    signatures: Vec<Signature>,
}

impl SignedTransaction {
    /// Append another signature over the same digest
    pub fn sign(mut self, key: &PrivateKey) -> Result<Self, CoreError> {
        if self.signatures.len() >= MAX_SIGNATURES {
            return Err(CoreError::validation(format!(
                "transaction already carries {MAX_SIGNATURES} signatures"
            )));
        }
        let signature = sign_digest(key, &self.linked.digest)?;
        self.signatures.push(signature);
        debug!(
            "Added signature {} to {}",
            self.signatures.len(),
            self.linked.id()
        );
        Ok(self)
    }

    pub fn linked(&self) -> &LinkedTransaction {
        &self.linked
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn id(&self) -> Checksum256 {
        self.linked.id()
    }

    /// Push body for the network layer
    pub fn to_packed(&self) -> PackedTransaction {
        PackedTransaction::new(self.signatures.clone(), self.linked.packed_trx.clone())
    }

    pub fn send(self, submitter: &impl TransactionSubmitter) -> Result<SentTransaction, CoreError> {
        let packed = self.to_packed();
        let id = self.id();
        info!(
            "Submitting transaction {} with {} signatures",
            id,
            self.signatures.len()
        );
        let response = submitter.submit(&packed)?;
        Ok(SentTransaction {
            id,
            packed,
            response,
        })
    }
}

/// Transaction accepted by the network layer
#[derive(Debug, Clone)]
pub struct SentTransaction {
    id: Checksum256,
    packed: PackedTransaction,
    response: Value,
}

impl SentTransaction {
    pub fn id(&self) -> &Checksum256 {
        &self.id
    }

    pub fn packed(&self) -> &PackedTransaction {
        &self.packed
    }

    /// Raw response from the submitter
    pub fn response(&self) -> &Value {
        &self.response
    }
}
