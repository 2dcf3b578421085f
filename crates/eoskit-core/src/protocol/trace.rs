//! Execution receipts and traces as reported by a node.
//!
//! Each versioned record starts with a varuint32 variant index; only index
//! 0 exists today.

use serde::{Deserialize, Serialize};

use crate::crypto::{Checksum256, Signature};
use crate::packable_struct;
use crate::protocol::action::{Action, Extension};
use crate::types::{Bytes, Name, TimePointSec, VarUint32};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSequence {
    pub account: Name,
    pub sequence: u64,
}

packable_struct!(AuthSequence { account, sequence });

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReceipt {
    pub version: VarUint32,
    pub receiver: Name,
    pub act_digest: Checksum256,
    pub global_sequence: u64,
    pub recv_sequence: u64,
    pub auth_sequence: Vec<AuthSequence>,
    pub code_sequence: VarUint32,
    pub abi_sequence: VarUint32,
}

packable_struct!(ActionReceipt {
    version,
    receiver,
    act_digest,
    global_sequence,
    recv_sequence,
    auth_sequence,
    code_sequence,
    abi_sequence
});

/// RAM usage change charged to an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDelta {
    pub account: Name,
    pub delta: i64,
}

packable_struct!(AccountDelta { account, delta });

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTrace {
    pub version: VarUint32,
    pub action_ordinal: VarUint32,
    pub creator_action_ordinal: VarUint32,
    pub receipt: Option<ActionReceipt>,
    pub receiver: Name,
    pub act: Action,
    pub context_free: bool,
    pub elapsed: i64,
    pub console: String,
    pub account_ram_deltas: Vec<AccountDelta>,
    pub except: Option<String>,
    pub error_code: Option<u64>,
}

packable_struct!(ActionTrace {
    version,
    action_ordinal,
    creator_action_ordinal,
    receipt,
    receiver,
    act,
    context_free,
    elapsed,
    console,
    account_ram_deltas,
    except,
    error_code
});

/// Header and signatures of a transaction seen in a trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialTransaction {
    pub version: VarUint32,
    pub expiration: TimePointSec,
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    pub max_net_usage_words: VarUint32,
    pub max_cpu_usage_ms: u8,
    pub delay_sec: VarUint32,
    pub transaction_extensions: Vec<Extension>,
    pub signatures: Vec<Signature>,
    pub context_free_data: Vec<Bytes>,
}

packable_struct!(PartialTransaction {
    version,
    expiration,
    ref_block_num,
    ref_block_prefix,
    max_net_usage_words,
    max_cpu_usage_ms,
    delay_sec,
    transaction_extensions,
    signatures,
    context_free_data
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionTrace {
    pub version: VarUint32,
    pub id: Checksum256,
    pub status: u8,
    pub cpu_usage_us: u32,
    pub net_usage_words: VarUint32,
    pub elapsed: i64,
    pub net_usage: u64,
    pub scheduled: bool,
    pub action_traces: Vec<ActionTrace>,
    pub account_ram_delta: Option<AccountDelta>,
    pub except: Option<String>,
    pub error_code: Option<u64>,
    pub failed_dtrx_trace: Option<Box<TransactionTrace>>,
    pub partial: Option<PartialTransaction>,
}

packable_struct!(TransactionTrace {
    version,
    id,
    status,
    cpu_usage_us,
    net_usage_words,
    elapsed,
    net_usage,
    scheduled,
    action_traces,
    account_ram_delta,
    except,
    error_code,
    failed_dtrx_trace,
    partial
});
