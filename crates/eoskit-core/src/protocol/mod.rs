pub mod action;
pub mod authority;
pub mod ship;
pub mod trace;
pub mod transaction;

pub use action::{Action, Extension, MAX_AUTHORIZATIONS};
pub use authority::{Authority, KeyWeight, PermissionLevel, PermissionLevelWeight, WaitWeight};
pub use ship::{
    BlockPosition, GetBlocksRequestV0, GetBlocksResultV0, GetStatusResultV0, StateRow, TableDelta,
};
pub use trace::{
    AccountDelta, ActionReceipt, ActionTrace, AuthSequence, PartialTransaction, TransactionTrace,
};
pub use transaction::{RawTransaction, SignedTransactionData, TransactionHeader};
