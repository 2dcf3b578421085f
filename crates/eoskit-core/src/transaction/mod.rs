pub mod collaborator;
pub mod config;
pub mod lifecycle;
pub mod packed;
pub mod tapos;

pub use collaborator::{
    ActionDataPacker, ChainContext, ChainSource, PrepackedOnly, TransactionSubmitter,
};
pub use config::{TransactionConfig, DEFAULT_EXPIRATION_DELAY_SEC};
pub use lifecycle::{
    signing_digest, ActionData, DraftAction, LinkedTransaction, SentTransaction,
    SignedTransaction, Transaction, MAX_ACTIONS, MAX_SIGNATURES,
};
pub use packed::PackedTransaction;
pub use tapos::TaposRef;
