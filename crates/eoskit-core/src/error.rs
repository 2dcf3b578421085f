use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Checksum mismatch in {0}")]
    ChecksumMismatch(&'static str),

    #[error("Invalid number of arguments: expected {expected}, got {got}")]
    ArgumentCountMismatch { expected: usize, got: usize },

    #[error("Network delegation failed: {0}")]
    Delegation(String),

    #[error("Unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("Trailing bytes after decode: {0}")]
    TrailingBytes(usize),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("No canonical signature found after {0} attempts")]
    SigningExhausted(u32),

    #[error("Hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    #[error("Base58 decode error: {0}")]
    Base58(#[from] bs58::decode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }

    pub(crate) fn schema(msg: impl Into<String>) -> Self {
        CoreError::Schema(msg.into())
    }
}
