use serde::{Deserialize, Serialize};

/// Default seconds until a linked transaction expires
pub const DEFAULT_EXPIRATION_DELAY_SEC: u32 = 600;

/// Header settings applied when a transaction is linked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionConfig {
    /// Seconds added to the link time to form the expiration
    pub expiration_delay_sec: u32,
    /// CPU limit in milliseconds; 0 leaves it to the chain
    pub max_cpu_usage_ms: u8,
    /// NET limit in 8-byte words; 0 leaves it to the chain
    pub max_net_usage_words: u32,
    pub delay_sec: u32,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        TransactionConfig {
            expiration_delay_sec: DEFAULT_EXPIRATION_DELAY_SEC,
            max_cpu_usage_ms: 0,
            max_net_usage_words: 0,
            delay_sec: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TransactionConfig =
            serde_json::from_str(r#"{"max_cpu_usage_ms": 5}"#).unwrap();
        assert_eq!(config.expiration_delay_sec, 600);
        assert_eq!(config.max_cpu_usage_ms, 5);
    }
}
