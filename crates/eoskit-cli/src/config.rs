use std::path::Path;

use anyhow::Result;
use eoskit_core::TransactionConfig;
use serde::{Deserialize, Serialize};

/// Default node API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8888";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Node API endpoint
    pub endpoint: String,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,

    /// Header settings for linked transactions
    pub transaction: TransactionConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 10,
            transaction: TransactionConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load config from file, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(ClientConfig::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Generate a sample configuration
pub fn generate_sample_config() -> ClientConfig {
    ClientConfig {
        transaction: TransactionConfig {
            expiration_delay_sec: 120,
            max_cpu_usage_ms: 0,
            max_net_usage_words: 0,
            delay_sec: 0,
        },
        ..ClientConfig::default()
    }
}
