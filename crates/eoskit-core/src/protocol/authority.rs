use serde::{Deserialize, Serialize};

use crate::crypto::PublicKey;
use crate::packable_struct;
use crate::types::Name;

/// Actor and permission that authorize an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionLevel {
    pub actor: Name,
    pub permission: Name,
}

impl PermissionLevel {
    pub fn new(actor: Name, permission: Name) -> Self {
        PermissionLevel { actor, permission }
    }
}

packable_struct!(PermissionLevel { actor, permission });

/// Weighted account permission inside an authority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionLevelWeight {
    pub permission: PermissionLevel,
    pub weight: u16,
}

packable_struct!(PermissionLevelWeight { permission, weight });

/// Weighted key inside an authority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyWeight {
    pub key: PublicKey,
    pub weight: u16,
}

packable_struct!(KeyWeight { key, weight });

/// Weighted delay inside an authority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitWeight {
    pub wait_sec: u32,
    pub weight: u16,
}

packable_struct!(WaitWeight { wait_sec, weight });

/// Threshold authority over keys, accounts and delays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    pub threshold: u32,
    #[serde(default)]
    pub keys: Vec<KeyWeight>,
    #[serde(default)]
    pub accounts: Vec<PermissionLevelWeight>,
    #[serde(default)]
    pub waits: Vec<WaitWeight>,
}

impl Authority {
    /// Single-key authority with threshold 1
    pub fn from_key(key: PublicKey) -> Self {
        Authority {
            threshold: 1,
            keys: vec![KeyWeight { key, weight: 1 }],
            accounts: Vec::new(),
            waits: Vec::new(),
        }
    }

    /// Sum of all weights that can contribute toward the threshold
    pub fn total_weight(&self) -> u64 {
        let keys = self.keys.iter().map(|k| u64::from(k.weight));
        let accounts = self.accounts.iter().map(|a| u64::from(a.weight));
        let waits = self.waits.iter().map(|w| u64::from(w.weight));
        keys.chain(accounts).chain(waits).sum()
    }

    /// An authority whose weights can never reach its threshold is unusable
    pub fn is_satisfiable(&self) -> bool {
        self.threshold > 0 && self.total_weight() >= u64::from(self.threshold)
    }
}

packable_struct!(Authority {
    threshold,
    keys,
    accounts,
    waits
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Pack;
    use crate::serialize;

    const DEV_PUBLIC_KEY: &str = "EOS6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV";

    #[test]
    fn test_permission_level_layout() {
        let level = PermissionLevel::new(Name::new("eosio").unwrap(), Name::new("active").unwrap());
        let bytes = level.to_packed();
        assert_eq!(bytes.len(), 16);
        assert_eq!(
            hex::encode(&bytes),
            "0000000000ea305500000000a8ed3232"
        );
    }

    #[test]
    fn test_authority_roundtrip() {
        let auth = Authority::from_key(DEV_PUBLIC_KEY.parse().unwrap());
        assert!(auth.is_satisfiable());

        let bytes = serialize::to_bytes(&auth);
        // threshold(4) + count(1) + key(34) + weight(2) + two empty lists
        assert_eq!(bytes.len(), 4 + 1 + 34 + 2 + 1 + 1);
        let back: Authority = serialize::from_bytes(&bytes).unwrap();
        assert_eq!(back, auth);
    }

    #[test]
    fn test_authority_json_defaults() {
        let auth: Authority = serde_json::from_value(serde_json::json!({
            "threshold": 2,
            "accounts": [{
                "permission": {"actor": "alice", "permission": "active"},
                "weight": 1
            }]
        }))
        .unwrap();
        assert!(auth.keys.is_empty());
        assert!(!auth.is_satisfiable());
    }
}
