use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::abi::schema::Abi;
use crate::error::CoreError;
use crate::transaction::ActionDataPacker;
use crate::types::Name;

/// Compiled ABIs keyed by contract account.
///
/// Built up front and then only read, so lookups need no locking.
#[derive(Debug, Clone, Default)]
pub struct AbiRegistry {
    abis: HashMap<Name, Arc<Abi>>,
}

impl AbiRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a contract's ABI, replacing any previous one
    pub fn insert(&mut self, account: Name, abi: Abi) -> Arc<Abi> {
        let abi = Arc::new(abi);
        if self.abis.insert(account, Arc::clone(&abi)).is_some() {
            info!("Replaced ABI for {}", account);
        }
        abi
    }

    pub fn get(&self, account: Name) -> Option<Arc<Abi>> {
        self.abis.get(&account).cloned()
    }

    pub fn contains(&self, account: Name) -> bool {
        self.abis.contains_key(&account)
    }

    pub fn len(&self) -> usize {
        self.abis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abis.is_empty()
    }
}

impl ActionDataPacker for AbiRegistry {
    fn pack_action_data(
        &self,
        account: Name,
        action: Name,
        args: &Value,
    ) -> Result<Vec<u8>, CoreError> {
        let abi = self
            .abis
            .get(&account)
            .ok_or_else(|| CoreError::schema(format!("no ABI registered for '{account}'")))?;
        abi.pack_action(action, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn abi() -> Abi {
        Abi::new(
            serde_json::from_value(json!({
                "version": "eosio::abi/1.1",
                "structs": [{"name": "hi", "base": "", "fields": [{"name": "user", "type": "name"}]}],
                "actions": [{"name": "hi", "type": "hi", "ricardian_contract": ""}]
            }))
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_pack_through_registry() {
        let mut registry = AbiRegistry::new();
        let contract = Name::new("hello").unwrap();
        registry.insert(contract, abi());
        assert!(registry.contains(contract));

        let data = registry
            .pack_action_data(contract, Name::new("hi").unwrap(), &json!({"user": "eosio"}))
            .unwrap();
        assert_eq!(data, 6138663577826885632u64.to_le_bytes());
    }

    #[test]
    fn test_missing_account() {
        let registry = AbiRegistry::new();
        let err = registry
            .pack_action_data(
                Name::new("nobody").unwrap(),
                Name::new("hi").unwrap(),
                &json!({}),
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::Schema(_)));
    }

    #[test]
    fn test_shared_across_threads() {
        let mut registry = AbiRegistry::new();
        let contract = Name::new("hello").unwrap();
        registry.insert(contract, abi());

        let expected = registry
            .pack_action_data(contract, Name::new("hi").unwrap(), &json!(["alice"]))
            .unwrap();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    let data = registry
                        .pack_action_data(contract, Name::new("hi").unwrap(), &json!(["alice"]))
                        .unwrap();
                    assert_eq!(data, expected);
                });
            }
        });
    }
}
