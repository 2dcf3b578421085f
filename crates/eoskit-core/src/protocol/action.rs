use serde::{Deserialize, Serialize};

use crate::packable_struct;
use crate::protocol::authority::PermissionLevel;
use crate::types::{Bytes, Name};

/// Maximum authorizations carried by one action
pub const MAX_AUTHORIZATIONS: usize = 10;

/// Contract call with already packed argument data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub account: Name,
    pub name: Name,
    pub authorization: Vec<PermissionLevel>,
    pub data: Bytes,
}

impl Action {
    pub fn new(
        account: Name,
        name: Name,
        authorization: Vec<PermissionLevel>,
        data: impl Into<Bytes>,
    ) -> Self {
        Action {
            account,
            name,
            authorization,
            data: data.into(),
        }
    }
}

packable_struct!(Action {
    account,
    name,
    authorization,
    data
});

/// Typed extension payload attached to transactions and ABIs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    #[serde(rename = "type")]
    pub ty: u16,
    pub data: Bytes,
}

packable_struct!(Extension { ty, data });

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Pack;
    use crate::serialize;

    #[test]
    fn test_action_layout() {
        let action = Action::new(
            Name::new("eosio.token").unwrap(),
            Name::new("transfer").unwrap(),
            vec![PermissionLevel::new(
                Name::new("alice").unwrap(),
                Name::new("active").unwrap(),
            )],
            vec![0xaa, 0xbb],
        );
        let bytes = action.to_packed();
        // account(8) + name(8) + auth count(1) + auth(16) + data len(1) + data(2)
        assert_eq!(bytes.len(), 36);
        assert_eq!(bytes[16], 1);
        assert_eq!(&bytes[33..], &[0x02, 0xaa, 0xbb]);

        let back: Action = serialize::from_bytes(&bytes).unwrap();
        assert_eq!(back, action);
    }

    #[test]
    fn test_action_json_shape() {
        let json = serde_json::json!({
            "account": "eosio.token",
            "name": "transfer",
            "authorization": [{"actor": "alice", "permission": "active"}],
            "data": "aabb"
        });
        let action: Action = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(serde_json::to_value(&action).unwrap(), json);
    }

    #[test]
    fn test_extension_type_field() {
        let ext = Extension {
            ty: 1,
            data: Bytes::new(vec![9]),
        };
        let json = serde_json::to_value(&ext).unwrap();
        assert_eq!(json["type"], 1);
        assert_eq!(ext.to_packed(), vec![1, 0, 1, 9]);
    }
}
