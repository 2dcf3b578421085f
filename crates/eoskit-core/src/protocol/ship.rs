//! State-history messages exchanged with a node's streaming endpoint.

use serde::{Deserialize, Serialize};

use crate::crypto::Checksum256;
use crate::packable_struct;
use crate::types::{Bytes, VarUint32};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPosition {
    pub block_num: u32,
    pub block_id: Checksum256,
}

packable_struct!(BlockPosition {
    block_num,
    block_id
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBlocksRequestV0 {
    pub start_block_num: u32,
    pub end_block_num: u32,
    pub max_messages_in_flight: u32,
    #[serde(default)]
    pub have_positions: Vec<BlockPosition>,
    pub irreversible_only: bool,
    pub fetch_block: bool,
    pub fetch_traces: bool,
    pub fetch_deltas: bool,
}

impl GetBlocksRequestV0 {
    /// Request everything from `start` onward
    pub fn from_block(start_block_num: u32) -> Self {
        GetBlocksRequestV0 {
            start_block_num,
            end_block_num: u32::MAX,
            max_messages_in_flight: u32::MAX,
            have_positions: Vec::new(),
            irreversible_only: false,
            fetch_block: true,
            fetch_traces: true,
            fetch_deltas: true,
        }
    }
}

packable_struct!(GetBlocksRequestV0 {
    start_block_num,
    end_block_num,
    max_messages_in_flight,
    have_positions,
    irreversible_only,
    fetch_block,
    fetch_traces,
    fetch_deltas
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetStatusResultV0 {
    pub head: BlockPosition,
    pub last_irreversible: BlockPosition,
    pub trace_begin_block: u32,
    pub trace_end_block: u32,
    pub chain_state_begin_block: u32,
    pub chain_state_end_block: u32,
}

packable_struct!(GetStatusResultV0 {
    head,
    last_irreversible,
    trace_begin_block,
    trace_end_block,
    chain_state_begin_block,
    chain_state_end_block
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBlocksResultV0 {
    pub head: BlockPosition,
    pub last_irreversible: BlockPosition,
    pub this_block: Option<BlockPosition>,
    pub prev_block: Option<BlockPosition>,
    pub block: Option<Bytes>,
    pub traces: Option<Bytes>,
    pub deltas: Option<Bytes>,
}

packable_struct!(GetBlocksResultV0 {
    head,
    last_irreversible,
    this_block,
    prev_block,
    block,
    traces,
    deltas
});

/// One row inside a table delta; `present` is false for removals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRow {
    pub present: bool,
    pub data: Bytes,
}

packable_struct!(StateRow { present, data });

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDelta {
    pub version: VarUint32,
    pub name: String,
    pub rows: Vec<StateRow>,
}

packable_struct!(TableDelta {
    version,
    name,
    rows
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Pack;
    use crate::serialize;

    #[test]
    fn test_request_layout() {
        let req = GetBlocksRequestV0::from_block(100);
        let bytes = req.to_packed();
        // three u32, empty position list, four flags
        assert_eq!(bytes.len(), 12 + 1 + 4);
        assert_eq!(&bytes[0..4], &100u32.to_le_bytes());
        assert_eq!(&bytes[13..], &[0, 1, 1, 1]);
    }

    #[test]
    fn test_result_with_optional_fields() {
        let pos = BlockPosition {
            block_num: 7,
            block_id: Checksum256([7; 32]),
        };
        let result = GetBlocksResultV0 {
            head: pos.clone(),
            last_irreversible: pos.clone(),
            this_block: Some(pos),
            prev_block: None,
            block: Some(Bytes::new(vec![1, 2])),
            traces: None,
            deltas: None,
        };
        let bytes = serialize::to_bytes(&result);
        let back: GetBlocksResultV0 = serialize::from_bytes(&bytes).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_table_delta_roundtrip() {
        let delta = TableDelta {
            version: VarUint32(0),
            name: "contract_row".into(),
            rows: vec![
                StateRow {
                    present: true,
                    data: Bytes::new(vec![0xab; 4]),
                },
                StateRow {
                    present: false,
                    data: Bytes::default(),
                },
            ],
        };
        let back: TableDelta = serialize::from_hex(&serialize::to_hex(&delta)).unwrap();
        assert_eq!(back, delta);
    }
}
