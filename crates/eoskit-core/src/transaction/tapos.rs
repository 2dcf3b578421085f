use serde::{Deserialize, Serialize};

use crate::crypto::Checksum256;

/// Reference-block fields binding a transaction to recent chain state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaposRef {
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
}

impl TaposRef {
    /// Derive from a block id.
    ///
    /// The id starts with the big-endian block number, so `ref_block_num` is
    /// its low 16 bits. `ref_block_prefix` is the low half of the
    /// little-endian u64 at bytes 8..16.
    pub fn from_block_id(block_id: &Checksum256) -> Self {
        let id = block_id.as_bytes();
        let block_num = u32::from_be_bytes([id[0], id[1], id[2], id[3]]);
        let prefix = u32::from_le_bytes([id[8], id[9], id[10], id[11]]);
        TaposRef {
            ref_block_num: (block_num & 0xffff) as u16,
            ref_block_prefix: prefix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_block_id() {
        let id = Checksum256::from_hex(
            "0000a4a3c0fc5c0c3e8f5e2ab0a2a6e0d07a0b16c2d5d3a1b0e4f6a7c8d9e0f1",
        )
        .unwrap();
        let tapos = TaposRef::from_block_id(&id);
        assert_eq!(tapos.ref_block_num, 0xa4a3);
        assert_eq!(tapos.ref_block_prefix, 0x2a5e8f3e);
    }

    #[test]
    fn test_block_num_masked() {
        let mut bytes = [0u8; 32];
        bytes[..4].copy_from_slice(&0x0123_4567u32.to_be_bytes());
        let tapos = TaposRef::from_block_id(&Checksum256(bytes));
        assert_eq!(tapos.ref_block_num, 0x4567);
        assert_eq!(tapos.ref_block_prefix, 0);
    }

    #[test]
    fn test_deterministic() {
        let id = Checksum256([0x5a; 32]);
        assert_eq!(TaposRef::from_block_id(&id), TaposRef::from_block_id(&id));
    }
}
