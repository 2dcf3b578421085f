use serde::{Deserialize, Serialize};

use crate::codec::{Pack, Reader, Unpack, Writer};
use crate::error::CoreError;

/// Variable-length unsigned 32-bit integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VarUint32(pub u32);

impl VarUint32 {
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Number of bytes the encoding occupies
    pub fn encoded_len(&self) -> usize {
        match self.0 {
            0..=0x7f => 1,
            0x80..=0x3fff => 2,
            0x4000..=0x1f_ffff => 3,
            0x20_0000..=0x0fff_ffff => 4,
            _ => 5,
        }
    }
}

impl From<u32> for VarUint32 {
    fn from(v: u32) -> Self {
        VarUint32(v)
    }
}

impl TryFrom<u64> for VarUint32 {
    type Error = CoreError;

    fn try_from(v: u64) -> Result<Self, Self::Error> {
        u32::try_from(v)
            .map(VarUint32)
            .map_err(|_| CoreError::validation(format!("{v} does not fit in varuint32")))
    }
}

impl Pack for VarUint32 {
    fn pack(&self, w: &mut Writer) {
        w.write_varuint32(self.0);
    }
}

impl Unpack for VarUint32 {
    fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError> {
        Ok(VarUint32(r.read_varuint32()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_len_matches_writer() {
        for v in [0u32, 127, 128, 16383, 16384, 0x1f_ffff, 0x20_0000, u32::MAX] {
            let value = VarUint32(v);
            assert_eq!(value.to_packed().len(), value.encoded_len(), "{v}");
        }
    }

    #[test]
    fn test_range_check() {
        assert!(VarUint32::try_from(u64::from(u32::MAX)).is_ok());
        assert!(VarUint32::try_from(u64::from(u32::MAX) + 1).is_err());
    }
}
