use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::codec::{Pack, Reader, Unpack, Writer};
use crate::error::CoreError;

const CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

/// Maximum length of a textual name
pub const MAX_NAME_LEN: usize = 13;

/// Account, action, permission or table identifier packed into 64 bits.
///
/// Up to 12 characters take 5 bits each, starting at the most significant
/// end; a 13th character takes the low 4 bits. Equality and hashing only
/// look at the non-dot characters, so `.` padding never distinguishes names.
#[derive(Clone, Copy, Default)]
pub struct Name(u64);

impl Name {
    /// Wrap a raw packed value. Every u64 decodes to a valid name.
    pub const fn from_u64(value: u64) -> Self {
        Name(value)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Parse and validate a textual name
    pub fn new(s: &str) -> Result<Self, CoreError> {
        let bytes = s.as_bytes();
        if bytes.len() > MAX_NAME_LEN {
            return Err(CoreError::validation(format!(
                "name '{s}' is longer than {MAX_NAME_LEN} characters"
            )));
        }

        let mut value = 0u64;
        for (i, &c) in bytes.iter().enumerate() {
            let symbol = char_to_symbol(c).ok_or_else(|| {
                CoreError::validation(format!("invalid character '{}' in name '{s}'", c as char))
            })?;
            if i < 12 {
                value |= (symbol & 0x1f) << (64 - 5 * (i + 1));
            } else {
                if symbol > 0x0f {
                    return Err(CoreError::validation(format!(
                        "13th character of name '{s}' must be in [.1-5a-j], found '{}'",
                        c as char
                    )));
                }
                value |= symbol;
            }
        }
        Ok(Name(value))
    }

    /// The non-dot symbols in order, packed 5 bits apiece
    fn significant(&self) -> u128 {
        let mut key = 0u128;
        for symbol in self.symbols() {
            if symbol != 0 {
                key = (key << 5) | u128::from(symbol);
            }
        }
        key
    }

    /// All 13 symbols, most significant first
    fn symbols(&self) -> [u8; 13] {
        let mut out = [0u8; 13];
        let mut tmp = self.0;
        for i in 0..13 {
            let (mask, shift) = if i == 0 { (0x0f, 4) } else { (0x1f, 5) };
            out[12 - i] = (tmp & mask) as u8;
            tmp >>= shift;
        }
        out
    }
}

fn char_to_symbol(c: u8) -> Option<u64> {
    match c {
        b'a'..=b'z' => Some(u64::from(c - b'a') + 6),
        b'1'..=b'5' => Some(u64::from(c - b'1') + 1),
        b'.' => Some(0),
        _ => None,
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.significant() == other.significant()
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chars: Vec<u8> = self
            .symbols()
            .iter()
            .map(|&s| CHARMAP[s as usize])
            .collect();
        let text = std::str::from_utf8(&chars).map_err(|_| fmt::Error)?;
        f.write_str(text.trim_end_matches('.'))
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({self})")
    }
}

impl FromStr for Name {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Name::new(s)
    }
}

impl TryFrom<&str> for Name {
    type Error = CoreError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Name::new(s)
    }
}

impl Pack for Name {
    fn pack(&self, w: &mut Writer) {
        self.0.pack(w);
    }
}

impl Unpack for Name {
    fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError> {
        Ok(Name(u64::unpack(r)?))
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Name::new(&s).map_err(serde::de::Error::custom)
    }
}
