use serde::Deserialize;

use crate::codec::{Pack, Reader, Unpack, Writer};
use crate::error::CoreError;

/// Serialize to wire bytes
pub fn to_bytes<T: Pack + ?Sized>(value: &T) -> Vec<u8> {
    let mut w = Writer::new();
    value.pack(&mut w);
    w.into_bytes()
}

/// Deserialize from wire bytes, rejecting any unread tail
pub fn from_bytes<T: Unpack>(bytes: &[u8]) -> Result<T, CoreError> {
    let mut r = Reader::new(bytes);
    let value = T::unpack(&mut r)?;
    if !r.is_empty() {
        return Err(CoreError::TrailingBytes(r.remaining()));
    }
    Ok(value)
}

/// Serialize to lowercase hex wire bytes
pub fn to_hex<T: Pack + ?Sized>(value: &T) -> String {
    hex::encode(to_bytes(value))
}

/// Deserialize from hex wire bytes
pub fn from_hex<T: Unpack>(s: &str) -> Result<T, CoreError> {
    let bytes = hex::decode(s)?;
    from_bytes(&bytes)
}

/// Deserialize from JSON string
pub fn from_json<'a, T: Deserialize<'a>>(json: &'a str) -> Result<T, CoreError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_roundtrip() {
        let value: Vec<String> = vec!["a".into(), "bc".into()];
        let bytes = to_bytes(&value);
        let recovered: Vec<String> = from_bytes(&bytes).unwrap();
        assert_eq!(value, recovered);
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let err = from_bytes::<u16>(&[1, 0, 0]).unwrap_err();
        assert!(matches!(err, CoreError::TrailingBytes(1)));
    }

    #[test]
    fn test_hex_roundtrip() {
        let hex_str = to_hex(&0xdeadbeefu32);
        assert_eq!(hex_str, "efbeadde");
        assert_eq!(from_hex::<u32>(&hex_str).unwrap(), 0xdeadbeef);
    }

    #[test]
    fn test_json_errors_convert() {
        let err = from_json::<u32>("\"x\"").unwrap_err();
        assert!(matches!(err, CoreError::Json(_)));
    }
}
