//! Static table of type names the packer understands without an ABI.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::abi::def::{
    AbiDef, ActionDef, ClausePair, ErrorMessage, FieldDef, StructDef, TableDef, TypeDef,
    VariantDef,
};
use crate::codec::{Pack, Reader, Unpack, Writer};
use crate::crypto::{Checksum256, PublicKey, Signature};
use crate::error::CoreError;
use crate::protocol::{
    AccountDelta, Action, ActionReceipt, ActionTrace, AuthSequence, Authority, BlockPosition,
    Extension, GetBlocksRequestV0, GetBlocksResultV0, GetStatusResultV0, KeyWeight,
    PartialTransaction, PermissionLevel, PermissionLevelWeight, RawTransaction,
    SignedTransactionData, StateRow, TableDelta, TransactionTrace, WaitWeight,
};
use crate::types::{
    Asset, Bytes, ExtendedAsset, Name, Symbol, SymbolCode, TimePointSec, VarUint32,
};

/// Names that are recognised but have no codec
pub const UNSUPPORTED_TYPES: &[&str] = &[
    "int128",
    "uint128",
    "float32",
    "float64",
    "float128",
    "varint32",
    "time_point",
    "block_timestamp_type",
    "checksum160",
    "checksum512",
];

macro_rules! protocol_structs {
    ($($variant:ident => $name:literal : $ty:ty),* $(,)?) => {
        /// Protocol-defined structs with a fixed shape
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ProtocolStruct {
            $($variant),*
        }

        impl ProtocolStruct {
            pub const ALL: &'static [ProtocolStruct] = &[$(ProtocolStruct::$variant),*];

            pub fn type_name(&self) -> &'static str {
                match self {
                    $(ProtocolStruct::$variant => $name),*
                }
            }

            fn pack_value(&self, value: &Value, w: &mut Writer) -> Result<(), CoreError> {
                match self {
                    $(ProtocolStruct::$variant => pack_serde::<$ty>(value, w)),*
                }
            }

            fn unpack_value(&self, r: &mut Reader<'_>) -> Result<Value, CoreError> {
                match self {
                    $(ProtocolStruct::$variant => unpack_serde::<$ty>(r)),*
                }
            }
        }
    };
}

protocol_structs! {
    PermissionLevel => "permission_level": PermissionLevel,
    PermissionLevelWeight => "permission_level_weight": PermissionLevelWeight,
    KeyWeight => "key_weight": KeyWeight,
    WaitWeight => "wait_weight": WaitWeight,
    Authority => "authority": Authority,
    Action => "action": Action,
    Extension => "extension": Extension,
    Transaction => "transaction": RawTransaction,
    SignedTransaction => "signed_transaction": SignedTransactionData,
    ActionReceipt => "action_receipt": ActionReceipt,
    AuthSequence => "auth_sequence": AuthSequence,
    AccountDelta => "account_delta": AccountDelta,
    ActionTrace => "action_trace": ActionTrace,
    TransactionTrace => "transaction_trace": TransactionTrace,
    PartialTransaction => "partial_transaction": PartialTransaction,
    TableDelta => "table_delta": TableDelta,
    StateRow => "state_row": StateRow,
    BlockPosition => "block_position": BlockPosition,
    GetBlocksRequestV0 => "get_blocks_request_v0": GetBlocksRequestV0,
    GetStatusResultV0 => "get_status_result_v0": GetStatusResultV0,
    GetBlocksResultV0 => "get_blocks_result_v0": GetBlocksResultV0,
    AbiDef => "abi_def": AbiDef,
    TypeDef => "type_def": TypeDef,
    FieldDef => "field_def": FieldDef,
    StructDef => "struct_def": StructDef,
    ActionDef => "action_def": ActionDef,
    TableDef => "table_def": TableDef,
    ClausePair => "clause_pair": ClausePair,
    ErrorMessage => "error_message": ErrorMessage,
    VariantDef => "variant_def": VariantDef,
}

/// Leaf type with a built-in codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Bool,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    VarUint32,
    TimePointSec,
    Name,
    Bytes,
    String,
    Checksum256,
    PublicKey,
    Signature,
    Symbol,
    SymbolCode,
    Asset,
    ExtendedAsset,
    Protocol(ProtocolStruct),
}

fn registry() -> &'static HashMap<&'static str, BuiltinType> {
    static REGISTRY: OnceLock<HashMap<&'static str, BuiltinType>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut map = HashMap::new();
        let primitives = [
            ("bool", BuiltinType::Bool),
            ("int8", BuiltinType::Int8),
            ("uint8", BuiltinType::Uint8),
            ("int16", BuiltinType::Int16),
            ("uint16", BuiltinType::Uint16),
            ("int32", BuiltinType::Int32),
            ("uint32", BuiltinType::Uint32),
            ("int64", BuiltinType::Int64),
            ("uint64", BuiltinType::Uint64),
            ("varuint32", BuiltinType::VarUint32),
            ("time_point_sec", BuiltinType::TimePointSec),
            ("name", BuiltinType::Name),
            ("account_name", BuiltinType::Name),
            ("permission_name", BuiltinType::Name),
            ("action_name", BuiltinType::Name),
            ("table_name", BuiltinType::Name),
            ("scope_name", BuiltinType::Name),
            ("bytes", BuiltinType::Bytes),
            ("string", BuiltinType::String),
            ("field_name", BuiltinType::String),
            ("type_name", BuiltinType::String),
            ("checksum256", BuiltinType::Checksum256),
            ("sha256", BuiltinType::Checksum256),
            ("chain_id_type", BuiltinType::Checksum256),
            ("block_id_type", BuiltinType::Checksum256),
            ("transaction_id_type", BuiltinType::Checksum256),
            ("public_key", BuiltinType::PublicKey),
            ("signature", BuiltinType::Signature),
            ("symbol", BuiltinType::Symbol),
            ("symbol_code", BuiltinType::SymbolCode),
            ("asset", BuiltinType::Asset),
            ("extended_asset", BuiltinType::ExtendedAsset),
        ];
        map.extend(primitives);
        for s in ProtocolStruct::ALL {
            map.insert(s.type_name(), BuiltinType::Protocol(*s));
        }
        map
    })
}

impl BuiltinType {
    /// Look up a type name in the static registry
    pub fn lookup(name: &str) -> Option<BuiltinType> {
        registry().get(name).copied()
    }

    pub fn pack_value(&self, value: &Value, w: &mut Writer) -> Result<(), CoreError> {
        match self {
            BuiltinType::Bool => match value {
                Value::Bool(b) => b.pack(w),
                other => match as_u64(other)? {
                    0 => false.pack(w),
                    1 => true.pack(w),
                    v => return Err(CoreError::validation(format!("{v} is not a bool"))),
                },
            },
            BuiltinType::Int8 => int_in_range::<i8>(value)?.pack(w),
            BuiltinType::Uint8 => uint_in_range::<u8>(value)?.pack(w),
            BuiltinType::Int16 => int_in_range::<i16>(value)?.pack(w),
            BuiltinType::Uint16 => uint_in_range::<u16>(value)?.pack(w),
            BuiltinType::Int32 => int_in_range::<i32>(value)?.pack(w),
            BuiltinType::Uint32 => uint_in_range::<u32>(value)?.pack(w),
            BuiltinType::Int64 => as_i64(value)?.pack(w),
            BuiltinType::Uint64 => as_u64(value)?.pack(w),
            BuiltinType::VarUint32 => VarUint32(uint_in_range::<u32>(value)?).pack(w),
            BuiltinType::TimePointSec => match value {
                Value::String(_) => parse_str::<TimePointSec>(value)?.pack(w),
                other => TimePointSec::from_secs(uint_in_range::<u32>(other)?).pack(w),
            },
            BuiltinType::Name => match value {
                Value::String(_) => parse_str::<Name>(value)?.pack(w),
                other => Name::from_u64(as_u64(other)?).pack(w),
            },
            BuiltinType::Bytes => {
                let bytes = Bytes::from_hex(as_str(value)?)?.into_vec();
                w.try_write_len(bytes.len())?;
                w.write_bytes(&bytes);
            }
            BuiltinType::String => {
                let text = as_str(value)?;
                w.try_write_len(text.len())?;
                w.write_bytes(text.as_bytes());
            }
            BuiltinType::Checksum256 => parse_str::<Checksum256>(value)?.pack(w),
            BuiltinType::PublicKey => parse_str::<PublicKey>(value)?.pack(w),
            BuiltinType::Signature => parse_str::<Signature>(value)?.pack(w),
            BuiltinType::Symbol => parse_str::<Symbol>(value)?.pack(w),
            BuiltinType::SymbolCode => parse_str::<SymbolCode>(value)?.pack(w),
            BuiltinType::Asset => parse_str::<Asset>(value)?.pack(w),
            BuiltinType::ExtendedAsset => return pack_serde::<ExtendedAsset>(value, w),
            BuiltinType::Protocol(s) => return s.pack_value(value, w),
        }
        Ok(())
    }

    pub fn unpack_value(&self, r: &mut Reader<'_>) -> Result<Value, CoreError> {
        let value = match self {
            BuiltinType::Bool => Value::from(bool::unpack(r)?),
            BuiltinType::Int8 => Value::from(i8::unpack(r)?),
            BuiltinType::Uint8 => Value::from(u8::unpack(r)?),
            BuiltinType::Int16 => Value::from(i16::unpack(r)?),
            BuiltinType::Uint16 => Value::from(u16::unpack(r)?),
            BuiltinType::Int32 => Value::from(i32::unpack(r)?),
            BuiltinType::Uint32 => Value::from(u32::unpack(r)?),
            BuiltinType::Int64 => Value::from(i64::unpack(r)?),
            BuiltinType::Uint64 => Value::from(u64::unpack(r)?),
            BuiltinType::VarUint32 => Value::from(VarUint32::unpack(r)?.value()),
            BuiltinType::TimePointSec => unpack_serde::<TimePointSec>(r)?,
            BuiltinType::Name => unpack_serde::<Name>(r)?,
            BuiltinType::Bytes => unpack_serde::<Bytes>(r)?,
            BuiltinType::String => Value::from(String::unpack(r)?),
            BuiltinType::Checksum256 => unpack_serde::<Checksum256>(r)?,
            BuiltinType::PublicKey => unpack_serde::<PublicKey>(r)?,
            BuiltinType::Signature => unpack_serde::<Signature>(r)?,
            BuiltinType::Symbol => unpack_serde::<Symbol>(r)?,
            BuiltinType::SymbolCode => unpack_serde::<SymbolCode>(r)?,
            BuiltinType::Asset => unpack_serde::<Asset>(r)?,
            BuiltinType::ExtendedAsset => unpack_serde::<ExtendedAsset>(r)?,
            BuiltinType::Protocol(s) => s.unpack_value(r)?,
        };
        Ok(value)
    }
}

fn pack_serde<T: DeserializeOwned + Pack>(value: &Value, w: &mut Writer) -> Result<(), CoreError> {
    let typed: T = serde_json::from_value(value.clone())
        .map_err(|e| CoreError::validation(e.to_string()))?;
    typed.pack(w);
    Ok(())
}

fn unpack_serde<T: Unpack + Serialize>(r: &mut Reader<'_>) -> Result<Value, CoreError> {
    Ok(serde_json::to_value(T::unpack(r)?)?)
}

fn as_str(value: &Value) -> Result<&str, CoreError> {
    value
        .as_str()
        .ok_or_else(|| CoreError::validation(format!("expected a string, got {value}")))
}

fn parse_str<T: FromStr<Err = CoreError>>(value: &Value) -> Result<T, CoreError> {
    as_str(value)?.parse()
}

fn as_i64(value: &Value) -> Result<i64, CoreError> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| CoreError::validation(format!("expected a signed integer, got {value}")))
}

fn as_u64(value: &Value) -> Result<u64, CoreError> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| CoreError::validation(format!("expected an unsigned integer, got {value}")))
}

fn int_in_range<T: TryFrom<i64>>(value: &Value) -> Result<T, CoreError> {
    let v = as_i64(value)?;
    T::try_from(v).map_err(|_| {
        CoreError::validation(format!("{v} is out of range for {}", std::any::type_name::<T>()))
    })
}

fn uint_in_range<T: TryFrom<u64>>(value: &Value) -> Result<T, CoreError> {
    let v = as_u64(value)?;
    T::try_from(v).map_err(|_| {
        CoreError::validation(format!("{v} is out of range for {}", std::any::type_name::<T>()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pack(ty: &str, value: Value) -> Result<Vec<u8>, CoreError> {
        let mut w = Writer::new();
        BuiltinType::lookup(ty).unwrap().pack_value(&value, &mut w)?;
        Ok(w.into_bytes())
    }

    fn unpack(ty: &str, bytes: &[u8]) -> Value {
        let mut r = Reader::new(bytes);
        let v = BuiltinType::lookup(ty).unwrap().unpack_value(&mut r).unwrap();
        assert!(r.is_empty());
        v
    }

    #[test]
    fn test_registry_covers_protocol_structs() {
        for s in ProtocolStruct::ALL {
            assert_eq!(
                BuiltinType::lookup(s.type_name()),
                Some(BuiltinType::Protocol(*s))
            );
        }
        assert_eq!(BuiltinType::lookup("account_name"), Some(BuiltinType::Name));
        assert_eq!(BuiltinType::lookup("float64"), None);
    }

    #[test]
    fn test_integer_ranges() {
        assert_eq!(pack("uint8", json!(255)).unwrap(), vec![0xff]);
        assert!(matches!(pack("uint8", json!(256)), Err(CoreError::Validation(_))));
        assert!(matches!(pack("int8", json!(-129)), Err(CoreError::Validation(_))));
        assert_eq!(pack("int16", json!(-2)).unwrap(), vec![0xfe, 0xff]);
        assert!(pack("uint32", json!(-1)).is_err());
    }

    #[test]
    fn test_64_bit_strings() {
        let max = pack("uint64", json!("18446744073709551615")).unwrap();
        assert_eq!(max, vec![0xff; 8]);
        assert_eq!(pack("int64", json!("-1")).unwrap(), vec![0xff; 8]);
        assert_eq!(unpack("uint64", &max), json!(u64::MAX));
    }

    #[test]
    fn test_text_types() {
        let bytes = pack("asset", json!("1.0000 EOS")).unwrap();
        assert_eq!(unpack("asset", &bytes), json!("1.0000 EOS"));

        let bytes = pack("name", json!("eosio")).unwrap();
        assert_eq!(bytes, 6138663577826885632u64.to_le_bytes());
        assert_eq!(unpack("account_name", &bytes), json!("eosio"));

        assert!(pack("name", json!("UPPER")).is_err());
    }

    #[test]
    fn test_protocol_struct_through_json() {
        let level = json!({"actor": "alice", "permission": "active"});
        let bytes = pack("permission_level", level.clone()).unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(unpack("permission_level", &bytes), level);
    }

    #[test]
    fn test_bool_forms() {
        assert_eq!(pack("bool", json!(true)).unwrap(), vec![1]);
        assert_eq!(pack("bool", json!(0)).unwrap(), vec![0]);
        assert!(pack("bool", json!(2)).is_err());
    }
}
