//! Wire format and ABI integration tests

use eoskit_core::serialize;
use eoskit_core::{
    Abi, AbiDef, Asset, CoreError, Name, PrivateKey, PublicKey, Signature, TimePointSec,
    VarUint32,
};
use serde_json::json;

const DEV_PUBLIC_KEY: &str = "EOS6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV";
const DEV_PRIVATE_KEY: &str = "5KQwrPbwdL6PhXujxW37FSSQZ1JiwsST4cqQzDeyXtP79zkvFD3";
const SAMPLE_SIGNATURE: &str = "SIG_K1_HGU84aGtnCoa162Sf6WytZjd6MxBDTL8y8Lgr58kJmhbARyYaZXtDgWDZMMFUCq9kM6PEDgadkMTkFkoHgCDwzPiCsF6qi";
const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Replace the character at `index` with a different base58 symbol
fn flip_char(text: &str, index: usize) -> String {
    let original = text.as_bytes()[index] as char;
    let replacement = BASE58_ALPHABET
        .chars()
        .find(|c| *c != original)
        .unwrap();
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..index]);
    out.push(replacement);
    out.push_str(&text[index + 1..]);
    out
}

fn market_abi() -> Abi {
    Abi::from_json(
        &json!({
            "version": "eosio::abi/1.1",
            "types": [{"new_type_name": "order_id", "type": "uint64"}],
            "structs": [
                {"name": "header", "base": "", "fields": [
                    {"name": "id", "type": "order_id"},
                    {"name": "owner", "type": "name"}
                ]},
                {"name": "order", "base": "header", "fields": [
                    {"name": "price", "type": "asset"},
                    {"name": "tags", "type": "string[]"},
                    {"name": "expires", "type": "time_point_sec?"},
                    {"name": "note", "type": "string$"}
                ]},
                {"name": "placeorders", "base": "", "fields": [
                    {"name": "orders", "type": "order[]"}
                ]}
            ],
            "variants": [{"name": "payload", "types": ["uint8", "string", "order"]}],
            "actions": [{"name": "placeorders", "type": "placeorders", "ricardian_contract": ""}],
            "tables": [{
                "name": "orders",
                "index_type": "i64",
                "key_names": ["id"],
                "key_types": ["uint64"],
                "type": "order"
            }]
        })
        .to_string(),
    )
    .unwrap()
}

#[test]
fn test_public_key_checksum_detects_every_flip() {
    for i in 3..DEV_PUBLIC_KEY.len() {
        let corrupted = flip_char(DEV_PUBLIC_KEY, i);
        match corrupted.parse::<PublicKey>() {
            Err(CoreError::ChecksumMismatch(_))
            | Err(CoreError::Validation(_))
            | Err(CoreError::InvalidKey(_)) => {}
            other => panic!("flip at {i} not rejected: {other:?}"),
        }
    }
}

#[test]
fn test_signature_checksum_detects_every_flip() {
    for i in "SIG_K1_".len()..SAMPLE_SIGNATURE.len() {
        let corrupted = flip_char(SAMPLE_SIGNATURE, i);
        assert!(
            corrupted.parse::<Signature>().is_err(),
            "flip at {i} not rejected"
        );
    }
}

#[test]
fn test_key_text_forms_agree() {
    let key: PrivateKey = DEV_PRIVATE_KEY.parse().unwrap();
    let public = key.public_key();
    assert_eq!(public.to_string(), DEV_PUBLIC_KEY);

    let modern = public.to_modern_string();
    assert!(modern.starts_with("PUB_K1_"));
    assert_eq!(modern.parse::<PublicKey>().unwrap(), public);

    let reparsed: PrivateKey = key.to_modern_string().parse().unwrap();
    assert_eq!(reparsed.to_wif(), DEV_PRIVATE_KEY);
}

#[test]
fn test_nested_struct_pack_matches_hand_layout() {
    let abi = market_abi();
    let args = json!({
        "orders": [{
            "id": 7,
            "owner": "alice",
            "price": "2.5000 EOS",
            "tags": ["x"],
            "expires": null,
            "note": "n"
        }]
    });
    let packed = abi.pack_action(Name::new("placeorders").unwrap(), &args).unwrap();

    let mut expected = vec![0x01];
    expected.extend(7u64.to_le_bytes());
    expected.extend(Name::new("alice").unwrap().as_u64().to_le_bytes());
    expected.extend(serialize::to_bytes(&"2.5000 EOS".parse::<Asset>().unwrap()));
    expected.extend([0x01, 0x01, b'x']);
    expected.push(0x00);
    expected.extend([0x01, b'n']);
    assert_eq!(packed, expected);

    let unpacked = abi
        .unpack_action(Name::new("placeorders").unwrap(), &packed)
        .unwrap();
    assert_eq!(unpacked["orders"][0]["owner"], "alice");
    assert_eq!(unpacked["orders"][0]["price"], "2.5000 EOS");
    assert_eq!(unpacked["orders"][0]["expires"], serde_json::Value::Null);
}

#[test]
fn test_trailing_extension_may_be_omitted() {
    let abi = market_abi();
    let row = json!({
        "id": 1,
        "owner": "bob",
        "price": "0.0001 EOS",
        "tags": [],
        "expires": "2020-01-01T00:00:00"
    });
    let packed = abi.pack_table_row(Name::new("orders").unwrap(), &row).unwrap();
    let mut tail = vec![0x01];
    tail.extend(TimePointSec::from_secs(1_577_836_800).secs().to_le_bytes());
    assert!(packed.ends_with(&tail));

    let back = abi.unpack("order", &packed).unwrap();
    assert_eq!(back["expires"], "2020-01-01T00:00:00");
    assert!(back.get("note").is_none());
}

#[test]
fn test_variant_pack_selects_case() {
    let abi = market_abi();
    let packed = abi.pack("payload", &json!(["string", "hello"])).unwrap();
    assert_eq!(packed, [&[0x01u8, 0x05][..], &b"hello"[..]].concat());
    assert_eq!(
        abi.unpack("payload", &packed).unwrap(),
        json!(["string", "hello"])
    );
    assert!(abi.pack("payload", &json!(["int64", 1])).is_err());
}

#[test]
fn test_abi_def_binary_round_trip() {
    let abi = market_abi();
    let bytes = serialize::to_bytes(abi.def());
    let decoded: AbiDef = serialize::from_bytes(&bytes).unwrap();
    assert_eq!(&decoded, abi.def());

    let rebuilt = Abi::from_packed(&bytes).unwrap();
    assert_eq!(
        rebuilt
            .action_type(Name::new("placeorders").unwrap())
            .unwrap(),
        "placeorders"
    );
}

#[test]
fn test_varuint_boundaries() {
    let cases: [(u32, &str); 5] = [
        (0, "00"),
        (127, "7f"),
        (128, "8001"),
        (16_384, "808001"),
        (u32::MAX, "ffffffff0f"),
    ];
    for (value, hex) in cases {
        assert_eq!(serialize::to_hex(&VarUint32(value)), hex);
        assert_eq!(serialize::from_hex::<VarUint32>(hex).unwrap(), VarUint32(value));
    }
    // Decoding stops after five bytes, leaving the sixth unread
    assert!(matches!(
        serialize::from_hex::<VarUint32>("ffffffffff01"),
        Err(CoreError::TrailingBytes(1))
    ));
}

#[test]
fn test_truncated_input_reports_eof() {
    let err = serialize::from_hex::<u64>("01020304").unwrap_err();
    assert!(matches!(
        err,
        CoreError::UnexpectedEof {
            needed: 8,
            remaining: 4
        }
    ));
}
