//! End-to-end assembly and signing tests

use eoskit_core::crypto::is_canonical;
use eoskit_core::{
    sha256, sign_digest, Abi, AbiRegistry, ActionData, Checksum256, ChainContext, DraftAction,
    Name, PermissionLevel, PrivateKey, Signature, TimePointSec, Transaction, TransactionConfig,
};
use serde_json::json;

const DEV_PRIVATE_KEY: &str = "5KQwrPbwdL6PhXujxW37FSSQZ1JiwsST4cqQzDeyXtP79zkvFD3";
const CHAIN_ID: &str = "aca376f206b8fc25a6ed44dbdc66547c36c6c33e3a119ffbeaef943642f0e906";
const REF_BLOCK_ID: &str = "0000a4a3c0fc5c0c3e8f5e2ab0a2a6e0d07a0b16c2d5d3a1b0e4f6a7c8d9e0f1";

const EXPECTED_PACKED_TRX: &str = "9837115ba3a43e8f5e2a000000000200a6823403ea3055000000572d3ccdcd\
010000000000855c3400000000a8ed3232230000000000855c340000000000000e3d10270000000000\
0004454f530000000002686900000000001aa36a000000000000806b010000000000000e3d00000000\
a8ed3232080000000000000e3d00";
const EXPECTED_ID: &str = "85642e87b8a797fdfff50eae9c9fb57c6430cb1804f238cf602e58a339c5dd8d";
const EXPECTED_DIGEST: &str = "654165f06013d3b9d34924e3ece130f0b089f2877d911c9bba8157311c5bb09c";
const EXPECTED_SIGNATURE: &str = "SIG_K1_HGU84aGtnCoa162Sf6WytZjd6MxBDTL8y8Lgr58kJmhbARyYaZXtDgWDZMMFUCq9kM6PEDgadkMTkFkoHgCDwzPiCsF6qi";

fn name(s: &str) -> Name {
    Name::new(s).unwrap()
}

fn context() -> ChainContext {
    ChainContext {
        chain_id: Checksum256::from_hex(CHAIN_ID).unwrap(),
        ref_block_id: Checksum256::from_hex(REF_BLOCK_ID).unwrap(),
    }
}

fn token_registry() -> AbiRegistry {
    let abi = Abi::new(
        serde_json::from_value(json!({
            "version": "eosio::abi/1.1",
            "types": [{"new_type_name": "account_name_t", "type": "name"}],
            "structs": [{
                "name": "transfer",
                "base": "",
                "fields": [
                    {"name": "from", "type": "account_name_t"},
                    {"name": "to", "type": "account_name_t"},
                    {"name": "quantity", "type": "asset"},
                    {"name": "memo", "type": "string"}
                ]
            }],
            "actions": [{"name": "transfer", "type": "transfer", "ricardian_contract": ""}]
        }))
        .unwrap(),
    )
    .unwrap();
    let mut registry = AbiRegistry::new();
    registry.insert(name("eosio.token"), abi);
    registry
}

/// Two actions: one packed through the ABI, one with literal bytes
fn two_action_draft() -> Transaction {
    Transaction::new(TransactionConfig::default())
        .with_action(DraftAction::new(
            name("eosio.token"),
            name("transfer"),
            vec![PermissionLevel::new(name("alice"), name("active"))],
            ActionData::Json(json!({
                "from": "alice",
                "to": "bob",
                "quantity": "1.0000 EOS",
                "memo": "hi"
            })),
        ))
        .with_action(DraftAction::new(
            name("hello"),
            name("hi"),
            vec![PermissionLevel::new(name("bob"), name("active"))],
            ActionData::Packed(name("bob").as_u64().to_le_bytes().to_vec().into()),
        ))
}

#[test]
fn test_end_to_end_signature_fixture() {
    let key: PrivateKey = DEV_PRIVATE_KEY.parse().unwrap();
    let linked = two_action_draft()
        .link(
            &context(),
            &token_registry(),
            "2018-06-01T12:00:00".parse::<TimePointSec>().unwrap(),
        )
        .unwrap();

    assert_eq!(hex::encode(linked.packed_trx()), EXPECTED_PACKED_TRX);
    assert_eq!(linked.id().to_hex(), EXPECTED_ID);
    assert_eq!(linked.digest().to_hex(), EXPECTED_DIGEST);
    assert_eq!(
        linked.transaction().header.expiration.to_string(),
        "2018-06-01T12:10:00"
    );

    let signed = linked.sign(&key).unwrap();
    assert_eq!(signed.signatures()[0].to_string(), EXPECTED_SIGNATURE);

    let body = serde_json::to_value(signed.to_packed()).unwrap();
    assert_eq!(body["signatures"][0], EXPECTED_SIGNATURE);
    assert_eq!(body["packed_trx"], EXPECTED_PACKED_TRX);
    assert_eq!(body["compression"], false);
}

#[test]
fn test_fixture_signature_recovers_dev_key() {
    let sig: Signature = EXPECTED_SIGNATURE.parse().unwrap();
    let digest = Checksum256::from_hex(EXPECTED_DIGEST).unwrap();
    let key: PrivateKey = DEV_PRIVATE_KEY.parse().unwrap();
    assert!(is_canonical(&sig));
    assert_eq!(sig.recovery_byte(), 28);
    key.public_key().verify(&digest, &sig).unwrap();
    assert!(key
        .public_key()
        .verify(&sha256(b"different"), &sig)
        .is_err());
}

#[test]
fn test_retry_loop_fixture() {
    // The first four nonces for this digest give a high r
    let key: PrivateKey = DEV_PRIVATE_KEY.parse().unwrap();
    let sig = sign_digest(&key, &sha256(b"retry-1")).unwrap();
    assert_eq!(
        sig.to_string(),
        "SIG_K1_HFVCUeAMm8wLdscSsXohECXzF4RJU442KAZRJA2SdThkSzRu53CxLmzhQxUqjvUDhpUmAEmUQamW1M8T8py3RWVoYc7grH"
    );
    assert!(is_canonical(&sig));
}

#[test]
fn test_concurrent_signing_matches_sequential() {
    let keys: Vec<PrivateKey> = (0..8).map(|_| PrivateKey::generate()).collect();
    let digests: Vec<Checksum256> = (0..8u8).map(|i| sha256(&[i; 40])).collect();

    let sequential: Vec<Signature> = keys
        .iter()
        .zip(&digests)
        .map(|(k, d)| sign_digest(k, d).unwrap())
        .collect();

    let concurrent: Vec<Signature> = std::thread::scope(|s| {
        let handles: Vec<_> = keys
            .iter()
            .zip(&digests)
            .map(|(k, d)| s.spawn(move || sign_digest(k, d).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, concurrent);
}

#[test]
fn test_every_signature_is_canonical() {
    let key: PrivateKey = DEV_PRIVATE_KEY.parse().unwrap();
    for i in 0..64u32 {
        let digest = sha256(format!("message {i}").as_bytes());
        let sig = sign_digest(&key, &digest).unwrap();
        assert!(is_canonical(&sig), "digest {i} produced a high signature");
        assert_eq!(sig.recover(&digest).unwrap(), key.public_key());
    }
}

#[test]
fn test_multisig_over_shared_digest() {
    let alice: PrivateKey = DEV_PRIVATE_KEY.parse().unwrap();
    let bob = PrivateKey::generate();
    let linked = two_action_draft()
        .link(&context(), &token_registry(), TimePointSec::from_secs(1_527_854_400))
        .unwrap();
    let digest = *linked.digest();

    let signed = linked.sign(&alice).unwrap().sign(&bob).unwrap();
    assert_eq!(signed.signatures()[0].to_string(), EXPECTED_SIGNATURE);
    assert_eq!(signed.signatures()[1], sign_digest(&bob, &digest).unwrap());
}
