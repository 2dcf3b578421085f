use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use eoskit_core::{
    Abi, AbiRegistry, ActionData, ChainContext, Checksum256, DraftAction, LinkedTransaction, Name,
    PrivateKey, SignedTransaction, TaposRef, TimePointSec, Transaction, TransactionConfig,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::NodeClient;
use crate::config::{generate_sample_config, ClientConfig};

/// Transaction file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxFile {
    pub actions: Vec<DraftAction>,
}

impl TxFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading transaction file {}", path.display()))?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn into_draft(self, config: TransactionConfig) -> Transaction {
        self.actions
            .into_iter()
            .fold(Transaction::new(config), Transaction::with_action)
    }

    /// Accounts whose action data still needs an ABI
    pub fn accounts_to_pack(&self) -> HashSet<Name> {
        self.actions
            .iter()
            .filter(|a| matches!(a.data, ActionData::Json(_)))
            .map(|a| a.account)
            .collect()
    }
}

/// Write a sample configuration file
pub fn init_config(output: &Path) -> Result<()> {
    info!("Generating sample configuration");

    let config = generate_sample_config();
    config.save(output)?;

    info!("Configuration saved to {:?}", output);
    println!("\nConfiguration file created: {}", output.display());
    println!("Edit the endpoint to point at your node.");

    Ok(())
}

/// Generate a new keypair
pub fn generate_keypair(output: Option<PathBuf>) -> Result<()> {
    let key = PrivateKey::generate();

    println!("Generated new keypair:");
    println!("  Public key:  {}", key.public_key());
    println!("  Private key: {}", key.to_wif());

    if let Some(path) = output {
        std::fs::write(&path, key.to_wif())?;
        info!("Private key saved to {:?}", path);
    }

    println!("\nWARNING: Keep your private key safe! Do not share it with anyone.");

    Ok(())
}

pub fn show_public_key(key: &str) -> Result<()> {
    let key = parse_key(key)?;
    let public = key.public_key();
    println!("{}", public);
    println!("{}", public.to_modern_string());
    Ok(())
}

pub fn encode_name(name: &str) -> Result<()> {
    let name = Name::new(name)?;
    println!("{}", name.as_u64());
    Ok(())
}

pub fn decode_name(value: u64) -> Result<()> {
    println!("{}", Name::from_u64(value));
    Ok(())
}

pub fn show_tapos(block_id: &str) -> Result<()> {
    let tapos = TaposRef::from_block_id(&parse_checksum(block_id)?);
    println!("{}", serde_json::to_string_pretty(&tapos)?);
    Ok(())
}

pub fn pack_value(abi: &Path, type_name: &str, json: &str) -> Result<()> {
    let abi = load_abi(abi)?;
    let value: serde_json::Value = serde_json::from_str(json)?;
    println!("{}", hex::encode(abi.pack(type_name, &value)?));
    Ok(())
}

pub fn unpack_value(abi: &Path, type_name: &str, data: &str) -> Result<()> {
    let abi = load_abi(abi)?;
    let value = abi.unpack(type_name, &hex::decode(data.trim())?)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub struct SignArgs {
    pub tx: PathBuf,
    pub chain_id: String,
    pub block_id: String,
    pub keys: Vec<String>,
    pub now: Option<String>,
    pub abis: Vec<String>,
    pub config: PathBuf,
    pub out: Option<PathBuf>,
}

/// Link and sign without touching the network
pub fn sign_offline(args: SignArgs) -> Result<()> {
    let config = ClientConfig::load_or_default(&args.config)?;
    let keys = parse_keys(&args.keys)?;
    let context = ChainContext {
        chain_id: parse_checksum(&args.chain_id)?,
        ref_block_id: parse_checksum(&args.block_id)?,
    };
    let now = match args.now.as_deref() {
        Some(text) => text.parse::<TimePointSec>()?,
        None => TimePointSec::now()?,
    };

    let mut registry = AbiRegistry::new();
    for entry in &args.abis {
        let (account, path) = parse_abi_arg(entry)?;
        registry.insert(account, load_abi(&path)?);
    }

    let draft = TxFile::load(&args.tx)?.into_draft(config.transaction);
    let linked = draft.link(&context, &registry, now)?;
    let signed = sign_all(linked, &keys)?;

    let body = serde_json::to_string_pretty(&signed.to_packed())?;
    match args.out {
        Some(path) => {
            std::fs::write(&path, &body)?;
            info!("Push body saved to {:?}", path);
        }
        None => println!("{}", body),
    }
    println!("Transaction id: {}", signed.id());

    Ok(())
}

/// Link against a live node, sign and submit
pub fn push_transaction(
    tx: &Path,
    keys: &[String],
    config_path: &Path,
    remote_pack: bool,
) -> Result<()> {
    let config = ClientConfig::load_or_default(config_path)?;
    let keys = parse_keys(keys)?;
    let client = NodeClient::new(&config.endpoint, Duration::from_secs(config.timeout_secs))?;
    info!("Using node {}", client.endpoint());

    let file = TxFile::load(tx)?;
    let accounts = file.accounts_to_pack();
    let draft = file.into_draft(config.transaction);

    let linked = if remote_pack {
        draft.link_with(&client, &client)?
    } else {
        let mut registry = AbiRegistry::new();
        for account in accounts {
            registry.insert(account, client.get_abi(account)?);
        }
        draft.link_with(&client, &registry)?
    };

    let sent = sign_all(linked, &keys)?.send(&client)?;
    println!("Transaction {} submitted:", sent.id());
    println!("{}", serde_json::to_string_pretty(sent.response())?);

    Ok(())
}

fn sign_all(linked: LinkedTransaction, keys: &[PrivateKey]) -> Result<SignedTransaction> {
    let (first, rest) = keys
        .split_first()
        .ok_or_else(|| anyhow!("At least one signing key is required"))?;
    let mut signed = linked.sign(first)?;
    for key in rest {
        signed = signed.sign(key)?;
    }
    Ok(signed)
}

fn load_abi(path: &Path) -> Result<Abi> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading ABI file {}", path.display()))?;
    Ok(Abi::from_json(&content)?)
}

fn parse_key(text: &str) -> Result<PrivateKey> {
    text.trim().parse().map_err(|e| anyhow!("{}", e))
}

fn parse_keys(texts: &[String]) -> Result<Vec<PrivateKey>> {
    texts.iter().map(|t| parse_key(t)).collect()
}

fn parse_checksum(hex_str: &str) -> Result<Checksum256> {
    Checksum256::from_hex(hex_str.trim()).map_err(|e| anyhow!(e))
}

fn parse_abi_arg(input: &str) -> Result<(Name, PathBuf)> {
    let Some((account, path)) = input.split_once('=') else {
        bail!("Expected account=file, got '{}'", input);
    };
    Ok((Name::new(account.trim())?, PathBuf::from(path.trim())))
}
