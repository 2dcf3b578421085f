use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// eoskit - EOSIO/Antelope transaction toolkit
#[derive(Parser)]
#[command(name = "eoskit")]
#[command(about = "Pack, sign and push EOSIO transactions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new client configuration
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "eoskit.json")]
        output: PathBuf,
    },

    /// Generate a new K1 keypair
    Keygen {
        /// Output file for the WIF private key
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Derive the public key of a private key
    Pubkey {
        /// Private key (WIF or PVT_K1_)
        #[arg(long)]
        key: String,
    },

    /// Name conversions
    Name {
        #[command(subcommand)]
        command: NameCommands,
    },

    /// Print the TAPOS fields derived from a block id
    Tapos {
        /// Block id hex
        #[arg(long)]
        block_id: String,
    },

    /// Pack a JSON value with an ABI
    Pack {
        /// ABI JSON file
        #[arg(long)]
        abi: PathBuf,
        /// Type name
        #[arg(long = "type")]
        type_name: String,
        /// JSON value
        #[arg(long)]
        json: String,
    },

    /// Unpack hex data with an ABI
    Unpack {
        /// ABI JSON file
        #[arg(long)]
        abi: PathBuf,
        /// Type name
        #[arg(long = "type")]
        type_name: String,
        /// Packed data hex
        #[arg(long)]
        hex: String,
    },

    /// Link and sign a transaction offline
    Sign {
        /// Transaction JSON file
        #[arg(long)]
        tx: PathBuf,
        /// Chain id hex
        #[arg(long)]
        chain_id: String,
        /// Reference block id hex
        #[arg(long)]
        block_id: String,
        /// Signing keys (repeatable)
        #[arg(long = "key", required = true)]
        keys: Vec<String>,
        /// Link time (YYYY-MM-DDTHH:MM:SS, defaults to now)
        #[arg(long)]
        now: Option<String>,
        /// ABI for an account, as account=file (repeatable)
        #[arg(long = "abi")]
        abis: Vec<String>,
        /// Path to configuration file
        #[arg(short, long, default_value = "eoskit.json")]
        config: PathBuf,
        /// Output file for the push body (JSON)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Link against a node, sign and submit a transaction
    Push {
        /// Transaction JSON file
        #[arg(long)]
        tx: PathBuf,
        /// Signing keys (repeatable)
        #[arg(long = "key", required = true)]
        keys: Vec<String>,
        /// Path to configuration file
        #[arg(short, long, default_value = "eoskit.json")]
        config: PathBuf,
        /// Let the node pack action arguments
        #[arg(long, default_value = "false")]
        remote_pack: bool,
    },
}

#[derive(Subcommand)]
pub enum NameCommands {
    /// Print the u64 value of a name
    Encode {
        name: String,
    },

    /// Print the text form of a u64 value
    Decode {
        value: u64,
    },
}
