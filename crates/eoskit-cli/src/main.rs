use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod cli;
mod client;
mod commands;
mod config;

use cli::{Cli, Commands, NameCommands};
use commands::SignArgs;

fn main() -> Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { output } => {
            commands::init_config(&output)?;
        }
        Commands::Keygen { output } => {
            commands::generate_keypair(output)?;
        }
        Commands::Pubkey { key } => {
            commands::show_public_key(&key)?;
        }
        Commands::Name { command } => match command {
            NameCommands::Encode { name } => commands::encode_name(&name)?,
            NameCommands::Decode { value } => commands::decode_name(value)?,
        },
        Commands::Tapos { block_id } => {
            commands::show_tapos(&block_id)?;
        }
        Commands::Pack {
            abi,
            type_name,
            json,
        } => {
            commands::pack_value(&abi, &type_name, &json)?;
        }
        Commands::Unpack {
            abi,
            type_name,
            hex,
        } => {
            commands::unpack_value(&abi, &type_name, &hex)?;
        }
        Commands::Sign {
            tx,
            chain_id,
            block_id,
            keys,
            now,
            abis,
            config,
            out,
        } => {
            commands::sign_offline(SignArgs {
                tx,
                chain_id,
                block_id,
                keys,
                now,
                abis,
                config,
                out,
            })?;
        }
        Commands::Push {
            tx,
            keys,
            config,
            remote_pack,
        } => {
            commands::push_transaction(&tx, &keys, &config, remote_pack)?;
        }
    }

    Ok(())
}
