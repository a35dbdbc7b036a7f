//! CLI definitions and command implementations for courier.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use courier::clients::Clients;
use courier::config::ClientsConfig;
use courier::error::Error;
use courier::registry::SenderRegistry;
use courier::store::TomlStore;

pub mod init;
pub mod send;
pub mod sender;

/// courier: pick and use message transports per chain and network.
#[derive(Debug, Parser)]
#[command(name = "courier")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log filter applied when `RUST_LOG` is not set.
    #[arg(long, global = true, env = "COURIER_LOG", default_value = "warn")]
    pub log_level: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a default TOML configuration file.
    Init {
        /// Output path for the configuration file.
        #[arg(short, long, default_value = "courier.toml")]
        output: PathBuf,

        /// Overwrite the file if it already exists.
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Manage the transport used to send messages.
    Sender {
        /// Sender operation.
        #[command(subcommand)]
        command: SenderCommand,
    },

    /// Submit a signed raw transaction through the configured sender.
    Send {
        /// Chain (protocol family) to send on, e.g. `ethereum`.
        chain: String,

        /// Network within the chain, e.g. `mainnet`.
        network: String,

        /// Signed transaction, hex encoded (optionally `0x`-prefixed).
        raw_tx: String,

        /// Give up after this many seconds.
        #[arg(long)]
        timeout: Option<u64>,

        /// Path to the TOML configuration file.
        #[arg(short, long, env = "CONFIG", default_value = "courier.toml")]
        config: PathBuf,
    },
}

/// `courier sender` operations.
#[derive(Debug, Subcommand)]
pub enum SenderCommand {
    /// Select the transport used for sending on a network.
    Set {
        /// Chain (protocol family), e.g. `ethereum`.
        chain: String,

        /// Network within the chain, e.g. `mainnet`.
        network: String,

        /// Transport kind: `relay` or `ethereum-rpc2`.
        kind: String,

        /// Path to the TOML configuration file.
        #[arg(short, long, env = "CONFIG", default_value = "courier.toml")]
        config: PathBuf,
    },

    /// Show the resolved sender of every configured network.
    List {
        /// Path to the TOML configuration file.
        #[arg(short, long, env = "CONFIG", default_value = "courier.toml")]
        config: PathBuf,
    },
}

/// Build a registry over the configuration at `path`.
///
/// A missing file is an error unless `create` is set, in which case the
/// registry starts from an empty store.
fn open_registry(path: &Path, create: bool) -> Result<SenderRegistry<TomlStore, Clients>, Error> {
    let store = if create {
        TomlStore::load_or_default(path)?
    } else {
        TomlStore::load(path)?
    };
    let clients = Clients::new(ClientsConfig::from_store(&store)?)?;
    Ok(SenderRegistry::new(store, clients))
}
