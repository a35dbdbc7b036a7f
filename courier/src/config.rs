//! Client settings and default template generation.
//!
//! This module provides:
//!
//! - [`ClientsConfig`]: typed view of the `[clients]` section, describing
//!   where each transport connects.
//! - [`resolve_env`]: `$VAR` / `${VAR}` expansion for configured values.
//! - [`generate_default_config`]: produces a commented TOML template.
//!
//! # Configuration File Format
//!
//! ```toml
//! [clients.relay]
//! base_url = "https://relay.mailchain.xyz"
//!
//! [clients.ethereum-rpc2.networks.goerli]
//! address = "$GOERLI_RPC_URL"
//!
//! [chains.ethereum.networks.mainnet]
//! sender = "relay"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;
use crate::store::TomlStore;

/// Relay used when `[clients.relay]` does not name one.
pub const DEFAULT_RELAY_URL: &str = "https://relay.mailchain.xyz";

/// Resolve an environment-variable reference (`$VAR` or `${VAR}`), returning
/// the literal string unchanged if it does not match either pattern.
///
/// # Errors
///
/// Returns an error if the referenced variable is not set.
pub fn resolve_env(value: &str) -> Result<String, Error> {
    let name = value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
        .or_else(|| {
            value
                .strip_prefix('$')
                .filter(|name| !name.is_empty())
                .filter(|name| name.chars().all(|c| c.is_alphanumeric() || c == '_'))
        });

    match name {
        Some(name) => std::env::var(name).map_err(|_| {
            Error::config(format!("env var '{name}' not found (referenced as '{value}')"))
        }),
        None => Ok(value.to_owned()),
    }
}

/// The `[clients]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientsConfig {
    /// Relay settings.
    #[serde(default)]
    pub relay: RelayConfig,
    /// Per-network Ethereum JSON-RPC endpoints.
    #[serde(default, rename = "ethereum-rpc2")]
    pub ethereum_rpc2: EthereumRpc2Config,
}

/// `[clients.relay]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Root URL of the relay; may reference an environment variable.
    #[serde(default = "default_relay_url")]
    pub base_url: String,
}

fn default_relay_url() -> String {
    DEFAULT_RELAY_URL.to_owned()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: default_relay_url(),
        }
    }
}

/// `[clients.ethereum-rpc2]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EthereumRpc2Config {
    /// Endpoint per network name.
    #[serde(default)]
    pub networks: BTreeMap<String, RpcEndpoint>,
}

/// A single JSON-RPC endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcEndpoint {
    /// HTTP(S) URL of the node; may reference an environment variable.
    pub address: String,
}

impl ClientsConfig {
    /// Read the `[clients]` section of `store`, defaulting when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the section is malformed.
    pub fn from_store(store: &TomlStore) -> Result<Self, Error> {
        Ok(store.section("clients")?.unwrap_or_default())
    }

    /// Resolved relay root URL.
    ///
    /// # Errors
    ///
    /// Returns an error if an env reference is unset or the URL is invalid.
    pub fn relay_url(&self) -> Result<Url, Error> {
        let raw = resolve_env(&self.relay.base_url)?;
        Url::parse(&raw).map_err(|e| Error::config_with(format!("relay base_url '{raw}'"), e))
    }

    /// Resolved JSON-RPC endpoint for `network`, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if an env reference is unset or the URL is invalid.
    pub fn rpc_address(&self, network: &str) -> Result<Option<Url>, Error> {
        let Some(endpoint) = self.ethereum_rpc2.networks.get(network) else {
            return Ok(None);
        };
        let raw = resolve_env(&endpoint.address)?;
        Url::parse(&raw)
            .map(Some)
            .map_err(|e| Error::config_with(format!("ethereum-rpc2 address for {network}"), e))
    }
}

/// Generate a default TOML configuration template.
#[must_use]
pub fn generate_default_config() -> String {
    format!(
        r#"# courier configuration

# ── Clients ─────────────────────────────────────────────────────────
# Values support environment variable references: "$VAR" or "${{VAR}}"

[clients.relay]
base_url = "{DEFAULT_RELAY_URL}"

# Ethereum JSON-RPC endpoints, one table per network.
# [clients.ethereum-rpc2.networks.goerli]
# address = "$GOERLI_RPC_URL"

# ── Senders ─────────────────────────────────────────────────────────
# Transport used for each chain/network: "relay" or "ethereum-rpc2".
# Manage with `courier sender set <chain> <network> <kind>`.

[chains.ethereum.networks.mainnet]
sender = "relay"

[chains.ethereum.networks.goerli]
sender = "relay"
"#
    )
}
