//! Client collaborators used by the sender registry.
//!
//! [`ClientsSetter`] decides whether a transport can be installed on a
//! network before the selection is persisted; [`ClientsGetter`] builds live
//! handles at resolution time. [`Clients`] implements both from a
//! [`ClientsConfig`].

use crate::config::ClientsConfig;
use crate::error::Error;
use crate::transport::{EthereumRpc2Client, RelayClient, Sender, TransportKind};

/// Validates transport installability.
pub trait ClientsSetter {
    /// Check that `kind` can serve `chain`/`network`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when it cannot.
    fn set_client(&self, chain: &str, network: &str, kind: TransportKind) -> Result<(), Error>;
}

/// Instantiates live sender handles.
pub trait ClientsGetter {
    /// JSON-RPC client bound to `network`.
    ///
    /// # Errors
    ///
    /// Returns an error if no usable endpoint is configured for `network`.
    fn ethereum_rpc2_client(&self, network: &str) -> Result<Box<dyn Sender>, Error>;

    /// Relay client; the same relay serves every network.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay URL is unusable.
    fn relay_client(&self) -> Result<Box<dyn Sender>, Error>;
}

/// Protocol family whose addressing `ethereum-rpc2` understands.
const ETHEREUM: &str = "ethereum";

/// Configured clients sharing one HTTP connection pool.
#[derive(Debug, Clone)]
pub struct Clients {
    config: ClientsConfig,
    http: reqwest::Client,
}

impl Clients {
    /// Creates the client set described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientsConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config_with("failed to create HTTP client", e))?;
        Ok(Self { config, http })
    }
}

impl ClientsSetter for Clients {
    fn set_client(&self, chain: &str, network: &str, kind: TransportKind) -> Result<(), Error> {
        let installable = match kind {
            TransportKind::Relay => self.config.relay_url().map(drop),
            TransportKind::EthereumRpc2 if chain != ETHEREUM => Err(Error::validation(format!(
                "\"{kind}\" only serves {ETHEREUM} networks, not {chain}.{network}"
            ))),
            TransportKind::EthereumRpc2 => {
                self.config.rpc_address(network).and_then(|address| {
                    address.map(drop).ok_or_else(|| {
                        Error::validation(format!(
                            "\"{kind}\" needs [clients.{kind}.networks.{network}] address to be configured"
                        ))
                    })
                })
            }
        };
        installable.map_err(|e| match e {
            Error::Config(msg) => Error::validation(format!("\"{kind}\" on {chain}.{network}: {msg}")),
            other => other,
        })
    }
}

impl ClientsGetter for Clients {
    fn ethereum_rpc2_client(&self, network: &str) -> Result<Box<dyn Sender>, Error> {
        let endpoint = self.config.rpc_address(network)?.ok_or_else(|| {
            Error::config(format!(
                "no {} address configured for network {network}",
                TransportKind::EthereumRpc2
            ))
        })?;
        Ok(Box::new(EthereumRpc2Client::new(
            self.http.clone(),
            network,
            endpoint,
        )))
    }

    fn relay_client(&self) -> Result<Box<dyn Sender>, Error> {
        let base_url = self.config.relay_url()?;
        Ok(Box::new(RelayClient::new(self.http.clone(), base_url)))
    }
}
