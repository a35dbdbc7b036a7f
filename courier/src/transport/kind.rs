use std::fmt;
use std::str::FromStr;

use super::Sender;
use crate::clients::ClientsGetter;
use crate::error::Error;

/// Sender transports courier knows how to build.
///
/// Adding a transport means adding a variant here and a branch in
/// [`TransportKind::resolve`]; nothing else in the registry changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// Direct JSON-RPC to an Ethereum node configured per network.
    EthereumRpc2,
    /// Hosted relay that forwards JSON-RPC for any protocol and network.
    Relay,
}

impl TransportKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 2] = [Self::EthereumRpc2, Self::Relay];

    /// Canonical name, as persisted in the configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EthereumRpc2 => "ethereum-rpc2",
            Self::Relay => "relay",
        }
    }

    /// Build a live sender of this kind for `network`.
    ///
    /// # Errors
    ///
    /// Propagates the client getter's error.
    pub fn resolve<G>(self, clients: &G, network: &str) -> Result<Box<dyn Sender>, Error>
    where
        G: ClientsGetter + ?Sized,
    {
        match self {
            Self::EthereumRpc2 => clients.ethereum_rpc2_client(network),
            Self::Relay => clients.relay_client(),
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A name that matches no [`TransportKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transport kind \"{0}\"")]
pub struct UnknownTransportKind(pub String);

impl FromStr for TransportKind {
    type Err = UnknownTransportKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ethereum-rpc2" | "rpc2" => Ok(Self::EthereumRpc2),
            "relay" => Ok(Self::Relay),
            other => Err(UnknownTransportKind(other.to_owned())),
        }
    }
}
