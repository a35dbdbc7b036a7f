use tokio_util::sync::CancellationToken;
use url::Url;

use super::{BoxFuture, Sender, TransportKind, jsonrpc, with_cancellation};
use crate::error::Error;

/// Sends through an Ethereum node's JSON-RPC endpoint.
///
/// Each handle is bound to the single network its endpoint serves.
#[derive(Debug, Clone)]
pub struct EthereumRpc2Client {
    http: reqwest::Client,
    network: String,
    endpoint: Url,
}

impl EthereumRpc2Client {
    /// Creates a client for `network` talking to `endpoint`.
    #[must_use]
    pub fn new(http: reqwest::Client, network: impl Into<String>, endpoint: Url) -> Self {
        Self {
            http,
            network: network.into(),
            endpoint,
        }
    }

    /// Network this client is bound to.
    #[must_use]
    pub fn network(&self) -> &str {
        &self.network
    }
}

impl Sender for EthereumRpc2Client {
    fn kind(&self) -> TransportKind {
        TransportKind::EthereumRpc2
    }

    fn send<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        protocol: &'a str,
        network: &'a str,
        raw_tx: &'a [u8],
    ) -> BoxFuture<'a, Result<String, Error>> {
        Box::pin(async move {
            if protocol != "ethereum" || network != self.network {
                return Err(Error::validation(format!(
                    "{} client for ethereum.{} cannot send on {protocol}.{network}",
                    self.kind(),
                    self.network
                )));
            }
            #[cfg(feature = "telemetry")]
            tracing::debug!(network, endpoint = %self.endpoint, "sending raw transaction");
            with_cancellation(
                cancel,
                jsonrpc::send_raw_transaction(&self.http, &self.endpoint, raw_tx),
            )
            .await
        })
    }
}
