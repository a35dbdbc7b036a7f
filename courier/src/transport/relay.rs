use tokio_util::sync::CancellationToken;
use url::Url;

use super::{BoxFuture, Sender, TransportKind, jsonrpc, with_cancellation};
use crate::error::Error;

/// Sends through the hosted relay, which proxies JSON-RPC to public nodes.
///
/// The relay serves every protocol and network from one base URL, routing on
/// `/json-rpc/<protocol>/<network>`.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RelayClient {
    /// Creates a relay client rooted at `base_url`.
    #[must_use]
    pub const fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Relay endpoint serving `protocol`/`network`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the base URL cannot carry a path.
    pub fn endpoint(&self, protocol: &str, network: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::config(format!("relay base url '{}' cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(["json-rpc", protocol, network]);
        Ok(url)
    }
}

impl Sender for RelayClient {
    fn kind(&self) -> TransportKind {
        TransportKind::Relay
    }

    fn send<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        protocol: &'a str,
        network: &'a str,
        raw_tx: &'a [u8],
    ) -> BoxFuture<'a, Result<String, Error>> {
        Box::pin(async move {
            let endpoint = self.endpoint(protocol, network)?;
            #[cfg(feature = "telemetry")]
            tracing::debug!(%endpoint, "relaying raw transaction");
            with_cancellation(
                cancel,
                jsonrpc::send_raw_transaction(&self.http, &endpoint, raw_tx),
            )
            .await
        })
    }
}
