//! Transport capabilities for sending and receiving messages.
//!
//! - [`TransportKind`]: closed set of sender transports, with the table that
//!   turns a kind into a live handle.
//! - [`Sender`] / [`Receiver`]: object-safe capability contracts.
//! - [`EthereumRpc2Client`] / [`RelayClient`]: the bundled senders.

mod jsonrpc;
mod kind;
mod relay;
mod rpc;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

pub use self::kind::{TransportKind, UnknownTransportKind};
pub use self::relay::RelayClient;
pub use self::rpc::EthereumRpc2Client;
use crate::error::Error;

/// Boxed, sendable future returned by capability methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Outbound transport bound to a network (or to every network, for relays).
pub trait Sender: Send + Sync + fmt::Debug {
    /// Transport implementing this handle.
    fn kind(&self) -> TransportKind;

    /// Submit an already signed, encoded transaction carrying a message.
    ///
    /// Resolves to the transaction hash reported by the remote node.
    fn send<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        protocol: &'a str,
        network: &'a str,
        raw_tx: &'a [u8],
    ) -> BoxFuture<'a, Result<String, Error>>;
}

/// Inbound transaction observed for an address.
///
/// Byte fields serialise as lowercase hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction hash.
    #[serde(with = "hex::serde")]
    pub hash: Vec<u8>,
    /// Block the transaction was included in.
    pub block_number: u64,
    /// Sending address.
    #[serde(with = "hex::serde")]
    pub from: Vec<u8>,
    /// Receiving address, the one the transactions were looked up for.
    #[serde(with = "hex::serde")]
    pub to: Vec<u8>,
    /// Encrypted envelope carried in the transaction data.
    #[serde(with = "hex::serde")]
    pub data: Vec<u8>,
}

/// Retrieves the inbound transactions visible for an address.
///
/// Results for a fixed address never shrink as the ledger advances, and the
/// order is whatever the transport returns. Implementations must give up
/// with [`Error::Cancelled`] once `cancel` fires; see [`with_cancellation`].
pub trait Receiver: Send + Sync {
    /// Name of the transport serving the transactions.
    fn kind(&self) -> &str;

    /// Every transaction sent to `address` on `protocol`/`network`.
    fn receive<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        protocol: &'a str,
        network: &'a str,
        address: &'a [u8],
    ) -> BoxFuture<'a, Result<Vec<Transaction>, Error>>;
}

/// Drive `work` to completion unless `cancel` fires first.
///
/// An already cancelled token wins over a ready result.
///
/// # Errors
///
/// Returns [`Error::Cancelled`] on cancellation, otherwise the error of `work`.
pub async fn with_cancellation<T, F>(cancel: &CancellationToken, work: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(Error::Cancelled),
        result = work => result,
    }
}
