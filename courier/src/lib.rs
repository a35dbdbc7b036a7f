//! Message transport registry.
//!
//! Maps a `(chain, network)` pair to the transport that sends messages on
//! it, keeps those selections in a hierarchical configuration store, and
//! resolves them into live handles on demand.
//!
//! - [`registry`]: [`SenderRegistry`](registry::SenderRegistry): validate,
//!   persist, resolve, aggregate.
//! - [`transport`]: [`Sender`](transport::Sender) and
//!   [`Receiver`](transport::Receiver) capabilities plus bundled senders.
//! - [`clients`]: collaborators that validate and build transport handles.
//! - [`store`] / [`config`]: path-addressed TOML store and typed client
//!   settings.
//! - [`crypto`]: key capability consumed from the signing layer.

pub mod clients;
pub mod config;
pub mod crypto;
pub mod error;
pub mod registry;
pub mod signal;
pub mod store;
#[cfg(feature = "telemetry")]
pub mod telemetry;
pub mod transport;

pub use error::Error;
pub use registry::{SenderMap, SenderRegistry};
pub use transport::{Receiver, Sender, Transaction, TransportKind};
