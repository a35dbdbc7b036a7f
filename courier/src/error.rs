//! Unified error types for courier.

use std::fmt::Display;

use thiserror::Error;

/// Top-level error type shared by the registry, the transports and the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be resolved, read, parsed, or written.
    #[error("config: {0}")]
    Config(String),

    /// A transport kind cannot be installed for the requested target, or a
    /// request was rejected before anything was sent or persisted.
    #[error("validation: {0}")]
    Validation(String),

    /// The persisted sender for a network names no known transport kind.
    #[error("unsupported sender \"{kind}\" configured for {chain}.{network}")]
    UnsupportedSender {
        /// Chain the selection belongs to.
        chain: String,
        /// Network within the chain.
        network: String,
        /// Persisted kind name; empty when no sender is configured.
        kind: String,
    },

    /// Two resolved senders ended up under the same aggregated key.
    #[error("merge: sender key \"{key}\" resolved more than once")]
    Merge {
        /// The colliding `<chain>.<network>` key.
        key: String,
    },

    /// Network or ledger access failed.
    #[error("transport: {0}")]
    Transport(String),

    /// The caller cancelled the operation or its deadline passed.
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// Shorthand for [`Error::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// [`Error::Config`] carrying the display form of an underlying error.
    pub fn config_with(context: impl Display, source: impl Display) -> Self {
        Self::Config(format!("{context}: {source}"))
    }

    /// Shorthand for [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// [`Error::Transport`] carrying the display form of an underlying error.
    pub fn transport_with(context: impl Display, source: impl Display) -> Self {
        Self::Transport(format!("{context}: {source}"))
    }
}
