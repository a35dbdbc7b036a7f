//! Sender registry: persists transport selections and resolves them into
//! live handles.
//!
//! Selections live in the store under
//! `chains.<chain>.networks.<network>.sender`, with the chain and network
//! names addressed as whole segments. Writing one goes through the
//! [`ClientsSetter`] first, so an uninstallable kind never reaches the store.
//! Reading walks every chain and network and resolves each selection through
//! [`TransportKind::resolve`]; any failure aborts the whole walk, so callers
//! never see a partial map.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::clients::{ClientsGetter, ClientsSetter};
use crate::error::Error;
use crate::store::{ConfigStore, SenderSelections};
use crate::transport::{Sender, TransportKind};

/// Live senders keyed by `"<chain>.<network>"`.
pub type SenderMap = HashMap<String, Box<dyn Sender>>;

/// Aggregated map key for a chain/network pair.
#[must_use]
pub fn sender_key(chain: &str, network: &str) -> String {
    format!("{chain}.{network}")
}

/// Move every entry of `src` into `dst`.
///
/// # Errors
///
/// Returns [`Error::Merge`] on the first key already present in `dst`;
/// `dst` may then hold some of `src`'s entries and should be discarded.
pub fn merge_disjoint(dst: &mut SenderMap, src: SenderMap) -> Result<(), Error> {
    for (key, sender) in src {
        match dst.entry(key) {
            Entry::Occupied(occupied) => {
                return Err(Error::Merge {
                    key: occupied.key().clone(),
                });
            }
            Entry::Vacant(vacant) => {
                vacant.insert(sender);
            }
        }
    }
    Ok(())
}

/// Names written by `set` must keep `<chain>.<network>` keys unambiguous.
fn check_identifier(what: &str, value: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Err(Error::validation(format!("{what} must not be empty")));
    }
    if value.contains('.') || value.chars().any(char::is_whitespace) {
        return Err(Error::validation(format!(
            "{what} \"{value}\" must not contain dots or whitespace"
        )));
    }
    Ok(())
}

/// Registry over a configuration store and a set of client collaborators.
#[derive(Debug)]
pub struct SenderRegistry<S, C> {
    store: S,
    clients: C,
}

impl<S, C> SenderRegistry<S, C> {
    /// Creates a registry over `store`, building handles with `clients`.
    pub const fn new(store: S, clients: C) -> Self {
        Self { store, clients }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the registry, returning the store for persistence.
    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S: ConfigStore, C: ClientsSetter> SenderRegistry<S, C> {
    /// Select `kind` as the sender for `chain`/`network`.
    ///
    /// The kind is validated before anything is written; on failure the
    /// previous selection, if any, is left untouched. A later call for the
    /// same pair replaces the selection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for malformed identifiers, unknown kinds,
    /// or kinds the client setter refuses; [`Error::Config`] if the store
    /// cannot hold the key.
    pub fn set(&mut self, chain: &str, network: &str, kind: &str) -> Result<TransportKind, Error> {
        check_identifier("chain", chain)?;
        check_identifier("network", network)?;
        let kind: TransportKind = kind.parse().map_err(|e| {
            Error::validation(format!("cannot send on {chain}.{network}: {e}"))
        })?;

        self.clients.set_client(chain, network, kind)?;
        self.store.set_sender_kind(chain, network, kind)?;

        #[cfg(feature = "telemetry")]
        tracing::info!(chain, network, %kind, "sender selected");
        Ok(kind)
    }
}

impl<S: ConfigStore, C: ClientsGetter> SenderRegistry<S, C> {
    /// Resolve every configured selection into a live sender.
    ///
    /// # Errors
    ///
    /// Fails as a whole if any selection cannot be resolved or two pairs
    /// collide on the same key.
    pub fn senders(&self) -> Result<SenderMap, Error> {
        let mut senders = SenderMap::new();
        for chain in self.store.chains() {
            let chain_senders = self.chain_senders(&chain)?;
            merge_disjoint(&mut senders, chain_senders)?;
        }
        #[cfg(feature = "telemetry")]
        tracing::debug!(count = senders.len(), "resolved senders");
        Ok(senders)
    }

    /// Resolve the selection of every network configured under `chain`.
    fn chain_senders(&self, chain: &str) -> Result<SenderMap, Error> {
        let mut senders = SenderMap::new();
        for network in self.store.networks(chain) {
            let sender = self.sender(chain, &network)?;
            senders.insert(sender_key(chain, &network), sender);
        }
        Ok(senders)
    }

    /// Resolve the selection for a single pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedSender`] if no sender is persisted or the
    /// persisted name is not a known kind, otherwise the client getter's
    /// error.
    pub fn sender(&self, chain: &str, network: &str) -> Result<Box<dyn Sender>, Error> {
        let name = self.store.sender_kind(chain, network).unwrap_or_default();
        let kind: TransportKind = name.parse().map_err(|_| Error::UnsupportedSender {
            chain: chain.to_owned(),
            network: network.to_owned(),
            kind: name.clone(),
        })?;
        kind.resolve(&self.clients, network)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::store::TomlStore;
    use crate::transport::BoxFuture;

    #[derive(Debug)]
    struct StubSender(TransportKind);

    impl Sender for StubSender {
        fn kind(&self) -> TransportKind {
            self.0
        }

        fn send<'a>(
            &'a self,
            _cancel: &'a CancellationToken,
            _protocol: &'a str,
            _network: &'a str,
            _raw_tx: &'a [u8],
        ) -> BoxFuture<'a, Result<String, Error>> {
            Box::pin(async { Ok("0x0".to_owned()) })
        }
    }

    /// Accepts `ethereum-rpc2` only on networks listed in `rpc_networks`.
    #[derive(Default)]
    struct StubClients {
        rpc_networks: Vec<&'static str>,
        relay_calls: Cell<usize>,
    }

    impl StubClients {
        fn with_rpc(networks: &[&'static str]) -> Self {
            Self {
                rpc_networks: networks.to_vec(),
                ..Self::default()
            }
        }
    }

    impl ClientsSetter for StubClients {
        fn set_client(&self, _chain: &str, network: &str, kind: TransportKind) -> Result<(), Error> {
            match kind {
                TransportKind::EthereumRpc2 if !self.rpc_networks.contains(&network) => {
                    Err(Error::validation(format!("no rpc endpoint for {network}")))
                }
                _ => Ok(()),
            }
        }
    }

    impl ClientsGetter for StubClients {
        fn ethereum_rpc2_client(&self, network: &str) -> Result<Box<dyn Sender>, Error> {
            if self.rpc_networks.contains(&network) {
                Ok(Box::new(StubSender(TransportKind::EthereumRpc2)))
            } else {
                Err(Error::config(format!("no rpc endpoint for {network}")))
            }
        }

        fn relay_client(&self) -> Result<Box<dyn Sender>, Error> {
            self.relay_calls.set(self.relay_calls.get() + 1);
            Ok(Box::new(StubSender(TransportKind::Relay)))
        }
    }

    fn registry(toml: &str, clients: StubClients) -> SenderRegistry<TomlStore, StubClients> {
        SenderRegistry::new(toml.parse().expect("valid toml"), clients)
    }

    #[test]
    fn set_then_resolve_matches_kind() {
        let mut registry = registry("", StubClients::with_rpc(&["goerli"]));
        for (network, kind) in [("goerli", "ethereum-rpc2"), ("mainnet", "relay")] {
            let selected = registry.set("ethereum", network, kind).expect("accepted");
            let sender = registry.sender("ethereum", network).expect("resolvable");
            assert_eq!(sender.kind(), selected);
            assert_eq!(sender.kind().as_str(), kind);
        }
    }

    #[test]
    fn set_writes_the_hierarchical_key() {
        let mut registry = registry("", StubClients::default());
        registry.set("ethereum", "mainnet", "relay").expect("accepted");
        assert_eq!(
            registry
                .store()
                .string("chains.ethereum.networks.mainnet.sender")
                .as_deref(),
            Some("relay")
        );
    }

    #[test]
    fn rejected_set_leaves_previous_selection() {
        let mut registry = registry("", StubClients::default());
        registry.set("ethereum", "mainnet", "relay").expect("accepted");
        let before = registry.store().clone();

        let err = registry
            .set("ethereum", "mainnet", "ethereum-rpc2")
            .expect_err("no endpoint for mainnet");
        assert!(matches!(err, Error::Validation(_)));
        let err = registry
            .set("ethereum", "mainnet", "carrier-pigeon")
            .expect_err("unknown kind");
        assert!(matches!(err, Error::Validation(ref msg) if msg.contains("carrier-pigeon")));

        assert_eq!(registry.store(), &before);
    }

    #[test]
    fn rejected_set_on_fresh_pair_writes_nothing() {
        let mut registry = registry("", StubClients::default());
        assert!(registry.set("ethereum", "ropsten", "rpc2").is_err());
        assert!(registry.store().chains().is_empty());
    }

    #[test]
    fn set_rejects_path_breaking_identifiers() {
        let mut registry = registry("", StubClients::default());
        for (chain, network) in [("eth.ereum", "mainnet"), ("ethereum", ""), ("ethereum", "main net")] {
            let err = registry.set(chain, network, "relay").expect_err("bad identifier");
            assert!(matches!(err, Error::Validation(_)));
        }
        assert!(registry.store().chains().is_empty());
    }

    #[test]
    fn last_write_wins() {
        let mut registry = registry("", StubClients::with_rpc(&["mainnet"]));
        registry.set("ethereum", "mainnet", "relay").expect("relay");
        registry.set("ethereum", "mainnet", "rpc2").expect("rpc2");

        let senders = registry.senders().expect("resolvable");
        assert_eq!(senders.len(), 1);
        assert_eq!(
            senders["ethereum.mainnet"].kind(),
            TransportKind::EthereumRpc2
        );
    }

    #[test]
    fn composite_key_is_chain_dot_network() {
        let registry = registry(
            r#"
[chains.ethereum.networks.mainnet]
sender = "relay"
"#,
            StubClients::default(),
        );
        let senders = registry.senders().expect("resolvable");
        assert_eq!(senders.keys().collect::<Vec<_>>(), vec!["ethereum.mainnet"]);
        assert_eq!(senders["ethereum.mainnet"].kind(), TransportKind::Relay);
    }

    #[test]
    fn aggregates_every_chain_and_network() {
        let chains = ["ethereum", "substrate", "algorand"];
        let networks = ["mainnet", "testnet"];
        let mut registry = registry("", StubClients::default());
        for chain in chains {
            for network in networks {
                registry.set(chain, network, "relay").expect("relay");
            }
        }

        let senders = registry.senders().expect("resolvable");
        assert_eq!(senders.len(), chains.len() * networks.len());
        for chain in chains {
            for network in networks {
                assert!(senders.contains_key(&sender_key(chain, network)));
            }
        }
        assert_eq!(registry.clients.relay_calls.get(), 6);
    }

    #[test]
    fn one_stale_selection_fails_everything() {
        let registry = registry(
            r#"
[chains.ethereum.networks.mainnet]
sender = "relay"

[chains.substrate.networks.edgeware]
sender = "etherscan"
"#,
            StubClients::default(),
        );
        let err = registry.senders().expect_err("etherscan is not a sender");
        match err {
            Error::UnsupportedSender {
                chain,
                network,
                kind,
            } => {
                assert_eq!(chain, "substrate");
                assert_eq!(network, "edgeware");
                assert_eq!(kind, "etherscan");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn client_failures_abort_resolution() {
        let registry = registry(
            r#"
[chains.ethereum.networks.goerli]
sender = "ethereum-rpc2"
"#,
            StubClients::default(),
        );
        assert!(matches!(registry.senders(), Err(Error::Config(_))));
    }

    #[test]
    fn quoted_dotted_names_are_resolved_not_skipped() {
        let registry = registry(
            r#"
[chains.ethereum.networks.mainnet]
sender = "relay"

[chains."eth.classic".networks.mainnet]
sender = "relay"

[chains.ethereum.networks."main.net"]
sender = "relay"
"#,
            StubClients::default(),
        );
        let senders = registry.senders().expect("resolvable");
        let mut keys: Vec<_> = senders.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["eth.classic.mainnet", "ethereum.main.net", "ethereum.mainnet"]
        );
        assert_eq!(
            registry
                .sender("ethereum", "main.net")
                .expect("sender is configured")
                .kind(),
            TransportKind::Relay
        );
    }

    #[test]
    fn dotted_names_that_share_a_key_collide() {
        let registry = registry(
            r#"
[chains.eth.networks."classic.mainnet"]
sender = "relay"

[chains."eth.classic".networks.mainnet]
sender = "relay"
"#,
            StubClients::default(),
        );
        let err = registry.senders().expect_err("both pairs map to one key");
        assert!(matches!(err, Error::Merge { ref key } if key == "eth.classic.mainnet"));
    }

    #[test]
    fn missing_sender_key_is_unsupported() {
        let registry = registry(
            r"
[chains.ethereum.networks.mainnet]
",
            StubClients::default(),
        );
        let err = registry
            .sender("ethereum", "mainnet")
            .expect_err("nothing configured");
        assert!(matches!(err, Error::UnsupportedSender { ref kind, .. } if kind.is_empty()));
        assert!(registry.senders().is_err());
    }

    #[test]
    fn empty_store_resolves_to_empty_map() {
        let registry = registry("", StubClients::default());
        assert!(registry.senders().expect("nothing to resolve").is_empty());
    }

    #[test]
    fn merge_detects_collisions() {
        let mut dst = SenderMap::new();
        dst.insert(
            "a.b.c".to_owned(),
            Box::new(StubSender(TransportKind::Relay)),
        );
        let mut src = SenderMap::new();
        src.insert(
            "a.b.c".to_owned(),
            Box::new(StubSender(TransportKind::EthereumRpc2)),
        );

        let err = merge_disjoint(&mut dst, src).expect_err("duplicate key");
        assert!(matches!(err, Error::Merge { ref key } if key == "a.b.c"));
        assert_eq!(dst["a.b.c"].kind(), TransportKind::Relay);
    }
}
