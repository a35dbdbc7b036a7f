//! Key capability consumed from the signing layer.

use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::transport::Sender;

/// Public key of a message author, with the ledger balance behind it.
///
/// Courier never implements this; signing backends do.
pub trait Balance {
    /// Human-readable balance of the address derived from the key.
    fn balance(&self) -> String;
    /// Unit `balance` is expressed in.
    fn unit(&self) -> String;
    /// Raw bytes of the public key.
    ///
    /// Used for encrypting, verifying a signature, and locating an address.
    fn bytes(&self) -> Vec<u8>;
    /// Key type, e.g. `secp256k1`.
    fn kind(&self) -> &str;
    /// Whether `signature` is a valid signature of `message` by this key.
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool;
}

/// Check that `signature` over `message` was produced by `key`.
///
/// # Errors
///
/// Returns [`Error::Validation`] naming the key kind when verification fails.
pub fn authenticate<K>(key: &K, message: &[u8], signature: &[u8]) -> Result<(), Error>
where
    K: Balance + ?Sized,
{
    if key.verify(message, signature) {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "{} signature does not match key 0x{}",
            key.kind(),
            hex::encode(key.bytes())
        )))
    }
}

/// Submit `raw_tx` through `sender` once `signature` proves `key` signed it.
///
/// Nothing reaches the transport when verification fails.
///
/// # Errors
///
/// Returns [`Error::Validation`] for a bad signature, otherwise the error of
/// [`Sender::send`].
pub async fn send_authenticated<K>(
    sender: &dyn Sender,
    key: &K,
    signature: &[u8],
    cancel: &CancellationToken,
    protocol: &str,
    network: &str,
    raw_tx: &[u8],
) -> Result<String, Error>
where
    K: Balance + Sync + ?Sized,
{
    authenticate(key, raw_tx, signature)?;
    sender.send(cancel, protocol, network, raw_tx).await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::transport::{BoxFuture, TransportKind};

    #[derive(Debug, Default)]
    struct CountingSender {
        sent: AtomicUsize,
    }

    impl Sender for CountingSender {
        fn kind(&self) -> TransportKind {
            TransportKind::Relay
        }

        fn send<'a>(
            &'a self,
            _cancel: &'a CancellationToken,
            _protocol: &'a str,
            _network: &'a str,
            raw_tx: &'a [u8],
        ) -> BoxFuture<'a, Result<String, Error>> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move { Ok(format!("0x{}", hex::encode(raw_tx))) })
        }
    }

    /// Accepts a signature equal to the reversed message.
    struct MirrorKey;

    impl Balance for MirrorKey {
        fn balance(&self) -> String {
            "1.5".to_owned()
        }

        fn unit(&self) -> String {
            "ether".to_owned()
        }

        fn bytes(&self) -> Vec<u8> {
            vec![0xab, 0xcd]
        }

        fn kind(&self) -> &str {
            "mirror"
        }

        fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
            message.iter().rev().eq(signature.iter())
        }
    }

    #[test]
    fn accepts_valid_signature() {
        assert!(authenticate(&MirrorKey, b"abc", b"cba").is_ok());
    }

    #[test]
    fn rejects_invalid_signature_with_key_context() {
        let key: &dyn Balance = &MirrorKey;
        let err = authenticate(key, b"abc", b"abc").expect_err("not mirrored");
        assert_eq!(
            err.to_string(),
            "validation: mirror signature does not match key 0xabcd"
        );
    }

    #[tokio::test]
    async fn authenticated_send_reaches_the_transport() {
        let sender = CountingSender::default();
        let hash = send_authenticated(
            &sender,
            &MirrorKey,
            &[0x02, 0x01],
            &CancellationToken::new(),
            "ethereum",
            "mainnet",
            &[0x01, 0x02],
        )
        .await
        .expect("signature matches");
        assert_eq!(hash, "0x0102");
        assert_eq!(sender.sent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn bad_signature_never_reaches_the_transport() {
        let sender = CountingSender::default();
        let err = send_authenticated(
            &sender,
            &MirrorKey,
            &[0x01, 0x02],
            &CancellationToken::new(),
            "ethereum",
            "mainnet",
            &[0x01, 0x02],
        )
        .await
        .expect_err("not mirrored");
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(sender.sent.load(Ordering::SeqCst), 0);
    }
}
