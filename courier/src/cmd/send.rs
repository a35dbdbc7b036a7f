//! `courier send` command: submit a signed transaction.

use std::path::Path;
use std::time::Duration;

use courier::error::Error;
use courier::signal::SigDown;

use super::open_registry;

/// Execute the `send` command, printing the transaction hash.
///
/// The request is cancelled on SIGINT/SIGTERM or once `timeout_secs` pass.
///
/// # Errors
///
/// Returns an error if the payload is not hex, the pair has no resolvable
/// sender, or the transport fails or is cancelled.
#[allow(clippy::print_stdout)]
pub async fn run(
    config_path: &Path,
    chain: &str,
    network: &str,
    raw_tx: &str,
    timeout_secs: Option<u64>,
) -> Result<(), Error> {
    let raw_tx = hex::decode(raw_tx.strip_prefix("0x").unwrap_or(raw_tx))
        .map_err(|e| Error::validation(format!("raw transaction is not hex: {e}")))?;
    if raw_tx.is_empty() {
        return Err(Error::validation("raw transaction is empty"));
    }

    let sender = open_registry(config_path, false)?.sender(chain, network)?;

    let sig_down = SigDown::try_new(timeout_secs.map(Duration::from_secs))
        .map_err(|e| Error::config_with("failed to register signal handlers", e))?;
    let cancel = sig_down.cancellation_token();
    let result = sender.send(&cancel, chain, network, &raw_tx).await;
    sig_down.release().await;

    println!("{}", result?);
    Ok(())
}
