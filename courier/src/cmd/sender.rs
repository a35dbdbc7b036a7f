//! `courier sender` commands: select and inspect per-network senders.

use std::path::Path;

use courier::error::Error;

use super::open_registry;

/// Execute `sender set`, persisting the selection on success.
///
/// # Errors
///
/// Returns the registry's validation error, in which case the file is left
/// untouched, or an error if the file cannot be read or written.
#[allow(clippy::print_stdout)]
pub fn set(config_path: &Path, chain: &str, network: &str, kind: &str) -> Result<(), Error> {
    let mut registry = open_registry(config_path, true)?;
    let kind = registry.set(chain, network, kind)?;
    registry.into_store().save(config_path)?;

    println!("\"{kind}\" used for sending messages");
    Ok(())
}

/// Execute `sender list`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be read or any selection
/// fails to resolve; nothing is printed in that case.
#[allow(clippy::print_stdout)]
pub fn list(config_path: &Path) -> Result<(), Error> {
    let senders = open_registry(config_path, false)?.senders()?;

    let mut entries: Vec<_> = senders
        .iter()
        .map(|(key, sender)| (key.as_str(), sender.kind()))
        .collect();
    entries.sort_unstable_by_key(|&(key, _)| key);

    let width = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, kind) in entries {
        println!("{key:<width$}  {kind}");
    }
    Ok(())
}
