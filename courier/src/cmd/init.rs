//! `courier init` command: write the starter configuration.

use std::fs;
use std::path::Path;

use courier::config::generate_default_config;
use courier::error::Error;
use courier::store::{SenderSelections, TomlStore};

/// Execute the `init` command.
///
/// Writes the commented template to `output` and lists the sender
/// selections it seeds. An existing file is only replaced with `force`.
///
/// # Errors
///
/// Returns an error if `output` exists and `force` is not set, or if the
/// file cannot be written.
#[allow(clippy::print_stderr)]
pub fn run(output: &Path, force: bool) -> Result<(), Error> {
    if !force && output.exists() {
        return Err(Error::config(format!(
            "'{}' already exists; pass --force to replace it",
            output.display()
        )));
    }

    let template = generate_default_config();
    let seeded: TomlStore = template
        .parse()
        .map_err(|e| Error::config_with("default template", e))?;
    fs::write(output, &template)
        .map_err(|e| Error::config_with(format!("failed to write '{}'", output.display()), e))?;

    eprintln!("Wrote {}", output.display());
    for chain in seeded.chains() {
        for network in seeded.networks(&chain) {
            let kind = seeded.sender_kind(&chain, &network).unwrap_or_default();
            eprintln!("  {chain}.{network}  {kind}");
        }
    }
    eprintln!("Change a selection with `courier sender set <chain> <network> <kind>`");
    Ok(())
}
