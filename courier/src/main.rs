//! courier command line
//!
//! Chooses, per chain and network, which transport delivers outbound
//! messages, and sends through it.
//!
//! ```sh
//! courier init                                  # Generate default courier.toml
//! courier sender set ethereum mainnet relay     # Select a transport
//! courier sender list                           # Show resolved senders
//! courier send ethereum mainnet 0xf86b...       # Submit a signed transaction
//! ```

mod cmd;

use clap::Parser;
use cmd::{Cli, Commands, SenderCommand};

#[tokio::main]
#[allow(clippy::print_stderr)]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    #[cfg(feature = "telemetry")]
    courier::telemetry::Telemetry::new()
        .with_log_level(cli.log_level.as_str())
        .register();

    let result = match cli.command {
        Commands::Init { output, force } => cmd::init::run(&output, force),
        Commands::Sender { command } => match command {
            SenderCommand::Set {
                chain,
                network,
                kind,
                config,
            } => cmd::sender::set(&config, &chain, &network, &kind),
            SenderCommand::List { config } => cmd::sender::list(&config),
        },
        Commands::Send {
            chain,
            network,
            raw_tx,
            timeout,
            config,
        } => cmd::send::run(&config, &chain, &network, &raw_tx, timeout).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
