//! Log subscriber setup.
//!
//! Provides [`Telemetry`] for configuring the `tracing` subscriber. Only
//! available with the `telemetry` feature.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Subscriber configuration.
///
/// `RUST_LOG` always takes precedence over the programmatic level.
#[derive(Debug, Default)]
pub struct Telemetry {
    log_level: Option<String>,
}

impl Telemetry {
    /// Creates a new, empty [`Telemetry`] instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the log level filter used when `RUST_LOG` is not set.
    ///
    /// Accepts any valid [`EnvFilter`] directive string (e.g. `"debug"`,
    /// `"courier=debug,reqwest=info"`).
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// Installs the global subscriber, logging to stderr so command output
    /// on stdout stays machine readable.
    ///
    /// Does nothing if a subscriber is already installed.
    pub fn register(self) {
        let fallback = self.log_level.as_deref().unwrap_or("warn");
        let registered = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init();

        if registered.is_ok() {
            tracing::debug!("log subscriber registered");
        }
    }
}
