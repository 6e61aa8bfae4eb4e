//! Structured logging setup

use anyhow::Result;
use tracing::info;

/// Structured logging configuration
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is unset
    pub level: tracing::Level,
    /// Include thread names, which identify the per-panel pollers
    pub thread_names: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            thread_names: true,
        }
    }
}

impl LoggingConfig {
    pub fn from_verbosity(verbose: u8) -> Self {
        let level = match verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };
        Self {
            level,
            ..Self::default()
        }
    }

    fn default_filter(&self) -> String {
        let level = self.level.to_string().to_ascii_lowercase();
        format!(
            "flightpanel_service={level},panelsd={level},flightpanel_engine={level},flightpanel_hid={level},warn"
        )
    }
}

/// Initialize structured logging
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_names(config.thread_names),
        )
        .try_init()?;

    info!(level = %config.level, "Structured logging initialized");
    Ok(())
}
