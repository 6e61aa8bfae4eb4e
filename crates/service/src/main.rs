//! Flight panel service daemon (panelsd)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use flightpanel_engine::PanelManager;
use flightpanel_service::observability::{LoggingConfig, init_logging};
use flightpanel_service::{AppState, ServiceConfig, router};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "panelsd")]
#[command(about = "HTTP control surface for Saitek flight panels")]
#[command(version)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "PANELSD_CONFIG", default_value = "panelsd.yaml")]
    config: PathBuf,

    /// Override the configured bind address
    #[arg(long)]
    bind: Option<String>,

    /// Serve in-memory mock panels instead of USB hardware
    #[arg(long)]
    mock: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LoggingConfig::from_verbosity(args.verbose))?;

    info!("Starting panelsd v{}", env!("CARGO_PKG_VERSION"));

    let mut config = ServiceConfig::load_from_path(&args.config).await?;
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    config.validate()?;

    let manager = if args.mock {
        warn!("Serving mock panels");
        PanelManager::mock(config.engine.clone())
    } else {
        PanelManager::usb(config.engine.clone()).context("Failed to initialise libusb")?
    };
    let state = AppState::new(manager, config.recent_events);

    if config.connect_on_start {
        match state.connect_all().await {
            Ok(status) => {
                for panel in status.panels.iter().filter(|p| !p.connected) {
                    warn!(panel = %panel.kind, error = ?panel.last_error, "panel not connected");
                }
            }
            Err(e) => error!("Initial connect failed: {}", e),
        }
    }

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    if let Err(e) = state.close_all().await {
        error!("Failed to close panels: {}", e);
    }
    info!("Service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
