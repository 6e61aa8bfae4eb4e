//! panelctl - Saitek flight panel control CLI
//!
//! Drives the Radio, Multi, Switch and FIP panels directly over USB: write
//! displays and lights, render images for the FIP, and watch input events.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod completion;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use flightpanel_engine::EngineConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::*;

#[derive(Parser)]
#[command(name = "panelctl")]
#[command(about = "Saitek flight panel control - radio, multi, switch and FIP")]
#[command(version)]
#[command(long_about = "
panelctl talks to Saitek Pro Flight panels over USB. It writes the Radio and
Multi panel displays, the Switch panel landing gear lights and FIP images, and
can stream button and switch events from any attached panel.

Use --mock to run against in-memory panels when no hardware is attached.
Use --json for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use in-memory mock panels instead of USB hardware
    #[arg(long, global = true, env = "PANELCTL_MOCK")]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List attached panels
    List,

    /// Connect every panel and report its state
    Status,

    /// Set the Radio panel frequencies
    Radio(RadioArgs),

    /// Set the Multi panel rows and LEDs
    Multi(MultiArgs),

    /// Set the Switch panel landing gear lights
    Switch(SwitchArgs),

    /// Show an image or pattern on the FIP, or render one to a file
    Fip(FipArgs),

    /// Print input events from a panel as they happen
    Watch(WatchArgs),

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "panelctl={log_level},flightpanel_engine={log_level},flightpanel_hid={log_level}"
                )
                .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute_command(&cli) {
        if cli.json {
            output::print_error_json(&e);
        } else {
            output::print_error_human(&e);
        }
        std::process::exit(error::exit_code(&e));
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    let ctx = PanelContext {
        mock: cli.mock,
        json: cli.json,
        config: EngineConfig::default(),
    };
    match &cli.command {
        Commands::List => commands::list::execute(&ctx),
        Commands::Status => commands::status::execute(&ctx),
        Commands::Radio(args) => commands::radio::execute(args, &ctx),
        Commands::Multi(args) => commands::multi::execute(args, &ctx),
        Commands::Switch(args) => commands::switch::execute(args, &ctx),
        Commands::Fip(args) => commands::fip::execute(args, &ctx),
        Commands::Watch(args) => commands::watch::execute(args, &ctx),
        Commands::Completion { shell } => {
            completion::generate_completion(*shell);
            Ok(())
        }
    }
}
