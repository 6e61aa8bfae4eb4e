//! Command implementations for panelctl

pub mod fip;
pub mod list;
pub mod multi;
pub mod radio;
pub mod status;
pub mod switch;
pub mod watch;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use flightpanel_engine::{EngineConfig, PanelManager};
use flightpanel_framebuffer::{Pattern, ResizePolicy};
use flightpanel_protocol::PanelKind;

/// Global switches every command needs to reach a panel.
#[derive(Debug, Clone)]
pub struct PanelContext {
    pub mock: bool,
    pub json: bool,
    pub config: EngineConfig,
}

impl PanelContext {
    pub fn manager(&self) -> Result<PanelManager> {
        if self.mock {
            return Ok(PanelManager::mock(self.config.clone()));
        }
        PanelManager::usb(self.config.clone()).context("failed to initialise libusb")
    }

    /// A manager with `kind` already connected.
    pub fn connect(&self, kind: PanelKind) -> Result<PanelManager> {
        let mut manager = self.manager()?;
        manager
            .connect(kind)
            .with_context(|| format!("failed to connect {kind} panel"))?;
        Ok(manager)
    }
}

#[derive(Debug, Args)]
pub struct RadioArgs {
    /// COM1 active frequency
    #[arg(long = "com1a", default_value = "")]
    pub com1_active: String,
    /// COM1 standby frequency
    #[arg(long = "com1s", default_value = "")]
    pub com1_standby: String,
    /// COM2 active frequency
    #[arg(long = "com2a", default_value = "")]
    pub com2_active: String,
    /// COM2 standby frequency
    #[arg(long = "com2s", default_value = "")]
    pub com2_standby: String,
}

#[derive(Debug, Args)]
pub struct MultiArgs {
    /// Top row value
    #[arg(long, default_value = "")]
    pub top: String,
    /// Bottom row value
    #[arg(long, default_value = "")]
    pub bottom: String,
    /// LEDs: comma-separated names (AP,HDG,NAV,IAS,ALT,VS,APR,REV) or a bitmap such as 0x21
    #[arg(long)]
    pub leds: Option<String>,
    /// Only update the LEDs, leaving the rows untouched
    #[arg(long, requires = "leds")]
    pub leds_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GearArg {
    /// Three reds
    Up,
    /// Three greens
    Down,
    /// Red and green together
    Transition,
    Off,
}

#[derive(Debug, Args)]
pub struct SwitchArgs {
    /// Preset for all six lights
    #[arg(
        long,
        value_enum,
        conflicts_with_all = ["green_n", "green_l", "green_r", "red_n", "red_l", "red_r"]
    )]
    pub gear: Option<GearArg>,
    #[arg(long)]
    pub green_n: bool,
    #[arg(long)]
    pub green_l: bool,
    #[arg(long)]
    pub green_r: bool,
    #[arg(long)]
    pub red_n: bool,
    #[arg(long)]
    pub red_l: bool,
    #[arg(long)]
    pub red_r: bool,
}

#[derive(Debug, Args)]
pub struct FipArgs {
    /// Image file to show (png, jpg, jpeg, gif)
    #[arg(long, conflicts_with = "pattern")]
    pub image: Option<PathBuf>,
    /// Generated pattern: test, bars, gradient, instrument, a colour name or #RRGGBB
    #[arg(long)]
    pub pattern: Option<Pattern>,
    /// Resize policy for images that are not 320x240
    #[arg(long)]
    pub policy: Option<ResizePolicy>,
    /// Letterbox colour as #RRGGBB or #RRGGBBAA
    #[arg(long)]
    pub background: Option<String>,
    /// JPEG quality used with --save, clamped to 1..=100
    #[arg(long, allow_negative_numbers = true)]
    pub quality: Option<i64>,
    /// Print the image dimensions and whether a resize is needed, then exit
    #[arg(long, requires = "image")]
    pub info: bool,
    /// Write the rendered frame to a PNG or JPEG file instead of the panel
    #[arg(long)]
    pub save: Option<PathBuf>,
    /// Write the generated test images into a directory, then exit
    #[arg(long, value_name = "DIR")]
    pub generate: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Panel to watch: radio, multi, switch or fip
    pub panel: PanelKind,
    /// Stop after this many seconds
    #[arg(long)]
    pub seconds: Option<u64>,
}
