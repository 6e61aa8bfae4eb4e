//! Registry holding up to one panel of each kind.
//!
//! Connection failures are recorded per kind and reported through
//! [`PanelManager::status`]; they never stop the manager from serving the
//! panels that did connect.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use crossbeam::channel::{self, Receiver};
use flightpanel_errors::{PanelError, Result};
use flightpanel_framebuffer::Pattern;
use flightpanel_hid::mock::MockOpener;
use flightpanel_hid::usb::UsbOpener;
use flightpanel_hid::{PanelDeviceInfo, PanelOpener};
use flightpanel_protocol::{GearLights, InputEvent, LedBank, MultiDisplay, PanelKind, RadioDisplay};
use image::DynamicImage;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::fip::FipPanel;
use crate::multi::MultiPanel;
use crate::panel::{LastDisplay, Panel};
use crate::radio::RadioPanel;
use crate::state::PanelState;
use crate::switch::SwitchPanel;

/// Result of the most recent connection attempt for one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionOutcome {
    Connected { mock: bool },
    Failed(PanelError),
}

/// Per-kind entry of [`ManagerStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelStatus {
    pub kind: PanelKind,
    pub connected: bool,
    pub mock: bool,
    pub state: PanelState,
    pub device: Option<String>,
    pub last_error: Option<String>,
    pub display: Option<LastDisplay>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagerStatus {
    pub panels: Vec<PanelStatus>,
}

impl ManagerStatus {
    pub fn get(&self, kind: PanelKind) -> Option<&PanelStatus> {
        self.panels.iter().find(|p| p.kind == kind)
    }

    pub fn connected_count(&self) -> usize {
        self.panels.iter().filter(|p| p.connected).count()
    }
}

pub struct PanelManager {
    config: EngineConfig,
    opener: Arc<dyn PanelOpener>,
    panels: BTreeMap<PanelKind, Panel>,
    outcomes: BTreeMap<PanelKind, ConnectionOutcome>,
}

impl std::fmt::Debug for PanelManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelManager")
            .field("panels", &self.panels.keys().collect::<Vec<_>>())
            .field("outcomes", &self.outcomes)
            .finish_non_exhaustive()
    }
}

fn not_connected(kind: PanelKind) -> PanelError {
    PanelError::NotConnected(kind.name().to_string())
}

impl PanelManager {
    pub fn new(opener: Arc<dyn PanelOpener>, config: EngineConfig) -> Self {
        Self {
            config,
            opener,
            panels: BTreeMap::new(),
            outcomes: BTreeMap::new(),
        }
    }

    /// Manager backed by libusb.
    pub fn usb(config: EngineConfig) -> Result<Self> {
        let opener = UsbOpener::new(config.io_timeout()).map_err(PanelError::from)?;
        Ok(Self::new(Arc::new(opener), config))
    }

    /// Manager where every panel is served by the mock transport.
    pub fn mock(config: EngineConfig) -> Self {
        Self::new(Arc::new(MockOpener::new()), config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Panels visible on the bus right now.
    pub fn enumerate(&self) -> Result<Vec<PanelDeviceInfo>> {
        self.opener.enumerate().map_err(PanelError::from)
    }

    /// Connect one kind, creating its panel on first use.
    pub fn connect(&mut self, kind: PanelKind) -> Result<()> {
        let panel = self
            .panels
            .entry(kind)
            .or_insert_with(|| Panel::new(kind, Arc::clone(&self.opener), self.config.clone()));
        let result = panel.connect();
        let outcome = match &result {
            Ok(()) => ConnectionOutcome::Connected {
                mock: panel.is_mock(),
            },
            Err(e) => {
                warn!(panel = %kind, error = %e, "connect failed");
                ConnectionOutcome::Failed(e.clone())
            }
        };
        self.outcomes.insert(kind, outcome);
        result
    }

    /// Try every kind in turn; failures only show up in the returned status.
    pub fn connect_all(&mut self) -> ManagerStatus {
        for kind in PanelKind::ALL {
            if self.connect(kind).is_err() {
                // Already recorded in `outcomes` and logged by `connect`.
                continue;
            }
        }
        let status = self.status();
        info!(
            connected = status.connected_count(),
            total = PanelKind::ALL.len(),
            "connect_all finished"
        );
        status
    }

    pub fn close(&mut self, kind: PanelKind) {
        if let Some(panel) = self.panels.get_mut(&kind) {
            panel.close();
        }
    }

    pub fn close_all(&mut self) {
        for panel in self.panels.values_mut() {
            panel.close();
        }
    }

    pub fn panel(&self, kind: PanelKind) -> Option<&Panel> {
        self.panels.get(&kind)
    }

    pub fn panel_mut(&mut self, kind: PanelKind) -> Option<&mut Panel> {
        self.panels.get_mut(&kind)
    }

    pub fn outcome(&self, kind: PanelKind) -> Option<&ConnectionOutcome> {
        self.outcomes.get(&kind)
    }

    pub fn status(&self) -> ManagerStatus {
        let panels = PanelKind::ALL
            .into_iter()
            .map(|kind| {
                let panel = self.panels.get(&kind);
                let last_error = match self.outcomes.get(&kind) {
                    Some(ConnectionOutcome::Failed(e)) => Some(e.to_string()),
                    _ => None,
                };
                PanelStatus {
                    kind,
                    connected: panel.is_some_and(Panel::is_connected),
                    mock: panel.is_some_and(Panel::is_mock),
                    state: panel.map(Panel::state).unwrap_or_default(),
                    device: panel.and_then(Panel::device).map(PanelDeviceInfo::display_name),
                    last_error,
                    display: panel.and_then(Panel::last_display),
                }
            })
            .collect();
        ManagerStatus { panels }
    }

    pub fn radio_mut(&mut self) -> Result<&mut RadioPanel> {
        match self.panels.get_mut(&PanelKind::Radio) {
            Some(Panel::Radio(p)) => Ok(p),
            _ => Err(not_connected(PanelKind::Radio)),
        }
    }

    pub fn multi_mut(&mut self) -> Result<&mut MultiPanel> {
        match self.panels.get_mut(&PanelKind::Multi) {
            Some(Panel::Multi(p)) => Ok(p),
            _ => Err(not_connected(PanelKind::Multi)),
        }
    }

    pub fn switch_mut(&mut self) -> Result<&mut SwitchPanel> {
        match self.panels.get_mut(&PanelKind::Switch) {
            Some(Panel::Switch(p)) => Ok(p),
            _ => Err(not_connected(PanelKind::Switch)),
        }
    }

    pub fn fip_mut(&mut self) -> Result<&mut FipPanel> {
        match self.panels.get_mut(&PanelKind::Fip) {
            Some(Panel::Fip(p)) => Ok(p),
            _ => Err(not_connected(PanelKind::Fip)),
        }
    }

    pub fn set_radio_display(&mut self, display: &RadioDisplay) -> Result<()> {
        self.radio_mut()?.set_display(display)
    }

    pub fn set_multi_display(&mut self, display: &MultiDisplay) -> Result<()> {
        self.multi_mut()?.set_display(display)
    }

    pub fn set_multi_leds(&mut self, leds: LedBank) -> Result<()> {
        self.multi_mut()?.set_leds(leds)
    }

    pub fn set_switch_lights(&mut self, lights: GearLights) -> Result<()> {
        self.switch_mut()?.set_leds(lights)
    }

    pub fn show_fip_pattern(&mut self, pattern: Pattern) -> Result<()> {
        self.fip_mut()?.show_pattern(pattern)
    }

    pub fn send_fip_image(&mut self, image: &DynamicImage) -> Result<()> {
        self.fip_mut()?.send_image(image)
    }

    pub fn send_fip_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.fip_mut()?.send_file(path)
    }

    /// Fan the input streams of every connected panel into one channel.
    ///
    /// Takes each panel's stream, so a panel whose stream was already taken
    /// is skipped. The returned receiver ends once all panels have closed.
    pub fn merged_events(&mut self) -> Receiver<InputEvent> {
        let (tx, rx) = channel::unbounded();
        for (kind, panel) in self.panels.iter_mut() {
            let events = match panel.input_events() {
                Ok(events) => events,
                Err(e) => {
                    debug!(panel = %kind, error = %e, "skipping panel in merged stream");
                    continue;
                }
            };
            let tx = tx.clone();
            let spawned = thread::Builder::new()
                .name(format!("events-{}", kind.name().to_ascii_lowercase()))
                .spawn(move || {
                    for event in events {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                });
            if let Err(e) = spawned {
                warn!(panel = %kind, error = %e, "failed to spawn event relay");
            }
        }
        rx
    }
}

impl Drop for PanelManager {
    fn drop(&mut self) {
        self.close_all();
    }
}
