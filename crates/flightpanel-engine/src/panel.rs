//! The four panels behind one type.

use std::sync::Arc;

use flightpanel_errors::Result;
use flightpanel_hid::{PanelDeviceInfo, PanelOpener};
use flightpanel_protocol::{InputSnapshot, LandingGearLights, MultiDisplay, PanelKind, RadioDisplay};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::events::InputEvents;
use crate::fip::{FipContent, FipPanel};
use crate::multi::MultiPanel;
use crate::radio::RadioPanel;
use crate::state::PanelState;
use crate::switch::SwitchPanel;

/// Any panel. The shared lifecycle is available here; match on the variant
/// for the typed setters.
#[derive(Debug)]
pub enum Panel {
    Radio(RadioPanel),
    Multi(MultiPanel),
    Switch(SwitchPanel),
    Fip(FipPanel),
}

/// Last content sent to a panel, in the shape front-ends exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LastDisplay {
    Radio(RadioDisplay),
    Multi(MultiDisplay),
    Switch(LandingGearLights),
    Fip(FipContent),
}

macro_rules! each_panel {
    ($self:expr, $p:ident => $body:expr) => {
        match $self {
            Panel::Radio($p) => $body,
            Panel::Multi($p) => $body,
            Panel::Switch($p) => $body,
            Panel::Fip($p) => $body,
        }
    };
}

impl Panel {
    pub fn new(kind: PanelKind, opener: Arc<dyn PanelOpener>, config: EngineConfig) -> Self {
        match kind {
            PanelKind::Radio => Panel::Radio(RadioPanel::new(opener, config)),
            PanelKind::Multi => Panel::Multi(MultiPanel::new(opener, config)),
            PanelKind::Switch => Panel::Switch(SwitchPanel::new(opener, config)),
            PanelKind::Fip => Panel::Fip(FipPanel::new(opener, config)),
        }
    }

    pub fn kind(&self) -> PanelKind {
        match self {
            Panel::Radio(_) => PanelKind::Radio,
            Panel::Multi(_) => PanelKind::Multi,
            Panel::Switch(_) => PanelKind::Switch,
            Panel::Fip(_) => PanelKind::Fip,
        }
    }

    pub fn connect(&mut self) -> Result<()> {
        each_panel!(self, p => p.connect())
    }

    pub fn close(&mut self) {
        each_panel!(self, p => p.close())
    }

    pub fn state(&self) -> PanelState {
        each_panel!(self, p => p.state())
    }

    pub fn is_connected(&self) -> bool {
        each_panel!(self, p => p.is_connected())
    }

    pub fn is_mock(&self) -> bool {
        each_panel!(self, p => p.is_mock())
    }

    pub fn device(&self) -> Option<&PanelDeviceInfo> {
        each_panel!(self, p => p.device())
    }

    pub fn input_events(&mut self) -> Result<InputEvents> {
        each_panel!(self, p => p.input_events())
    }

    pub fn snapshot(&self) -> InputSnapshot {
        each_panel!(self, p => p.snapshot())
    }

    pub fn last_display(&self) -> Option<LastDisplay> {
        match self {
            Panel::Radio(p) => p.last_display().cloned().map(LastDisplay::Radio),
            Panel::Multi(p) => p.last_display().cloned().map(LastDisplay::Multi),
            Panel::Switch(p) => p.lights().map(|l| LastDisplay::Switch(l.into())),
            Panel::Fip(p) => p.last_content().cloned().map(LastDisplay::Fip),
        }
    }
}

#[cfg(test)]
mod tests {
    use flightpanel_hid::mock::MockOpener;
    use flightpanel_protocol::GearLights;

    use super::*;

    #[test]
    fn every_kind_round_trips_through_new() {
        let opener: Arc<dyn PanelOpener> = Arc::new(MockOpener::new());
        for kind in PanelKind::ALL {
            let panel = Panel::new(kind, Arc::clone(&opener), EngineConfig::default());
            assert_eq!(panel.kind(), kind);
            assert_eq!(panel.state(), PanelState::Disconnected);
            assert!(panel.last_display().is_none());
        }
    }

    #[test]
    fn last_display_follows_typed_setter() -> Result<()> {
        let mut panel = Panel::new(
            PanelKind::Switch,
            Arc::new(MockOpener::new()),
            EngineConfig::default(),
        );
        panel.connect()?;
        if let Panel::Switch(switch) = &mut panel {
            switch.set_leds(GearLights::GEAR_DOWN)?;
        }
        let expected = LandingGearLights::from(GearLights::GEAR_DOWN);
        assert_eq!(panel.last_display(), Some(LastDisplay::Switch(expected)));
        Ok(())
    }
}
