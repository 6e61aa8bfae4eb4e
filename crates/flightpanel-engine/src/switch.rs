use std::sync::Arc;

use flightpanel_errors::Result;
use flightpanel_hid::{PanelDeviceInfo, PanelOpener};
use flightpanel_protocol::{
    GearLights, InputSnapshot, LandingGearLights, PanelKind, SwitchState, build_switch_report,
};
use tracing::debug;

use crate::config::EngineConfig;
use crate::events::InputEvents;
use crate::handle::PanelHandle;
use crate::state::PanelState;

/// Switch panel: toggle bank plus the six landing gear lights.
#[derive(Debug)]
pub struct SwitchPanel {
    handle: PanelHandle,
    lights: Option<GearLights>,
}

impl SwitchPanel {
    pub fn new(opener: Arc<dyn PanelOpener>, config: EngineConfig) -> Self {
        Self {
            handle: PanelHandle::new(PanelKind::Switch, opener, config),
            lights: None,
        }
    }

    pub fn connect(&mut self) -> Result<()> {
        self.handle.connect()
    }

    pub fn close(&mut self) {
        self.handle.close();
    }

    pub fn state(&self) -> PanelState {
        self.handle.state()
    }

    pub fn is_connected(&self) -> bool {
        self.handle.is_connected()
    }

    pub fn is_mock(&self) -> bool {
        self.handle.is_mock()
    }

    pub fn device(&self) -> Option<&PanelDeviceInfo> {
        self.handle.device()
    }

    pub fn input_events(&mut self) -> Result<InputEvents> {
        self.handle.input_events()
    }

    pub fn snapshot(&self) -> InputSnapshot {
        self.handle.snapshot()
    }

    /// Toggle positions from the latest input report.
    pub fn switch_state(&self) -> SwitchState {
        SwitchState::from(&self.handle.snapshot())
    }

    pub fn set_leds(&mut self, lights: GearLights) -> Result<()> {
        self.handle.write_report(&build_switch_report(lights))?;
        debug!(lights = %format!("{:#04x}", lights.bits()), "gear lights updated");
        self.lights = Some(lights);
        Ok(())
    }

    pub fn set_lights(&mut self, lights: LandingGearLights) -> Result<()> {
        self.set_leds(lights.into())
    }

    /// Three reds.
    pub fn set_gear_up(&mut self) -> Result<()> {
        self.set_leds(GearLights::GEAR_UP)
    }

    /// Three greens.
    pub fn set_gear_down(&mut self) -> Result<()> {
        self.set_leds(GearLights::GEAR_DOWN)
    }

    pub fn set_gear_transition(&mut self) -> Result<()> {
        self.set_leds(GearLights::GEAR_TRANSITION)
    }

    pub fn set_all_off(&mut self) -> Result<()> {
        self.set_leds(GearLights::OFF)
    }

    /// Lights as last sent.
    pub fn lights(&self) -> Option<GearLights> {
        self.lights
    }
}

#[cfg(test)]
mod tests {
    use flightpanel_hid::mock::MockOpener;

    use super::*;

    #[test]
    fn gear_helpers_write_one_byte() -> Result<()> {
        let opener = MockOpener::new();
        let mut switch = SwitchPanel::new(Arc::new(opener.clone()), EngineConfig::default());
        switch.connect()?;
        switch.set_gear_up()?;
        switch.set_gear_down()?;
        switch.set_gear_transition()?;
        switch.set_all_off()?;

        let payloads: Vec<Vec<u8>> = opener
            .transport(PanelKind::Switch)
            .writes()
            .into_iter()
            .map(|w| w.payload)
            .collect();
        assert_eq!(payloads, vec![vec![0x38], vec![0x07], vec![0x3F], vec![0x00]]);
        assert_eq!(switch.lights(), Some(GearLights::OFF));
        Ok(())
    }

    #[test]
    fn per_light_flags_map_to_bits() -> Result<()> {
        let opener = MockOpener::new();
        let mut switch = SwitchPanel::new(Arc::new(opener.clone()), EngineConfig::default());
        switch.connect()?;
        switch.set_lights(LandingGearLights {
            green_n: true,
            red_r: true,
            ..LandingGearLights::default()
        })?;
        assert_eq!(switch.lights().map(GearLights::bits), Some(0x21));
        Ok(())
    }
}
