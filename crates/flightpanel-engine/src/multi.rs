use std::sync::Arc;

use flightpanel_errors::Result;
use flightpanel_hid::{PanelDeviceInfo, PanelOpener};
use flightpanel_protocol::{
    InputSnapshot, LedBank, MULTI_REPORT_LEN, MultiDisplay, PanelKind, blank_multi_report,
    build_multi_report, with_multi_leds,
};
use tracing::debug;

use crate::config::EngineConfig;
use crate::events::InputEvents;
use crate::handle::PanelHandle;
use crate::state::PanelState;

/// Multi panel: two 5-digit rows and the autopilot annunciators.
#[derive(Debug)]
pub struct MultiPanel {
    handle: PanelHandle,
    display: Option<MultiDisplay>,
    report: Option<[u8; MULTI_REPORT_LEN]>,
}

impl MultiPanel {
    pub fn new(opener: Arc<dyn PanelOpener>, config: EngineConfig) -> Self {
        Self {
            handle: PanelHandle::new(PanelKind::Multi, opener, config),
            display: None,
            report: None,
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

    fn send(&mut self, report: [u8; MULTI_REPORT_LEN]) -> Result<()> {
        self.handle.write_report(&report)?;
        self.report = Some(report);
        Ok(())
    }

    /// Show both rows and the LEDs in one transfer. Rows are encoded as
    /// given.
    pub fn set_display(&mut self, display: &MultiDisplay) -> Result<()> {
        self.send(build_multi_report(display))?;
        let shown = display;
        debug!(
            top = %shown.top_row,
            bottom = %shown.bottom_row,
            leds = shown.leds.bits(),
            "multi display updated"
        );
        self.display = Some(display.clone());
        Ok(())
    }

    /// Like [`set_display`](Self::set_display), but first strips each row to
    /// digits, dots, minus and spaces and cuts it to five characters.
    pub fn set_values(&mut self, display: &MultiDisplay) -> Result<()> {
        self.set_display(&display.formatted())
    }

    /// Change the annunciators without touching the rows on screen.
    pub fn set_leds(&mut self, leds: LedBank) -> Result<()> {
        let report = match &self.report {
            Some(cached) => with_multi_leds(cached, leds),
            None => blank_multi_report(leds),
        };
        self.send(report)?;
        if let Some(display) = self.display.as_mut() {
            display.leds = leds;
        }
        debug!(leds = leds.bits(), lit = ?leds.lit(), "multi leds updated");
        Ok(())
    }

    /// Switch one annunciator, leaving the others as last sent.
    pub fn set_led(&mut self, led: LedBank, on: bool) -> Result<()> {
        let mut leds = self.leds();
        leds.set(led, on);
        self.set_leds(leds)
    }

    /// LED state as last sent.
    pub fn leds(&self) -> LedBank {
        self.report
            .as_ref()
            .map(|r| LedBank::from_bits(r[flightpanel_protocol::MULTI_LED_OFFSET]))
            .unwrap_or_default()
    }

    pub fn last_display(&self) -> Option<&MultiDisplay> {
        self.display.as_ref()
    }

    pub fn last_report(&self) -> Option<&[u8; MULTI_REPORT_LEN]> {
        self.report.as_ref()
    }
}
