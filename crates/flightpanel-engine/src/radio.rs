use std::sync::Arc;

use flightpanel_errors::Result;
use flightpanel_hid::{PanelDeviceInfo, PanelOpener};
use flightpanel_protocol::segment::FIELD_LEN;
use flightpanel_protocol::{
    InputSnapshot, PanelKind, RADIO_CODEC, RADIO_REPORT_LEN, RadioDisplay, build_radio_report,
};
use tracing::debug;

use crate::config::EngineConfig;
use crate::events::InputEvents;
use crate::handle::PanelHandle;
use crate::state::PanelState;

/// Radio panel: four 5-digit frequency windows.
#[derive(Debug)]
pub struct RadioPanel {
    handle: PanelHandle,
    display: Option<RadioDisplay>,
    report: Option<[u8; RADIO_REPORT_LEN]>,
}

impl RadioPanel {
    pub fn new(opener: Arc<dyn PanelOpener>, config: EngineConfig) -> Self {
        Self {
            handle: PanelHandle::new(PanelKind::Radio, opener, config),
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

    /// Show four fields exactly as given. Leading spaces right-align a value.
    pub fn set_display(&mut self, display: &RadioDisplay) -> Result<()> {
        let report = build_radio_report(display);
        self.handle.write_report(&report)?;
        let shown = display;
        debug!(
            com1 = %shown.com1_active,
            com1_standby = %shown.com1_standby,
            com2 = %shown.com2_active,
            com2_standby = %shown.com2_standby,
            "radio display updated"
        );
        self.display = Some(display.clone());
        self.report = Some(report);
        Ok(())
    }

    /// Show four frequencies after dropping characters the display cannot
    /// draw, such as unit suffixes.
    pub fn set_frequencies(&mut self, display: &RadioDisplay) -> Result<()> {
        self.set_display(&display.formatted())
    }

    /// Last display successfully sent.
    pub fn last_display(&self) -> Option<&RadioDisplay> {
        self.display.as_ref()
    }

    pub fn last_report(&self) -> Option<&[u8; RADIO_REPORT_LEN]> {
        self.report.as_ref()
    }

    /// Read the cached report back into text, field by field.
    pub fn decoded_fields(&self) -> Option<[String; 4]> {
        let report = self.report.as_ref()?;
        let mut fields = report.chunks_exact(FIELD_LEN).take(4).map(|chunk| {
            let mut field = [0u8; FIELD_LEN];
            field.copy_from_slice(chunk);
            RADIO_CODEC.decode(&field)
        });
        Some([
            fields.next().unwrap_or_default(),
            fields.next().unwrap_or_default(),
            fields.next().unwrap_or_default(),
            fields.next().unwrap_or_default(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use flightpanel_errors::PanelError;
    use flightpanel_hid::mock::MockOpener;

    use super::*;

    #[test]
    fn set_display_requires_connection() {
        let mut radio = RadioPanel::new(Arc::new(MockOpener::new()), EngineConfig::default());
        let err = radio.set_display(&RadioDisplay::new("118.00", "", "", ""));
        assert!(matches!(err, Err(PanelError::NotConnected(_))));
        assert!(radio.last_report().is_none());
    }

    fn connected() -> Result<(RadioPanel, MockOpener)> {
        let opener = MockOpener::new();
        let mut radio = RadioPanel::new(Arc::new(opener.clone()), EngineConfig::default());
        radio.connect()?;
        Ok((radio, opener))
    }

    #[test]
    fn set_frequencies_sanitises_and_caches() -> Result<()> {
        let (mut radio, opener) = connected()?;
        radio.set_frequencies(&RadioDisplay::new("118.00MHz", "118.50", "121.30", "121.90"))?;

        assert_eq!(radio.last_display().map(|d| d.com1_active.as_str()), Some("118.00"));
        let written = opener.transport(PanelKind::Radio).last_write().map(|w| w.payload);
        assert_eq!(written.as_deref(), radio.last_report().map(|r| &r[..]));
        assert_eq!(
            radio.decoded_fields().map(|f| f[2].clone()),
            Some("121.30".to_string())
        );
        Ok(())
    }

    #[test]
    fn set_display_keeps_padding_and_minus() -> Result<()> {
        let (mut radio, opener) = connected()?;
        radio.set_display(&RadioDisplay::new("  118", "-5", "", ""))?;

        let payload = opener
            .transport(PanelKind::Radio)
            .last_write()
            .map(|w| w.payload)
            .unwrap_or_default();
        assert_eq!(payload[0..5], RADIO_CODEC.encode("  118"));
        assert_eq!(payload[0..5], [0x0F, 0x0F, 0x01, 0x01, 0x08]);
        assert_eq!(payload[5..10], [0x0E, 0x05, 0x0F, 0x0F, 0x0F]);
        assert_eq!(radio.last_display().map(|d| d.com1_active.as_str()), Some("  118"));
        Ok(())
    }

    #[test]
    fn set_frequencies_keeps_padding_and_minus() -> Result<()> {
        let (mut radio, _) = connected()?;
        radio.set_frequencies(&RadioDisplay::new(" 1.5kHz", "-5", "", ""))?;
        assert_eq!(radio.last_display().map(|d| d.com1_active.as_str()), Some(" 1.5"));
        assert_eq!(radio.last_display().map(|d| d.com1_standby.as_str()), Some("-5"));
        Ok(())
    }
}
