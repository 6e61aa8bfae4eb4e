use std::path::Path;
use std::sync::Arc;

use flightpanel_errors::Result;
use flightpanel_framebuffer::{FipFrame, Pattern, load_frame, render};
use flightpanel_hid::{PanelDeviceInfo, PanelOpener};
use flightpanel_protocol::{InputSnapshot, PanelKind};
use image::DynamicImage;
use serde::Serialize;
use tracing::info;

use crate::config::EngineConfig;
use crate::events::InputEvents;
use crate::handle::PanelHandle;
use crate::state::PanelState;

/// What the FIP screen was last given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "detail", rename_all = "snake_case")]
pub enum FipContent {
    Frame,
    Image { width: u32, height: u32 },
    File(String),
    Pattern(String),
}

/// Flight Instrument Panel: 320x240 colour screen and twelve soft buttons.
#[derive(Debug)]
pub struct FipPanel {
    handle: PanelHandle,
    frame: Option<FipFrame>,
    content: Option<FipContent>,
}

impl FipPanel {
    pub fn new(opener: Arc<dyn PanelOpener>, config: EngineConfig) -> Self {
        Self {
            handle: PanelHandle::new(PanelKind::Fip, opener, config),
            frame: None,
            content: None,
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

    fn send(&mut self, frame: FipFrame, content: FipContent) -> Result<()> {
        self.handle.write_report(frame.as_bytes())?;
        info!(panel = %PanelKind::Fip, content = ?content, "FIP frame sent");
        self.frame = Some(frame);
        self.content = Some(content);
        Ok(())
    }

    /// Push a ready framebuffer.
    pub fn send_frame(&mut self, frame: FipFrame) -> Result<()> {
        self.send(frame, FipContent::Frame)
    }

    /// Render any raster with the configured resize policy and push it.
    pub fn send_image(&mut self, image: &DynamicImage) -> Result<()> {
        let frame = render(image, &self.handle.config().fip);
        self.send(
            frame,
            FipContent::Image {
                width: image.width(),
                height: image.height(),
            },
        )
    }

    /// Load an image file and push it.
    pub fn send_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let frame = load_frame(path, &self.handle.config().fip)?;
        self.send(frame, FipContent::File(path.display().to_string()))
    }

    pub fn show_pattern(&mut self, pattern: Pattern) -> Result<()> {
        self.send(pattern.render(), FipContent::Pattern(pattern.name().to_string()))
    }

    pub fn clear(&mut self) -> Result<()> {
        self.show_pattern(Pattern::Solid([0, 0, 0]))
    }

    pub fn last_frame(&self) -> Option<&FipFrame> {
        self.frame.as_ref()
    }

    pub fn last_content(&self) -> Option<&FipContent> {
        self.content.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use flightpanel_errors::PanelError;
    use flightpanel_hid::mock::MockOpener;
    use flightpanel_protocol::FIP_FRAME_LEN;

    use super::*;

    #[test]
    fn frame_goes_out_as_one_logical_write() -> Result<()> {
        let opener = MockOpener::new();
        let mut fip = FipPanel::new(Arc::new(opener.clone()), EngineConfig::default());
        fip.connect()?;
        fip.show_pattern(Pattern::ColorBars)?;

        let writes = opener.transport(PanelKind::Fip).writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].payload.len(), FIP_FRAME_LEN);
        assert_eq!(&writes[0].payload[..3], &[255, 255, 255]);
        assert_eq!(
            fip.last_content(),
            Some(&FipContent::Pattern("bars".to_string()))
        );
        Ok(())
    }

    #[test]
    fn image_is_resized_before_sending() -> Result<()> {
        let opener = MockOpener::new();
        let mut fip = FipPanel::new(Arc::new(opener.clone()), EngineConfig::default());
        fip.connect()?;
        let img = DynamicImage::new_rgb8(64, 48);
        fip.send_image(&img)?;
        assert_eq!(fip.last_frame().map(|f| f.as_bytes().len()), Some(FIP_FRAME_LEN));
        Ok(())
    }

    #[test]
    fn unsupported_file_is_rejected_before_io() -> Result<()> {
        let opener = MockOpener::new();
        let mut fip = FipPanel::new(Arc::new(opener.clone()), EngineConfig::default());
        fip.connect()?;
        let err = fip.send_file("/tmp/panel.tiff");
        assert!(matches!(err, Err(PanelError::UnsupportedFormat(_))));
        assert!(opener.transport(PanelKind::Fip).writes().is_empty());
        Ok(())
    }
}
