//! The FIP framebuffer payload.

use flightpanel_errors::{PanelError, Result};
use flightpanel_protocol::{FIP_FRAME_LEN, FIP_HEIGHT, FIP_WIDTH};
use image::RgbImage;

/// Exactly 320 x 240 x 3 bytes, row-major, R-G-B.
#[derive(Clone, PartialEq, Eq)]
pub struct FipFrame {
    data: Vec<u8>,
}

impl FipFrame {
    /// A frame filled with one colour.
    pub fn solid(rgb: [u8; 3]) -> Self {
        Self {
            data: rgb.repeat(FIP_FRAME_LEN / 3),
        }
    }

    pub fn black() -> Self {
        Self::solid([0, 0, 0])
    }

    /// Wrap a raw payload, rejecting anything but 230,400 bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.len() != FIP_FRAME_LEN {
            return Err(PanelError::InvalidArgument(format!(
                "framebuffer must be {FIP_FRAME_LEN} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self { data })
    }

    /// Take the pixels of a 320x240 RGB image.
    pub fn from_rgb_image(img: RgbImage) -> Result<Self> {
        if img.dimensions() != (FIP_WIDTH, FIP_HEIGHT) {
            let (w, h) = img.dimensions();
            return Err(PanelError::InvalidArgument(format!(
                "framebuffer image must be {FIP_WIDTH}x{FIP_HEIGHT}, got {w}x{h}"
            )));
        }
        Self::from_bytes(img.into_raw())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// RGB triple at (x, y), `None` outside the screen.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= FIP_WIDTH || y >= FIP_HEIGHT {
            return None;
        }
        let offset = 3 * (y as usize * FIP_WIDTH as usize + x as usize);
        let px = self.data.get(offset..offset + 3)?;
        Some([px[0], px[1], px[2]])
    }

    /// Copy back into an image, for saving previews.
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        RgbImage::from_raw(FIP_WIDTH, FIP_HEIGHT, self.data.clone())
    }
}

impl Default for FipFrame {
    fn default() -> Self {
        Self::black()
    }
}

impl std::fmt::Debug for FipFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FipFrame")
            .field("len", &self.data.len())
            .field("first_pixel", &self.pixel(0, 0))
            .finish()
    }
}
