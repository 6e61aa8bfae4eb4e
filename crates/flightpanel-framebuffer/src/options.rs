//! Pipeline configuration.

use core::fmt;
use core::str::FromStr;

use flightpanel_errors::PanelError;
use serde::{Deserialize, Serialize};

/// How a source raster is mapped onto the 320x240 screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizePolicy {
    /// Scale both axes independently to fill the screen.
    Stretch,
    /// Scale to fit inside the screen, letterboxed with the background.
    #[default]
    Fit,
    /// Scale to cover the screen, then trim the overflow evenly.
    Crop,
    /// No scaling: centre the source, clipping or padding as needed.
    Center,
}

impl ResizePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ResizePolicy::Stretch => "stretch",
            ResizePolicy::Fit => "fit",
            ResizePolicy::Crop => "crop",
            ResizePolicy::Center => "center",
        }
    }
}

impl fmt::Display for ResizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizePolicy {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stretch" => Ok(ResizePolicy::Stretch),
            "fit" => Ok(ResizePolicy::Fit),
            "crop" => Ok(ResizePolicy::Crop),
            "center" | "centre" => Ok(ResizePolicy::Center),
            other => Err(PanelError::InvalidArgument(format!(
                "unknown resize policy '{other}' (expected stretch, fit, crop or center)"
            ))),
        }
    }
}

pub const DEFAULT_JPEG_QUALITY: u8 = 90;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramebufferOptions {
    pub resize_policy: ResizePolicy,
    /// RGBA fill for letterbox and padding areas.
    pub background: [u8; 4],
    /// JPEG encode quality, 1 to 100.
    pub jpeg_quality: u8,
    /// Accepted input file extensions, lower case, without the dot.
    pub extensions: Vec<String>,
}

impl Default for FramebufferOptions {
    fn default() -> Self {
        Self {
            resize_policy: ResizePolicy::Fit,
            background: [0, 0, 0, 255],
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            extensions: ["png", "jpg", "jpeg", "gif"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl FramebufferOptions {
    pub fn with_policy(mut self, policy: ResizePolicy) -> Self {
        self.resize_policy = policy;
        self
    }

    pub fn with_background(mut self, rgba: [u8; 4]) -> Self {
        self.background = rgba;
        self
    }

    /// Set the JPEG quality, clamped into 1..=100.
    pub fn set_jpeg_quality(&mut self, quality: i64) {
        self.jpeg_quality = u8::try_from(quality.clamp(1, 100)).unwrap_or(DEFAULT_JPEG_QUALITY);
    }

    /// JPEG quality as configured, clamped into 1..=100.
    pub fn effective_jpeg_quality(&self) -> u8 {
        self.jpeg_quality.clamp(1, 100)
    }

    /// Whether `ext` (with or without a leading dot) is accepted.
    pub fn accepts_extension(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.');
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Parse `#RRGGBB`, `RRGGBB` or `#RRGGBBAA` into RGBA.
pub fn parse_hex_color(text: &str) -> Result<[u8; 4], PanelError> {
    let hex = text.trim().trim_start_matches('#');
    let bad = || PanelError::InvalidArgument(format!("invalid colour '{text}'"));
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return Err(bad());
    }
    let mut out = [0, 0, 0, 255];
    for (i, slot) in out.iter_mut().enumerate().take(hex.len() / 2) {
        let pair = hex.get(i * 2..i * 2 + 2).ok_or_else(bad)?;
        *slot = u8::from_str_radix(pair, 16).map_err(|_| bad())?;
    }
    Ok(out)
}
