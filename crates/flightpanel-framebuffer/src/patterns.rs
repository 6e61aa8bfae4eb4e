//! Generated test frames.

use core::str::FromStr;
use std::path::{Path, PathBuf};

use flightpanel_errors::{PanelError, Result};
use flightpanel_protocol::{FIP_HEIGHT, FIP_WIDTH};
use image::{Rgb, RgbImage};

use crate::frame::FipFrame;
use crate::loader::save_png;
use crate::options::parse_hex_color;

const BARS: [[u8; 3]; 8] = [
    [255, 255, 255],
    [255, 255, 0],
    [0, 255, 255],
    [0, 128, 0],
    [255, 0, 255],
    [255, 0, 0],
    [0, 0, 255],
    [0, 0, 0],
];

const BEZEL: [u8; 3] = [169, 169, 169];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Red ramps left to right, green top to bottom, blue fixed at 128.
    TestPattern,
    /// Eight vertical bars: white, yellow, cyan, green, magenta, red, blue, black.
    ColorBars,
    /// Like the test pattern but blue is the inverse of red.
    Gradient,
    /// Grey disc on black, a blank instrument face.
    InstrumentBackground,
    Solid([u8; 3]),
}

fn ramp(pos: u32, extent: u32) -> u8 {
    u8::try_from(pos * 255 / extent).unwrap_or(u8::MAX)
}

impl Pattern {
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::TestPattern => "test",
            Pattern::ColorBars => "bars",
            Pattern::Gradient => "gradient",
            Pattern::InstrumentBackground => "instrument",
            Pattern::Solid(_) => "solid",
        }
    }

    fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        match *self {
            Pattern::TestPattern => [ramp(x, FIP_WIDTH), ramp(y, FIP_HEIGHT), 128],
            Pattern::Gradient => {
                let r = ramp(x, FIP_WIDTH);
                [r, ramp(y, FIP_HEIGHT), 255 - r]
            }
            Pattern::ColorBars => {
                let bar_width = FIP_WIDTH / BARS.len() as u32;
                let bar = usize::try_from(x / bar_width)
                    .unwrap_or(usize::MAX)
                    .min(BARS.len() - 1);
                BARS[bar]
            }
            Pattern::InstrumentBackground => {
                let dx = i64::from(x) - i64::from(FIP_WIDTH / 2);
                let dy = i64::from(y) - i64::from(FIP_HEIGHT / 2);
                let radius = i64::from(FIP_WIDTH / 3);
                if dx * dx + dy * dy <= radius * radius {
                    BEZEL
                } else {
                    [0, 0, 0]
                }
            }
            Pattern::Solid(rgb) => rgb,
        }
    }

    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(FIP_WIDTH, FIP_HEIGHT, |x, y| Rgb(self.pixel(x, y)))
    }

    pub fn render(&self) -> FipFrame {
        if let Pattern::Solid(rgb) = self {
            return FipFrame::solid(*rgb);
        }
        FipFrame::from_rgb_image(self.to_image()).unwrap_or_default()
    }
}

impl FromStr for Pattern {
    type Err = PanelError;

    /// `test`, `bars`, `gradient`, `instrument`, a colour name, or a hex colour.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let pattern = match lower.as_str() {
            "test" | "test-pattern" => Pattern::TestPattern,
            "bars" | "color-bars" => Pattern::ColorBars,
            "gradient" => Pattern::Gradient,
            "instrument" => Pattern::InstrumentBackground,
            "black" => Pattern::Solid([0, 0, 0]),
            "white" => Pattern::Solid([255, 255, 255]),
            "red" => Pattern::Solid([255, 0, 0]),
            "green" => Pattern::Solid([0, 255, 0]),
            "blue" => Pattern::Solid([0, 0, 255]),
            other => {
                let [r, g, b, _] = parse_hex_color(other).map_err(|_| {
                    PanelError::InvalidArgument(format!(
                        "unknown pattern '{s}' (expected test, bars, gradient, instrument, a colour name or #RRGGBB)"
                    ))
                })?;
                Pattern::Solid([r, g, b])
            }
        };
        Ok(pattern)
    }
}

/// Write the four generated patterns as PNGs into `dir`.
pub fn generate_test_images(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let set = [
        ("test_pattern.png", Pattern::TestPattern),
        ("color_bars.png", Pattern::ColorBars),
        ("gradient.png", Pattern::Gradient),
        ("instrument_bg.png", Pattern::InstrumentBackground),
    ];
    let mut written = Vec::with_capacity(set.len());
    for (file, pattern) in set {
        let path = dir.join(file);
        save_png(&pattern.render(), &path)?;
        written.push(path);
    }
    Ok(written)
}
