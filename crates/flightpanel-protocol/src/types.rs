//! Display models and LED bitmaps.

use core::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Text for the four Radio panel fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadioDisplay {
    pub com1_active: String,
    pub com1_standby: String,
    pub com2_active: String,
    pub com2_standby: String,
}

impl RadioDisplay {
    pub fn new(
        com1_active: impl Into<String>,
        com1_standby: impl Into<String>,
        com2_active: impl Into<String>,
        com2_standby: impl Into<String>,
    ) -> Self {
        Self {
            com1_active: com1_active.into(),
            com1_standby: com1_standby.into(),
            com2_active: com2_active.into(),
            com2_standby: com2_standby.into(),
        }
    }

    /// Copy with every field passed through [`format_frequency`].
    pub fn formatted(&self) -> Self {
        Self {
            com1_active: format_frequency(&self.com1_active),
            com1_standby: format_frequency(&self.com1_standby),
            com2_active: format_frequency(&self.com2_active),
            com2_standby: format_frequency(&self.com2_standby),
        }
    }
}

/// Multi panel rows plus the annunciator byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultiDisplay {
    pub top_row: String,
    pub bottom_row: String,
    pub leds: LedBank,
}

impl MultiDisplay {
    pub fn new(top_row: impl Into<String>, bottom_row: impl Into<String>, leds: LedBank) -> Self {
        Self {
            top_row: top_row.into(),
            bottom_row: bottom_row.into(),
            leds,
        }
    }

    /// Copy with both rows passed through [`format_multi_value`].
    pub fn formatted(&self) -> Self {
        Self {
            top_row: format_multi_value(&self.top_row),
            bottom_row: format_multi_value(&self.bottom_row),
            leds: self.leds,
        }
    }
}

/// Multi panel annunciator bitmap, bit 0 = AP through bit 7 = REV.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedBank(u8);

impl LedBank {
    pub const NONE: Self = Self(0x00);
    pub const AP: Self = Self(0x01);
    pub const HDG: Self = Self(0x02);
    pub const NAV: Self = Self(0x04);
    pub const IAS: Self = Self(0x08);
    pub const ALT: Self = Self(0x10);
    pub const VS: Self = Self(0x20);
    pub const APR: Self = Self(0x40);
    pub const REV: Self = Self(0x80);
    pub const ALL: Self = Self(0xFF);

    const NAMES: [(&'static str, LedBank); 8] = [
        ("AP", Self::AP),
        ("HDG", Self::HDG),
        ("NAV", Self::NAV),
        ("IAS", Self::IAS),
        ("ALT", Self::ALT),
        ("VS", Self::VS),
        ("APR", Self::APR),
        ("REV", Self::REV),
    ];

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn set(&mut self, led: Self, on: bool) {
        if on {
            self.0 |= led.0;
        } else {
            self.0 &= !led.0;
        }
    }

    /// Look up one annunciator by its label, case-insensitively.
    pub fn by_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(label, _)| label.eq_ignore_ascii_case(name))
            .map(|&(_, led)| led)
    }

    /// Labels of the lit annunciators, in bit order.
    pub fn lit(self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(_, led)| self.contains(*led))
            .map(|&(label, _)| label)
            .collect()
    }
}

impl BitOr for LedBank {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for LedBank {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Switch panel landing gear bitmap. Bits 6 and 7 are always clear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct GearLights(u8);

impl GearLights {
    const MASK: u8 = 0x3F;

    pub const GREEN_N: Self = Self(0x01);
    pub const GREEN_L: Self = Self(0x02);
    pub const GREEN_R: Self = Self(0x04);
    pub const RED_N: Self = Self(0x08);
    pub const RED_L: Self = Self(0x10);
    pub const RED_R: Self = Self(0x20);

    pub const OFF: Self = Self(0x00);
    /// All three greens: gear down and locked.
    pub const GEAR_DOWN: Self = Self(0x07);
    /// All three reds: gear up.
    pub const GEAR_UP: Self = Self(0x38);
    /// Red and green together show yellow: gear in transit.
    pub const GEAR_TRANSITION: Self = Self(0x3F);

    /// Build from raw bits, clearing the unused top two.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl From<u8> for GearLights {
    fn from(bits: u8) -> Self {
        Self::from_bits(bits)
    }
}

impl From<GearLights> for u8 {
    fn from(lights: GearLights) -> Self {
        lights.0
    }
}

impl BitOr for GearLights {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Per-light view of [`GearLights`], the shape front-ends exchange.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LandingGearLights {
    pub green_n: bool,
    pub green_l: bool,
    pub green_r: bool,
    pub red_n: bool,
    pub red_l: bool,
    pub red_r: bool,
}

impl From<LandingGearLights> for GearLights {
    fn from(s: LandingGearLights) -> Self {
        let pairs = [
            (s.green_n, GearLights::GREEN_N),
            (s.green_l, GearLights::GREEN_L),
            (s.green_r, GearLights::GREEN_R),
            (s.red_n, GearLights::RED_N),
            (s.red_l, GearLights::RED_L),
            (s.red_r, GearLights::RED_R),
        ];
        pairs
            .into_iter()
            .filter(|(on, _)| *on)
            .fold(GearLights::OFF, |acc, (_, light)| acc | light)
    }
}

impl From<GearLights> for LandingGearLights {
    fn from(l: GearLights) -> Self {
        Self {
            green_n: l.contains(GearLights::GREEN_N),
            green_l: l.contains(GearLights::GREEN_L),
            green_r: l.contains(GearLights::GREEN_R),
            red_n: l.contains(GearLights::RED_N),
            red_l: l.contains(GearLights::RED_L),
            red_r: l.contains(GearLights::RED_R),
        }
    }
}

/// Positions of the Switch panel toggles, decoded from its input report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SwitchState {
    pub master_bat: bool,
    pub master_alt: bool,
    pub avionics: bool,
    pub fuel_pump: bool,
    pub de_ice: bool,
    pub pitot_heat: bool,
    pub cowl: bool,
    pub panel: bool,
    pub beacon: bool,
    pub nav: bool,
    pub strobe: bool,
    pub taxi: bool,
    pub landing: bool,
    pub mag_off: bool,
    pub mag_right: bool,
    pub mag_left: bool,
    pub mag_both: bool,
    pub mag_start: bool,
    pub gear_up: bool,
    pub gear_down: bool,
}

impl SwitchState {
    /// Decode a 3-byte Switch panel report.
    pub fn parse(report: &[u8]) -> flightpanel_errors::Result<Self> {
        let snap = crate::input::InputSnapshot::parse(crate::PanelKind::Switch, report)?;
        Ok(Self::from(&snap))
    }
}

impl From<&crate::input::InputSnapshot> for SwitchState {
    fn from(snap: &crate::input::InputSnapshot) -> Self {
        let on = |name| snap.get(name).unwrap_or(false);
        Self {
            master_bat: on("BAT"),
            master_alt: on("ALT"),
            avionics: on("AVIONICS"),
            fuel_pump: on("FUEL"),
            de_ice: on("DEICE"),
            pitot_heat: on("PITOT"),
            cowl: on("COWL"),
            panel: on("PANEL"),
            beacon: on("BEACON"),
            nav: on("NAV"),
            strobe: on("STROBE"),
            taxi: on("TAXI"),
            landing: on("LANDING"),
            mag_off: on("OFF"),
            mag_right: on("R"),
            mag_left: on("L"),
            mag_both: on("BOTH"),
            mag_start: on("START"),
            gear_up: on("GEARUP"),
            gear_down: on("GEARDOWN"),
        }
    }
}

fn is_display_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-' | ' ')
}

/// Strip a frequency string down to characters the Radio display can show.
///
/// Padding spaces and minus signs survive. Length is left alone; the codec
/// truncates at five glyphs.
pub fn format_frequency(freq: &str) -> String {
    freq.chars().filter(|&c| is_display_char(c)).collect()
}

/// Strip a Multi panel value the same way, keeping at most five characters.
pub fn format_multi_value(value: &str) -> String {
    value.chars().filter(|&c| is_display_char(c)).take(5).collect()
}
