//! USB identity of the panel family.
//!
//! All four panels enumerate under the Saitek vendor code. Product IDs are
//! fixed per panel and are the only way the host tells the variants apart.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Saitek USB Vendor ID (now Logitech, the code was kept after the buyout).
pub const SAITEK_VENDOR_ID: u16 = 0x06A3;

/// Product IDs of the supported panels.
pub mod product_ids {
    /// Radio panel: four 5-digit displays, two dual encoders.
    pub const RADIO: u16 = 0x0D05;
    /// Multi panel: two 5-digit displays and eight annunciators.
    pub const MULTI: u16 = 0x0D06;
    /// Switch panel: landing gear lights and toggle bank.
    pub const SWITCH: u16 = 0x0D67;
    /// Flight Instrument Panel: 320x240 colour screen.
    pub const FIP: u16 = 0xA2AE;
}

/// One of the four panel variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PanelKind {
    Radio,
    Multi,
    Switch,
    #[serde(rename = "FIP", alias = "Fip", alias = "fip")]
    Fip,
}

impl PanelKind {
    /// Every kind, in the order the manager connects them.
    pub const ALL: [PanelKind; 4] = [
        PanelKind::Radio,
        PanelKind::Multi,
        PanelKind::Switch,
        PanelKind::Fip,
    ];

    pub fn vendor_id(self) -> u16 {
        SAITEK_VENDOR_ID
    }

    pub fn product_id(self) -> u16 {
        match self {
            PanelKind::Radio => product_ids::RADIO,
            PanelKind::Multi => product_ids::MULTI,
            PanelKind::Switch => product_ids::SWITCH,
            PanelKind::Fip => product_ids::FIP,
        }
    }

    /// Classify a (vendor, product) pair.
    pub fn from_ids(vendor_id: u16, product_id: u16) -> Option<Self> {
        if vendor_id != SAITEK_VENDOR_ID {
            return None;
        }
        match product_id {
            product_ids::RADIO => Some(PanelKind::Radio),
            product_ids::MULTI => Some(PanelKind::Multi),
            product_ids::SWITCH => Some(PanelKind::Switch),
            product_ids::FIP => Some(PanelKind::Fip),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PanelKind::Radio => "Radio",
            PanelKind::Multi => "Multi",
            PanelKind::Switch => "Switch",
            PanelKind::Fip => "FIP",
        }
    }

    /// Minimum length of an input report for this panel.
    pub fn input_report_len(self) -> usize {
        match self {
            PanelKind::Fip => crate::input::FIP_INPUT_LEN,
            _ => crate::input::PANEL_INPUT_LEN,
        }
    }

    /// Poller period in milliseconds: 10 Hz, or 20 Hz for FIP buttons.
    pub fn default_poll_interval_ms(self) -> u64 {
        match self {
            PanelKind::Fip => 50,
            _ => 100,
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PanelKind {
    type Err = flightpanel_errors::PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "radio" => Ok(PanelKind::Radio),
            "multi" => Ok(PanelKind::Multi),
            "switch" => Ok(PanelKind::Switch),
            "fip" => Ok(PanelKind::Fip),
            other => Err(flightpanel_errors::PanelError::InvalidArgument(format!(
                "unknown panel kind '{other}'"
            ))),
        }
    }
}
