//! Input report decoding and edge detection.
//!
//! Each panel has a fixed table of `(byte, mask, name)` signals. A report is
//! packed into an [`InputSnapshot`], a `u32` with one bit per signal, so a
//! diff is a single XOR and never allocates.
//!
//! Encoder signals are only set on the poll that saw a tick, so diffing
//! yields a press/release pulse per tick like any other button.

use std::time::SystemTime;

use flightpanel_errors::{PanelError, Result};
use serde::Serialize;

use crate::ids::PanelKind;

/// Interrupt report length for Radio, Multi and Switch.
pub const PANEL_INPUT_LEN: usize = 3;
/// Interrupt report length for the FIP buttons.
pub const FIP_INPUT_LEN: usize = 2;
/// Interrupt IN endpoint for Radio, Multi and Switch.
pub const PANEL_INPUT_ENDPOINT: u8 = 0x81;

/// One named input bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    pub byte: usize,
    pub mask: u8,
    pub name: &'static str,
}

const fn sig(byte: usize, mask: u8, name: &'static str) -> Signal {
    Signal { byte, mask, name }
}

pub const RADIO_SIGNALS: &[Signal] = &[
    sig(0, 0x01, "COM1_1"),
    sig(0, 0x02, "COM1_2"),
    sig(0, 0x04, "NAV1_1"),
    sig(0, 0x08, "NAV1_2"),
    sig(0, 0x10, "ADF_1"),
    sig(0, 0x20, "DME_1"),
    sig(0, 0x40, "XPDR_1"),
    sig(0, 0x80, "COM2_1"),
    sig(1, 0x01, "COM2_2"),
    sig(1, 0x02, "NAV2_1"),
    sig(1, 0x04, "NAV2_2"),
    sig(1, 0x08, "ADF_2"),
    sig(1, 0x10, "DME_2"),
    sig(1, 0x20, "XPDR_2"),
    sig(1, 0x40, "ACT_STBY_1"),
    sig(1, 0x80, "ACT_STBY_2"),
    sig(2, 0x01, "ENC1_INNER_CW"),
    sig(2, 0x02, "ENC1_INNER_CCW"),
    sig(2, 0x04, "ENC1_OUTER_CW"),
    sig(2, 0x08, "ENC1_OUTER_CCW"),
    sig(2, 0x10, "ENC2_INNER_CW"),
    sig(2, 0x20, "ENC2_INNER_CCW"),
    sig(2, 0x40, "ENC2_OUTER_CW"),
    sig(2, 0x80, "ENC2_OUTER_CCW"),
];

pub const MULTI_SIGNALS: &[Signal] = &[
    sig(0, 0x01, "ALT"),
    sig(0, 0x02, "VS"),
    sig(0, 0x04, "IAS"),
    sig(0, 0x08, "HDG"),
    sig(0, 0x10, "CRS"),
    sig(0, 0x20, "ENCODER_CW"),
    sig(0, 0x40, "ENCODER_CCW"),
    sig(0, 0x80, "AP"),
    sig(1, 0x01, "HDG_BTN"),
    sig(1, 0x02, "NAV_BTN"),
    sig(1, 0x04, "IAS_BTN"),
    sig(1, 0x08, "ALT_BTN"),
    sig(1, 0x10, "VS_BTN"),
    sig(1, 0x20, "APR_BTN"),
    sig(1, 0x40, "REV_BTN"),
    sig(1, 0x80, "THROTTLE_ARM"),
    sig(2, 0x01, "FLAPS_UP"),
    sig(2, 0x02, "FLAPS_DOWN"),
    sig(2, 0x04, "PITCH_DOWN"),
    sig(2, 0x08, "PITCH_UP"),
];

pub const SWITCH_SIGNALS: &[Signal] = &[
    sig(0, 0x01, "BAT"),
    sig(0, 0x02, "ALT"),
    sig(0, 0x04, "AVIONICS"),
    sig(0, 0x08, "FUEL"),
    sig(0, 0x10, "DEICE"),
    sig(0, 0x20, "PITOT"),
    sig(0, 0x40, "COWL"),
    sig(0, 0x80, "PANEL"),
    sig(1, 0x01, "BEACON"),
    sig(1, 0x02, "NAV"),
    sig(1, 0x04, "STROBE"),
    sig(1, 0x08, "TAXI"),
    sig(1, 0x10, "LANDING"),
    sig(1, 0x20, "OFF"),
    sig(1, 0x40, "R"),
    sig(1, 0x80, "L"),
    sig(2, 0x01, "BOTH"),
    sig(2, 0x02, "START"),
    sig(2, 0x04, "GEARUP"),
    sig(2, 0x08, "GEARDOWN"),
];

pub const FIP_SIGNALS: &[Signal] = &[
    sig(0, 0x01, "BUTTON_1"),
    sig(0, 0x02, "BUTTON_2"),
    sig(0, 0x04, "BUTTON_3"),
    sig(0, 0x08, "BUTTON_4"),
    sig(0, 0x10, "BUTTON_5"),
    sig(0, 0x20, "BUTTON_6"),
    sig(0, 0x40, "BUTTON_7"),
    sig(0, 0x80, "BUTTON_8"),
    sig(1, 0x01, "BUTTON_9"),
    sig(1, 0x02, "BUTTON_10"),
    sig(1, 0x04, "BUTTON_11"),
    sig(1, 0x08, "BUTTON_12"),
];

/// Signal table for a panel kind.
pub fn signals(kind: PanelKind) -> &'static [Signal] {
    match kind {
        PanelKind::Radio => RADIO_SIGNALS,
        PanelKind::Multi => MULTI_SIGNALS,
        PanelKind::Switch => SWITCH_SIGNALS,
        PanelKind::Fip => FIP_SIGNALS,
    }
}

/// Decoded state of every input signal of one panel.
///
/// Bit `i` holds signal `i` of the kind's table, so reserved report bits
/// never reach the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSnapshot {
    kind: PanelKind,
    bits: u32,
}

/// One input transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputEvent {
    pub panel: PanelKind,
    pub signal: &'static str,
    pub state: bool,
    pub timestamp: SystemTime,
}

impl InputSnapshot {
    /// All signals released.
    pub fn released(kind: PanelKind) -> Self {
        Self { kind, bits: 0 }
    }

    /// Decode a raw interrupt report.
    ///
    /// Extra trailing bytes are ignored; a short report is a
    /// [`PanelError::ProtocolShape`].
    pub fn parse(kind: PanelKind, report: &[u8]) -> Result<Self> {
        let expected = kind.input_report_len();
        if report.len() < expected {
            return Err(PanelError::short_report(expected, report.len()));
        }
        let bits = signals(kind)
            .iter()
            .enumerate()
            .filter(|(_, s)| report.get(s.byte).is_some_and(|b| b & s.mask != 0))
            .fold(0u32, |acc, (i, _)| acc | (1 << i));
        Ok(Self { kind, bits })
    }

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    /// Packed signal bits, in table order.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// State of a named signal, `None` if the panel has no such signal.
    pub fn get(&self, name: &str) -> Option<bool> {
        signals(self.kind)
            .iter()
            .position(|s| s.name == name)
            .map(|i| self.bits & (1 << i) != 0)
    }

    /// Every signal with its state, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        signals(self.kind)
            .iter()
            .enumerate()
            .map(move |(i, s)| (s.name, self.bits & (1 << i) != 0))
    }

    /// Names of the signals currently set.
    pub fn active(&self) -> Vec<&'static str> {
        self.iter().filter(|(_, on)| *on).map(|(name, _)| name).collect()
    }

    /// Push one event per signal that differs from `previous`.
    ///
    /// `out` is appended to, not cleared, so a poller can reuse one buffer.
    /// Returns the number of events pushed.
    pub fn diff_into(
        &self,
        previous: &InputSnapshot,
        timestamp: SystemTime,
        out: &mut Vec<InputEvent>,
    ) -> usize {
        let changed = self.bits ^ previous.bits;
        if changed == 0 {
            return 0;
        }
        let before = out.len();
        for (i, s) in signals(self.kind).iter().enumerate() {
            let bit = 1u32 << i;
            if changed & bit != 0 {
                out.push(InputEvent {
                    panel: self.kind,
                    signal: s.name,
                    state: self.bits & bit != 0,
                    timestamp,
                });
            }
        }
        out.len() - before
    }

    /// Allocating convenience wrapper over [`diff_into`](Self::diff_into).
    pub fn diff(&self, previous: &InputSnapshot, timestamp: SystemTime) -> Vec<InputEvent> {
        let mut out = Vec::new();
        self.diff_into(previous, timestamp, &mut out);
        out
    }
}
