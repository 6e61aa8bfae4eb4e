//! Output report builders and control-transfer parameters.
//!
//! Every display or LED write, the FIP framebuffer included, is a single
//! HID SET_REPORT control transfer described by [`DISPLAY_REQUEST`].

use crate::segment::{FIELD_LEN, Field, MULTI_CODEC, RADIO_CODEC};
use crate::types::{GearLights, LedBank, MultiDisplay, RadioDisplay};

/// Radio output report length.
pub const RADIO_REPORT_LEN: usize = 22;
/// Multi output report length.
pub const MULTI_REPORT_LEN: usize = 12;
/// Switch output report length.
pub const SWITCH_REPORT_LEN: usize = 1;

/// FIP screen width in pixels.
pub const FIP_WIDTH: u32 = 320;
/// FIP screen height in pixels.
pub const FIP_HEIGHT: u32 = 240;
/// FIP framebuffer payload: 320 x 240 pixels, 3 bytes each.
pub const FIP_FRAME_LEN: usize = (FIP_WIDTH * FIP_HEIGHT * 3) as usize;

/// Byte offset of the Multi LED bitmap.
pub const MULTI_LED_OFFSET: usize = 10;
/// Trailing byte of every Multi report.
pub const MULTI_SENTINEL: u8 = 0xFF;

/// bmRequestType: host to device, class, interface recipient.
pub const REQUEST_TYPE_CLASS_INTERFACE_OUT: u8 = 0x21;
/// bRequest: HID SET_REPORT.
pub const HID_SET_REPORT: u8 = 0x09;
/// wValue: report type 3, report ID 0.
pub const REPORT_VALUE: u16 = 0x0300;
/// wIndex: interface 0.
pub const REPORT_INDEX: u16 = 0;

/// Setup parameters of one control transfer; the payload travels separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlRequest {
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
}

/// The control transfer used for every display, LED and framebuffer write.
pub const DISPLAY_REQUEST: ControlRequest = ControlRequest {
    request_type: REQUEST_TYPE_CLASS_INTERFACE_OUT,
    request: HID_SET_REPORT,
    value: REPORT_VALUE,
    index: REPORT_INDEX,
};

/// Build the 22-byte Radio report.
///
/// # Layout
/// - `[0..5)` COM1 active
/// - `[5..10)` COM1 standby
/// - `[10..15)` COM2 active
/// - `[15..20)` COM2 standby
/// - `[20..22)` zero padding
pub fn build_radio_report(display: &RadioDisplay) -> [u8; RADIO_REPORT_LEN] {
    let fields = [
        RADIO_CODEC.encode(&display.com1_active),
        RADIO_CODEC.encode(&display.com1_standby),
        RADIO_CODEC.encode(&display.com2_active),
        RADIO_CODEC.encode(&display.com2_standby),
    ];
    let mut out = [0u8; RADIO_REPORT_LEN];
    for (chunk, field) in out.chunks_exact_mut(FIELD_LEN).zip(fields.iter()) {
        chunk.copy_from_slice(field);
    }
    out
}

/// Build the 12-byte Multi report.
///
/// # Layout
/// - `[0..5)` top row
/// - `[5..10)` bottom row
/// - `[10]` LED bitmap
/// - `[11]` `0xFF`
pub fn build_multi_report(display: &MultiDisplay) -> [u8; MULTI_REPORT_LEN] {
    build_multi_report_from_fields(
        &MULTI_CODEC.encode(&display.top_row),
        &MULTI_CODEC.encode(&display.bottom_row),
        display.leds,
    )
}

/// Assemble a Multi report from already-encoded rows.
pub fn build_multi_report_from_fields(
    top: &Field,
    bottom: &Field,
    leds: LedBank,
) -> [u8; MULTI_REPORT_LEN] {
    let mut out = [0u8; MULTI_REPORT_LEN];
    out[..FIELD_LEN].copy_from_slice(top);
    out[FIELD_LEN..MULTI_LED_OFFSET].copy_from_slice(bottom);
    out[MULTI_LED_OFFSET] = leds.bits();
    out[MULTI_REPORT_LEN - 1] = MULTI_SENTINEL;
    out
}

/// A Multi report with both rows blank.
pub fn blank_multi_report(leds: LedBank) -> [u8; MULTI_REPORT_LEN] {
    let blank = MULTI_CODEC.encode("");
    build_multi_report_from_fields(&blank, &blank, leds)
}

/// Replace the LED byte of an existing Multi report, keeping the rows.
pub fn with_multi_leds(report: &[u8; MULTI_REPORT_LEN], leds: LedBank) -> [u8; MULTI_REPORT_LEN] {
    let mut out = *report;
    out[MULTI_LED_OFFSET] = leds.bits();
    out
}

/// Build the 1-byte Switch report.
pub fn build_switch_report(lights: GearLights) -> [u8; SWITCH_REPORT_LEN] {
    [lights.bits()]
}
