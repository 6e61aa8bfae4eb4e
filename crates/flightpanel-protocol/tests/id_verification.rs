//! Cross-reference tests for the panel VID/PID constants.
//!
//! If any assertion fails, the panels will no longer be found on the bus.
//! Update `ids.rs` only against a USB descriptor capture.

use flightpanel_protocol::{PanelKind, SAITEK_VENDOR_ID, product_ids};

#[test]
fn vendor_id_is_06a3() {
    assert_eq!(SAITEK_VENDOR_ID, 0x06A3, "Saitek VID changed");
}

#[test]
fn radio_pid_is_0d05() {
    assert_eq!(product_ids::RADIO, 0x0D05);
}

#[test]
fn multi_pid_is_0d06() {
    assert_eq!(product_ids::MULTI, 0x0D06);
}

#[test]
fn switch_pid_is_0d67() {
    assert_eq!(product_ids::SWITCH, 0x0D67);
}

#[test]
fn fip_pid_is_a2ae() {
    assert_eq!(product_ids::FIP, 0xA2AE);
}

#[test]
fn product_ids_are_distinct() {
    let mut pids: Vec<u16> = PanelKind::ALL.iter().map(|k| k.product_id()).collect();
    pids.sort_unstable();
    pids.dedup();
    assert_eq!(pids.len(), PanelKind::ALL.len());
}

#[test]
fn every_kind_uses_the_saitek_vendor() {
    for kind in PanelKind::ALL {
        assert_eq!(kind.vendor_id(), SAITEK_VENDOR_ID, "{kind}");
    }
}
