//! Tests of the transport contract as seen through the mock backing.

use flightpanel_hid::mock::{MockOpener, MockTransport};
use flightpanel_hid::{PanelDeviceInfo, PanelOpener, Transport};
use flightpanel_protocol::{DISPLAY_REQUEST, PanelKind};
use proptest::prelude::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(200))]

    /// The mock records every payload byte-for-byte with its setup packet.
    #[test]
    fn prop_mock_records_payloads(payload in proptest::collection::vec(any::<u8>(), 0..64)) {
        let observer = MockTransport::new(PanelKind::Multi);
        let mut transport = observer.clone();
        transport.send(&DISPLAY_REQUEST, &payload)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let record = observer.last_write().ok_or_else(|| TestCaseError::fail("no write"))?;
        prop_assert_eq!(record.request_type, 0x21);
        prop_assert_eq!(record.request, 0x09);
        prop_assert_eq!(record.value, 0x0300);
        prop_assert_eq!(record.index, 0);
        prop_assert_eq!(record.payload, payload);
    }

    /// Unscripted reads synthesize exactly the requested number of zeros.
    #[test]
    fn prop_mock_synthesizes_zero_reads(len in 0usize..16) {
        let mut transport = MockTransport::new(PanelKind::Fip);
        let data = transport.interrupt_read(0x81, len)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(data, vec![0u8; len]);
    }
}

#[test]
fn opened_mock_panel_writes_through_to_shared_log() -> TestResult {
    let opener = MockOpener::new();
    let mut opened = opener.open(PanelKind::Switch)?;
    assert!(opened.info.is_mock());
    assert_eq!(opened.input_endpoint, 0x81);

    opened.transport.send(&DISPLAY_REQUEST, &[0x3F])?;
    let writes = opener.transport(PanelKind::Switch).writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].payload, vec![0x3F]);
    Ok(())
}

#[test]
fn device_info_serializes_for_front_ends() -> TestResult {
    let info = PanelDeviceInfo::mock(PanelKind::Fip);
    let json = serde_json::to_value(&info)?;
    assert_eq!(json["kind"], "FIP");
    assert_eq!(json["product_id"], 0xA2AE);
    assert_eq!(json["backend"], "mock");
    let back: PanelDeviceInfo = serde_json::from_value(json)?;
    assert_eq!(back, info);
    Ok(())
}
