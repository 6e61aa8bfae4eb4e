//! Property-based tests for the panel error taxonomy.

use flightpanel_errors::{ErrorSeverity, PanelError};
use proptest::prelude::*;

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(200))]

    /// Transport errors are always retryable and never mean the panel is gone.
    #[test]
    fn prop_transport_errors_retryable(op in "[a-z_]{1,16}", msg in ".{0,32}") {
        let err = PanelError::transport(op, msg);
        prop_assert!(err.is_retryable());
        prop_assert!(!err.is_device_unavailable());
        prop_assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    /// Short-report errors echo both lengths in their message.
    #[test]
    fn prop_short_report_message(expected in 1usize..64, actual in 0usize..64) {
        let msg = PanelError::short_report(expected, actual).to_string();
        let expected_text = format!("expected {expected} bytes");
        let actual_text = format!("got {actual}");
        prop_assert!(msg.contains(&expected_text));
        prop_assert!(msg.contains(&actual_text));
    }

    /// NotFound errors render the ids as zero-padded hex.
    #[test]
    fn prop_not_found_hex_ids(vid: u16, pid: u16) {
        let msg = PanelError::not_found("FIP", vid, pid).to_string();
        let vid_text = format!("{vid:#06x}");
        let pid_text = format!("{pid:#06x}");
        prop_assert!(msg.contains(&vid_text));
        prop_assert!(msg.contains(&pid_text));
    }
}
