//! End-to-end panel behaviour against the scripted mock transport.

use std::sync::Arc;
use std::time::{Duration, Instant};

use flightpanel_engine::{EngineConfig, FipPanel, MultiPanel, PanelState, RadioPanel, SwitchPanel};
use flightpanel_errors::PanelError;
use flightpanel_framebuffer::FipFrame;
use flightpanel_hid::mock::MockOpener;
use flightpanel_hid::{OP_INTERRUPT_READ, TransportError};
use flightpanel_protocol::{LedBank, MultiDisplay, PanelKind, RadioDisplay};

type TestResult = Result<(), Box<dyn std::error::Error>>;

const WAIT: Duration = Duration::from_secs(2);

fn fast_config() -> EngineConfig {
    EngineConfig {
        poll_interval_ms: 5,
        fip_poll_interval_ms: 5,
        ..EngineConfig::default()
    }
}

#[test]
fn radio_act_stby_press_and_release() -> TestResult {
    let opener = MockOpener::new();
    let mock = opener.transport(PanelKind::Radio);
    mock.queue_read(vec![0x00, 0x40, 0x00]);
    mock.queue_read(vec![0x00, 0x40, 0x00]);
    mock.queue_read(vec![0x00, 0x00, 0x00]);

    let mut radio = RadioPanel::new(Arc::new(opener.clone()), fast_config());
    radio.connect()?;
    let events = radio.input_events()?;

    let press = events.next_timeout(WAIT).ok_or("no press event")?;
    assert_eq!((press.panel, press.signal, press.state), (PanelKind::Radio, "ACT_STBY_1", true));

    let release = events.next_timeout(WAIT).ok_or("no release event")?;
    assert_eq!((release.signal, release.state), ("ACT_STBY_1", false));
    assert!(release.timestamp >= press.timestamp);

    // Unscripted reads are all zeros, so nothing else changes.
    assert!(events.next_timeout(Duration::from_millis(50)).is_none());
    radio.close();
    Ok(())
}

#[test]
fn radio_display_twice_sends_identical_reports() -> TestResult {
    let opener = MockOpener::new();
    let mut radio = RadioPanel::new(Arc::new(opener.clone()), EngineConfig::default());
    radio.connect()?;
    let display = RadioDisplay::new("118.00", "118.50", "121.30", "121.90");
    radio.set_display(&display)?;
    radio.set_display(&display)?;

    let writes = opener.transport(PanelKind::Radio).writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0], writes[1]);
    assert_eq!(writes[0].payload.len(), 22);
    assert_eq!(&writes[0].payload[20..], &[0x00, 0x00]);
    assert_eq!(&writes[0].payload[..5], &[0x01, 0x01, 0xD8, 0x00, 0x00]);
    Ok(())
}

#[test]
fn multi_display_with_ap_led() -> TestResult {
    let opener = MockOpener::new();
    let mut multi = MultiPanel::new(Arc::new(opener.clone()), EngineConfig::default());
    multi.connect()?;
    multi.set_display(&MultiDisplay::new("250", "3000", LedBank::AP))?;

    let payload = opener
        .transport(PanelKind::Multi)
        .last_write()
        .map(|w| w.payload)
        .ok_or("nothing written")?;
    assert_eq!(
        payload,
        vec![0x02, 0x05, 0x00, 0x0F, 0x0F, 0x03, 0x00, 0x00, 0x00, 0x0F, 0x01, 0xFF]
    );
    Ok(())
}

#[test]
fn switch_gear_down_is_one_byte() -> TestResult {
    let opener = MockOpener::new();
    let mut switch = SwitchPanel::new(Arc::new(opener.clone()), EngineConfig::default());
    switch.connect()?;
    switch.set_gear_down()?;
    let write = opener.transport(PanelKind::Switch).last_write().ok_or("nothing written")?;
    assert_eq!(write.payload, vec![0x07]);
    Ok(())
}

#[test]
fn switch_state_tracks_the_poller() -> TestResult {
    let opener = MockOpener::new();
    let mock = opener.transport(PanelKind::Switch);
    mock.queue_read(vec![0x05, 0x02, 0x08]);

    let mut switch = SwitchPanel::new(Arc::new(opener.clone()), fast_config());
    switch.connect()?;
    let events = switch.input_events()?;
    let mut seen = Vec::new();
    while let Some(event) = events.next_timeout(Duration::from_millis(200)) {
        seen.push(event.signal);
        if seen.len() == 4 {
            break;
        }
    }
    assert_eq!(seen, vec!["BAT", "AVIONICS", "NAV", "GEARDOWN"]);

    let state = switch.switch_state();
    assert!(state.master_bat && state.avionics && state.nav && state.gear_down);
    assert!(!state.gear_up);
    Ok(())
}

#[test]
fn fip_solid_red_frame() -> TestResult {
    let opener = MockOpener::new();
    let mut fip = FipPanel::new(Arc::new(opener.clone()), EngineConfig::default());
    fip.connect()?;
    fip.send_frame(FipFrame::solid([255, 0, 0]))?;

    let write = opener.transport(PanelKind::Fip).last_write().ok_or("nothing written")?;
    assert_eq!(write.payload.len(), 230_400);
    assert!(write.payload.chunks_exact(3).all(|px| px == [0xFF, 0x00, 0x00]));
    Ok(())
}

#[test]
fn read_failures_escalate_to_disconnected() -> TestResult {
    let opener = MockOpener::new();
    let mock = opener.transport(PanelKind::Multi);
    for _ in 0..3 {
        mock.queue_read_failure(TransportError::Timeout {
            operation: OP_INTERRUPT_READ,
            timeout_ms: 100,
        });
    }

    let mut multi = MultiPanel::new(Arc::new(opener.clone()), fast_config());
    multi.connect()?;
    let events = multi.input_events()?;

    // The stream ends once the poller gives up.
    assert_eq!(events.count(), 0);
    assert_eq!(multi.state(), PanelState::Disconnected);
    assert!(matches!(
        multi.set_leds(LedBank::AP),
        Err(PanelError::NotConnected(_))
    ));

    // A fresh connect opens a new session with a new stream.
    multi.connect()?;
    assert_eq!(multi.state(), PanelState::Polling);
    let _events = multi.input_events()?;
    multi.set_leds(LedBank::AP)?;
    Ok(())
}

#[test]
fn set_display_surfaces_transport_errors_once() -> TestResult {
    let opener = MockOpener::new();
    let mock = opener.transport(PanelKind::Radio);
    let mut radio = RadioPanel::new(Arc::new(opener.clone()), EngineConfig::default());
    radio.connect()?;

    mock.fail_next_write(TransportError::Io {
        operation: "control_write",
        message: "pipe error".to_string(),
    });
    let display = RadioDisplay::new("1", "2", "3", "4");
    let err = radio.set_display(&display);
    assert!(matches!(err, Err(PanelError::TransportIo { .. })));
    assert!(radio.last_report().is_none());
    assert_eq!(radio.state(), PanelState::Polling);

    radio.set_display(&display)?;
    assert!(radio.last_report().is_some());
    Ok(())
}

#[test]
fn close_wakes_a_slow_poller() -> TestResult {
    let config = EngineConfig {
        poll_interval_ms: 10_000,
        ..EngineConfig::default()
    };
    let mut radio = RadioPanel::new(Arc::new(MockOpener::new()), config);
    radio.connect()?;
    let started = Instant::now();
    radio.close();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(radio.state(), PanelState::Disconnected);
    Ok(())
}

#[test]
fn unread_events_keep_only_the_newest() -> TestResult {
    let opener = MockOpener::new();
    let mock = opener.transport(PanelKind::Fip);
    // Twelve presses, then twelve releases: 24 events into a buffer of 4.
    let mut pressed = 0u16;
    for bit in 0..12 {
        pressed |= 1 << bit;
        mock.queue_read(pressed.to_le_bytes().to_vec());
    }
    mock.queue_read(vec![0x00, 0x00]);

    let config = EngineConfig {
        event_buffer: 4,
        ..fast_config()
    };
    let mut fip = FipPanel::new(Arc::new(opener.clone()), config);
    fip.connect()?;
    let events = fip.input_events()?;

    let deadline = Instant::now() + WAIT;
    while mock.pending_reads() > 0 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    std::thread::sleep(Duration::from_millis(50));
    fip.close();

    let kept: Vec<_> = events.map(|e| (e.signal, e.state)).collect();
    assert_eq!(kept.len(), 4);
    assert!(kept.iter().all(|(_, state)| !state));
    assert_eq!(kept.last().map(|(s, _)| *s), Some("BUTTON_12"));
    Ok(())
}
