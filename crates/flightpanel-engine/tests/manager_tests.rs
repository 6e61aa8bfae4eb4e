use std::sync::Arc;
use std::time::Duration;

use flightpanel_engine::{
    ConnectionOutcome, EngineConfig, LastDisplay, Panel, PanelManager, PanelState,
};
use flightpanel_errors::PanelError;
use flightpanel_framebuffer::Pattern;
use flightpanel_hid::mock::MockOpener;
use flightpanel_protocol::{GearLights, LedBank, MultiDisplay, PanelKind, RadioDisplay};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn fast_config() -> EngineConfig {
    EngineConfig {
        poll_interval_ms: 5,
        fip_poll_interval_ms: 5,
        ..EngineConfig::default()
    }
}

#[test]
fn connect_all_survives_a_missing_panel() -> TestResult {
    let opener = MockOpener::new();
    opener.unplug(PanelKind::Fip);
    let mut manager = PanelManager::new(Arc::new(opener.clone()), EngineConfig::default());

    let status = manager.connect_all();
    assert_eq!(status.connected_count(), 3);

    let fip = status.get(PanelKind::Fip).ok_or("fip missing from status")?;
    assert!(!fip.connected);
    assert_eq!(fip.state, PanelState::Disconnected);
    assert!(fip.last_error.as_deref().is_some_and(|e| e.contains("not found")));
    assert!(matches!(
        manager.outcome(PanelKind::Fip),
        Some(ConnectionOutcome::Failed(PanelError::NotFound { .. }))
    ));

    // The others still work.
    manager.set_switch_lights(GearLights::GEAR_UP)?;
    assert!(matches!(
        manager.show_fip_pattern(Pattern::TestPattern),
        Err(PanelError::NotConnected(_))
    ));
    Ok(())
}

#[test]
fn mock_fallback_connects_everything() -> TestResult {
    let opener = MockOpener::new();
    for kind in PanelKind::ALL {
        opener.unplug(kind);
    }
    let mut manager = PanelManager::new(Arc::new(opener), EngineConfig::headless());
    let status = manager.connect_all();
    assert_eq!(status.connected_count(), 4);
    assert!(status.panels.iter().all(|p| p.mock));
    assert!(matches!(
        manager.outcome(PanelKind::Radio),
        Some(ConnectionOutcome::Connected { mock: true })
    ));
    Ok(())
}

#[test]
fn status_reports_last_display() -> TestResult {
    let mut manager = PanelManager::mock(EngineConfig::default());
    manager.connect_all();
    manager.set_radio_display(&RadioDisplay::new("118.00", "118.50", "121.30", "121.90"))?;
    manager.set_multi_display(&MultiDisplay::new("250", "-500", LedBank::NONE))?;
    manager.set_multi_leds(LedBank::AP | LedBank::ALT)?;
    manager.show_fip_pattern(Pattern::ColorBars)?;

    let status = manager.status();
    let radio = status.get(PanelKind::Radio).and_then(|p| p.display.clone());
    assert!(matches!(radio, Some(LastDisplay::Radio(d)) if d.com2_standby == "121.90"));
    let multi = status.get(PanelKind::Multi).and_then(|p| p.display.clone());
    assert!(matches!(multi, Some(LastDisplay::Multi(d)) if d.leds == (LedBank::AP | LedBank::ALT)));

    let json = serde_json::to_value(&status)?;
    assert_eq!(json["panels"][0]["kind"], "Radio");
    assert_eq!(json["panels"][0]["display"]["com1Active"], "118.00");
    assert_eq!(json["panels"][1]["display"]["bottomRow"], "-500");
    assert_eq!(json["panels"][3]["kind"], "FIP");
    assert_eq!(json["panels"][3]["display"]["source"], "pattern");
    assert_eq!(json["panels"][3]["state"], "polling");
    Ok(())
}

#[test]
fn merged_events_relay_every_panel() -> TestResult {
    let opener = MockOpener::new();
    opener.transport(PanelKind::Radio).queue_read(vec![0x01, 0x00, 0x00]);
    opener.transport(PanelKind::Fip).queue_read(vec![0x00, 0x08]);

    let mut manager = PanelManager::new(Arc::new(opener), fast_config());
    manager.connect(PanelKind::Radio)?;
    manager.connect(PanelKind::Fip)?;
    let merged = manager.merged_events();

    let mut seen = Vec::new();
    while seen.len() < 2 {
        let event = merged.recv_timeout(Duration::from_secs(2))?;
        seen.push((event.panel, event.signal));
    }
    seen.sort();
    assert_eq!(
        seen,
        vec![(PanelKind::Radio, "COM1_1"), (PanelKind::Fip, "BUTTON_12")]
    );

    manager.close_all();
    assert!(merged.recv_timeout(Duration::from_secs(2)).is_err());
    Ok(())
}

#[test]
fn panels_are_reachable_through_the_sum_type() -> TestResult {
    let mut manager = PanelManager::mock(EngineConfig::default());
    manager.connect(PanelKind::Switch)?;
    match manager.panel_mut(PanelKind::Switch) {
        Some(Panel::Switch(switch)) => switch.set_gear_transition()?,
        other => return Err(format!("unexpected panel: {other:?}").into()),
    }
    assert_eq!(
        manager.switch_mut()?.lights(),
        Some(GearLights::GEAR_TRANSITION)
    );
    manager.close(PanelKind::Switch);
    assert_eq!(
        manager.panel(PanelKind::Switch).map(Panel::state),
        Some(PanelState::Disconnected)
    );
    Ok(())
}
