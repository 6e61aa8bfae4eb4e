//! Output formatting for CLI responses

use anyhow::Error;
use colored::*;
use flightpanel_engine::{ManagerStatus, PanelStatus};
use flightpanel_framebuffer::ImageInfo;
use flightpanel_hid::PanelDeviceInfo;
use flightpanel_protocol::InputEvent;
use serde::Serialize;
use serde_json::json;

fn print_json(value: &serde_json::Value, what: &str) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format {what} as JSON: {e}"),
    }
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    print_json(
        &json!({
            "success": false,
            "error": error.to_string(),
        }),
        "error",
    );
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// Confirm a write. `sent` is echoed under the given key in JSON mode.
pub fn print_sent<T: Serialize>(panel: &str, key: &str, sent: &T, summary: &str, json: bool) {
    if json {
        let mut body = json!({ "success": true, "panel": panel });
        if let (Some(map), Ok(value)) = (body.as_object_mut(), serde_json::to_value(sent)) {
            map.insert(key.to_string(), value);
        }
        print_json(&body, "result");
    } else {
        println!("{} {} {}", "✓".green(), panel.bold(), summary);
    }
}

pub fn print_device_list(devices: &[PanelDeviceInfo], json: bool) {
    if json {
        print_json(&json!({ "success": true, "devices": devices }), "device list");
        return;
    }
    if devices.is_empty() {
        println!("{}", "No panels found".yellow());
        return;
    }
    println!("{}", "Attached Panels:".bold());
    for device in devices {
        println!(
            "  {} {} ({:04x}:{:04x}, bus {} address {}{})",
            "●".green(),
            device.display_name().bold(),
            device.vendor_id,
            device.product_id,
            device.bus,
            device.address,
            if device.is_mock() { ", mock" } else { "" }
        );
    }
}

fn print_panel_status(status: &PanelStatus) {
    let marker = if status.connected {
        "●".green()
    } else {
        "●".red()
    };
    print!("  {} {:<7} {}", marker, status.kind.name().bold(), status.state);
    if status.mock {
        print!(" {}", "(mock)".dimmed());
    }
    println!();
    if let Some(device) = &status.device {
        println!("      Device: {device}");
    }
    if let Some(err) = &status.last_error {
        println!("      {} {}", "Last error:".yellow(), err);
    }
}

pub fn print_status(status: &ManagerStatus, json: bool) {
    if json {
        print_json(&json!({ "success": true, "status": status }), "status");
        return;
    }
    println!("{}", "Panels:".bold());
    for panel in &status.panels {
        print_panel_status(panel);
    }
}

pub fn print_image_info(info: &ImageInfo, json: bool) {
    if json {
        print_json(&json!({ "success": true, "image": info }), "image info");
        return;
    }
    println!("  Source: {}x{}", info.width, info.height);
    println!("  Screen: {}x{}", info.fip_width, info.fip_height);
    println!(
        "  Resize: {}",
        if info.needs_resize { "yes".yellow() } else { "no".green() }
    );
}

/// One line per input event; JSON mode prints one object per line.
pub fn print_event(event: &InputEvent, json: bool) {
    if json {
        match serde_json::to_string(event) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("Failed to format event as JSON: {e}"),
        }
        return;
    }
    let state = if event.state { "ON ".green() } else { "OFF".red() };
    println!("  {:<6} {} {}", event.panel.name(), state, event.signal);
}
