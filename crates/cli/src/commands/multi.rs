//! Multi panel rows and annunciators

use anyhow::Result;
use flightpanel_protocol::{LedBank, MultiDisplay, PanelKind};

use crate::commands::{MultiArgs, PanelContext};
use crate::error::CliError;
use crate::output;

/// Parse `AP,HDG` style names, or a numeric bitmap (`0x21`, `33`).
pub fn parse_leds(text: &str) -> Result<LedBank, CliError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(LedBank::NONE);
    }
    let numeric = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => trimmed.parse::<u8>().ok(),
    };
    if let Some(bits) = numeric {
        return Ok(LedBank::from_bits(bits));
    }

    let mut leds = LedBank::NONE;
    for name in trimmed.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        leds |= LedBank::by_name(name).ok_or_else(|| {
            CliError::ValidationError(format!(
                "unknown LED '{name}' (expected AP, HDG, NAV, IAS, ALT, VS, APR or REV)"
            ))
        })?;
    }
    Ok(leds)
}

pub fn execute(args: &MultiArgs, ctx: &PanelContext) -> Result<()> {
    let leds = args.leds.as_deref().map(parse_leds).transpose()?;
    let mut manager = ctx.connect(PanelKind::Multi)?;
    let multi = manager.multi_mut()?;

    if args.leds_only {
        let leds = leds.unwrap_or_default();
        multi.set_leds(leds)?;
        let summary = format!("LEDs {}", leds.lit().join(","));
        output::print_sent("Multi", "leds", &leds, &summary, ctx.json);
        return Ok(());
    }

    let display = MultiDisplay::new(&args.top, &args.bottom, leds.unwrap_or_default());
    multi.set_display(&display)?;
    let sent = multi.last_display().cloned().unwrap_or_default();
    let summary = format!(
        "{} / {}  LEDs {}",
        sent.top_row,
        sent.bottom_row,
        sent.leds.lit().join(",")
    );
    output::print_sent("Multi", "display", &sent, &summary, ctx.json);
    Ok(())
}
