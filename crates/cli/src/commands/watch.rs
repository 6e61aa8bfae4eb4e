//! Stream input events from one panel

use std::time::{Duration, Instant};

use anyhow::Result;
use flightpanel_engine::Panel;
use tracing::debug;

use crate::commands::{PanelContext, WatchArgs};
use crate::error::CliError;
use crate::output;

const TICK: Duration = Duration::from_millis(100);

pub fn execute(args: &WatchArgs, ctx: &PanelContext) -> Result<()> {
    let mut manager = ctx.connect(args.panel)?;
    let deadline = args.seconds.map(|s| Instant::now() + Duration::from_secs(s));

    let events = match manager.panel_mut(args.panel) {
        Some(panel) => panel.input_events()?,
        None => return Err(CliError::PanelNotFound(args.panel.to_string()).into()),
    };

    if !ctx.json {
        println!("Watching {} panel, Ctrl+C to stop", args.panel);
    }

    loop {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
        match events.next_timeout(TICK) {
            Some(event) => output::print_event(&event, ctx.json),
            None => {
                let connected = manager
                    .panel(args.panel)
                    .is_some_and(Panel::is_connected);
                if !connected {
                    debug!(panel = %args.panel, "Panel disconnected, stopping watch");
                    break;
                }
            }
        }
    }

    for event in events.drain() {
        output::print_event(&event, ctx.json);
    }
    manager.close_all();
    Ok(())
}
