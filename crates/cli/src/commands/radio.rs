//! Radio panel frequencies

use anyhow::Result;
use flightpanel_protocol::{PanelKind, RadioDisplay};

use crate::commands::{PanelContext, RadioArgs};
use crate::output;

impl From<&RadioArgs> for RadioDisplay {
    fn from(args: &RadioArgs) -> Self {
        RadioDisplay::new(
            &args.com1_active,
            &args.com1_standby,
            &args.com2_active,
            &args.com2_standby,
        )
    }
}

pub fn execute(args: &RadioArgs, ctx: &PanelContext) -> Result<()> {
    let mut manager = ctx.connect(PanelKind::Radio)?;
    let radio = manager.radio_mut()?;
    radio.set_display(&RadioDisplay::from(args))?;

    let sent = radio.last_display().cloned().unwrap_or_default();
    let summary = format!(
        "COM1 {} / {}  COM2 {} / {}",
        sent.com1_active, sent.com1_standby, sent.com2_active, sent.com2_standby
    );
    output::print_sent("Radio", "display", &sent, &summary, ctx.json);
    Ok(())
}
