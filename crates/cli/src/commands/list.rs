//! Enumerate attached panels

use anyhow::{Context, Result};

use crate::commands::PanelContext;
use crate::output;

pub fn execute(ctx: &PanelContext) -> Result<()> {
    let manager = ctx.manager()?;
    let devices = manager.enumerate().context("failed to enumerate USB devices")?;
    output::print_device_list(&devices, ctx.json);
    Ok(())
}
