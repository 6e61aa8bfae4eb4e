//! Try every panel and report what connected

use anyhow::Result;

use crate::commands::PanelContext;
use crate::output;

pub fn execute(ctx: &PanelContext) -> Result<()> {
    let mut manager = ctx.manager()?;
    let status = manager.connect_all();
    output::print_status(&status, ctx.json);
    manager.close_all();
    Ok(())
}
