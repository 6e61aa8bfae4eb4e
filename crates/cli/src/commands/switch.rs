//! Switch panel landing gear lights

use anyhow::Result;
use flightpanel_protocol::{GearLights, LandingGearLights, PanelKind};

use crate::commands::{GearArg, PanelContext, SwitchArgs};
use crate::output;

impl From<GearArg> for GearLights {
    fn from(gear: GearArg) -> Self {
        match gear {
            GearArg::Up => GearLights::GEAR_UP,
            GearArg::Down => GearLights::GEAR_DOWN,
            GearArg::Transition => GearLights::GEAR_TRANSITION,
            GearArg::Off => GearLights::OFF,
        }
    }
}

pub fn lights_from_args(args: &SwitchArgs) -> GearLights {
    match args.gear {
        Some(gear) => gear.into(),
        None => LandingGearLights {
            green_n: args.green_n,
            green_l: args.green_l,
            green_r: args.green_r,
            red_n: args.red_n,
            red_l: args.red_l,
            red_r: args.red_r,
        }
        .into(),
    }
}

pub fn execute(args: &SwitchArgs, ctx: &PanelContext) -> Result<()> {
    let lights = lights_from_args(args);
    let mut manager = ctx.connect(PanelKind::Switch)?;
    manager.switch_mut()?.set_leds(lights)?;

    let sent = LandingGearLights::from(lights);
    let summary = format!("gear lights {:#04x}", lights.bits());
    output::print_sent("Switch", "lights", &sent, &summary, ctx.json);
    Ok(())
}
