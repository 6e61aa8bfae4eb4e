//! FIP images, patterns and offline rendering

use std::path::Path;

use anyhow::{Context, Result};
use flightpanel_framebuffer::{
    FipFrame, FramebufferOptions, Pattern, generate_test_images, image_info, load_frame,
    parse_hex_color, save_jpeg, save_png,
};
use flightpanel_protocol::PanelKind;
use serde_json::json;

use crate::commands::{FipArgs, PanelContext};
use crate::error::CliError;
use crate::output;

/// Layer the command line over the configured framebuffer options.
pub fn options_from_args(args: &FipArgs, base: &FramebufferOptions) -> Result<FramebufferOptions> {
    let mut opts = base.clone();
    if let Some(policy) = args.policy {
        opts = opts.with_policy(policy);
    }
    if let Some(background) = &args.background {
        opts = opts.with_background(parse_hex_color(background)?);
    }
    if let Some(quality) = args.quality {
        opts.set_jpeg_quality(quality);
    }
    Ok(opts)
}

fn save_frame(frame: &FipFrame, path: &Path, opts: &FramebufferOptions) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => save_png(frame, path)?,
        "jpg" | "jpeg" => save_jpeg(frame, path, opts)?,
        _ => {
            return Err(CliError::ValidationError(format!(
                "cannot save to {}: use a .png, .jpg or .jpeg file",
                path.display()
            ))
            .into());
        }
    }
    Ok(())
}

pub fn execute(args: &FipArgs, ctx: &PanelContext) -> Result<()> {
    if let Some(dir) = &args.generate {
        let written = generate_test_images(dir)
            .with_context(|| format!("failed to write test images to {}", dir.display()))?;
        let names: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
        let summary = format!("wrote {} test images to {}", names.len(), dir.display());
        output::print_sent("FIP", "files", &names, &summary, ctx.json);
        return Ok(());
    }

    let opts = options_from_args(args, &ctx.config.fip)?;

    if args.info {
        if let Some(path) = &args.image {
            output::print_image_info(&image_info(path, &opts)?, ctx.json);
        }
        return Ok(());
    }

    let pattern = args.pattern.unwrap_or(Pattern::TestPattern);

    if let Some(target) = &args.save {
        let frame = match &args.image {
            Some(path) => load_frame(path, &opts)?,
            None => pattern.render(),
        };
        save_frame(&frame, target, &opts)?;
        let summary = format!("frame saved to {}", target.display());
        output::print_sent(
            "FIP",
            "saved",
            &json!({ "path": target.display().to_string(), "policy": opts.resize_policy }),
            &summary,
            ctx.json,
        );
        return Ok(());
    }

    let mut panel_ctx = ctx.clone();
    panel_ctx.config.fip = opts;
    let mut manager = panel_ctx.connect(PanelKind::Fip)?;
    let fip = manager.fip_mut()?;
    let summary = match &args.image {
        Some(path) => {
            fip.send_file(path)?;
            format!("image {}", path.display())
        }
        None => {
            fip.show_pattern(pattern)?;
            format!("pattern {}", pattern.name())
        }
    };
    let sent = fip.last_content().cloned();
    output::print_sent("FIP", "content", &sent, &summary, ctx.json);
    Ok(())
}
