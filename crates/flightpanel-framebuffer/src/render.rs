//! Resize dispatch and RGBA to RGB flattening.

use flightpanel_protocol::{FIP_HEIGHT, FIP_WIDTH};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use tracing::debug;

use crate::frame::FipFrame;
use crate::options::{FramebufferOptions, ResizePolicy};

/// Bilinear sampling for every scaled policy.
const FILTER: FilterType = FilterType::Triangle;

fn scaled_dims(w: u32, h: u32, scale: f64) -> (u32, u32) {
    let sw = ((f64::from(w) * scale).round() as u32).max(1);
    let sh = ((f64::from(h) * scale).round() as u32).max(1);
    (sw, sh)
}

fn resize_exact(src: &RgbaImage, w: u32, h: u32) -> RgbaImage {
    if src.dimensions() == (w, h) {
        return src.clone();
    }
    imageops::resize(src, w, h, FILTER)
}

/// Paste `top` centred on a background canvas, clipping any overflow.
///
/// Pixels are copied, not alpha-blended.
fn centre_on_canvas(top: &RgbaImage, background: [u8; 4]) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(FIP_WIDTH, FIP_HEIGHT, Rgba(background));
    let x = (i64::from(FIP_WIDTH) - i64::from(top.width())) / 2;
    let y = (i64::from(FIP_HEIGHT) - i64::from(top.height())) / 2;
    imageops::replace(&mut canvas, top, x, y);
    canvas
}

fn apply_policy(src: &RgbaImage, opts: &FramebufferOptions) -> RgbaImage {
    let (w, h) = src.dimensions();
    let sx = f64::from(FIP_WIDTH) / f64::from(w);
    let sy = f64::from(FIP_HEIGHT) / f64::from(h);

    match opts.resize_policy {
        ResizePolicy::Stretch => resize_exact(src, FIP_WIDTH, FIP_HEIGHT),
        ResizePolicy::Fit => {
            let (fw, fh) = scaled_dims(w, h, sx.min(sy));
            let fitted = resize_exact(src, fw.min(FIP_WIDTH), fh.min(FIP_HEIGHT));
            centre_on_canvas(&fitted, opts.background)
        }
        ResizePolicy::Crop => {
            // Crop in source space, then scale only the visible region.
            let scale = sx.max(sy);
            let cw = ((f64::from(FIP_WIDTH) / scale).round() as u32).clamp(1, w);
            let ch = ((f64::from(FIP_HEIGHT) / scale).round() as u32).clamp(1, h);
            let region = imageops::crop_imm(src, (w - cw) / 2, (h - ch) / 2, cw, ch).to_image();
            resize_exact(&region, FIP_WIDTH, FIP_HEIGHT)
        }
        ResizePolicy::Center => centre_on_canvas(src, opts.background),
    }
}

/// Drop alpha from a 320x240 surface.
fn flatten(surface: &RgbaImage) -> FipFrame {
    let mut data = Vec::with_capacity(flightpanel_protocol::FIP_FRAME_LEN);
    for px in surface.pixels() {
        data.extend_from_slice(&px.0[..3]);
    }
    // The surface is always 320x240 here, so the length check cannot fail.
    FipFrame::from_bytes(data).unwrap_or_default()
}

/// Render any raster into a FIP frame under `opts.resize_policy`.
pub fn render(src: &DynamicImage, opts: &FramebufferOptions) -> FipFrame {
    let rgba = src.to_rgba8();
    debug!(
        width = rgba.width(),
        height = rgba.height(),
        policy = %opts.resize_policy,
        "rendering framebuffer"
    );
    if rgba.width() == 0 || rgba.height() == 0 {
        let [r, g, b, _] = opts.background;
        return FipFrame::solid([r, g, b]);
    }
    flatten(&apply_policy(&rgba, opts))
}
