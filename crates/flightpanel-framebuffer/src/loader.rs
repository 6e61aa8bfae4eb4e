//! Image file I/O.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use flightpanel_errors::{PanelError, Result};
use flightpanel_protocol::{FIP_HEIGHT, FIP_WIDTH};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use serde::Serialize;
use tracing::info;

use crate::frame::FipFrame;
use crate::options::FramebufferOptions;
use crate::render::render;

/// Dimensions of a source image relative to the FIP screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub fip_width: u32,
    pub fip_height: u32,
    pub needs_resize: bool,
}

impl ImageInfo {
    pub fn of(img: &DynamicImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            fip_width: FIP_WIDTH,
            fip_height: FIP_HEIGHT,
            needs_resize: img.width() != FIP_WIDTH || img.height() != FIP_HEIGHT,
        }
    }
}

fn check_extension(path: &Path, opts: &FramebufferOptions) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if !opts.accepts_extension(ext) {
        return Err(PanelError::UnsupportedFormat(format!(
            "{} (accepted: {})",
            path.display(),
            opts.extensions.join(", ")
        )));
    }
    Ok(())
}

/// Load and decode an image, accepting only the configured extensions.
pub fn load_file(path: impl AsRef<Path>, opts: &FramebufferOptions) -> Result<DynamicImage> {
    let path = path.as_ref();
    check_extension(path, opts)?;
    if !path.is_file() {
        return Err(PanelError::InvalidArgument(format!(
            "image file not found: {}",
            path.display()
        )));
    }
    image::open(path)
        .map_err(|e| PanelError::UnsupportedFormat(format!("{}: {e}", path.display())))
}

/// Load a file and render it straight into a frame.
pub fn load_frame(path: impl AsRef<Path>, opts: &FramebufferOptions) -> Result<FipFrame> {
    let path = path.as_ref();
    let img = load_file(path, opts)?;
    info!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        policy = %opts.resize_policy,
        "Loaded image for FIP"
    );
    Ok(render(&img, opts))
}

/// Dimensions of an image file without rendering it.
pub fn image_info(path: impl AsRef<Path>, opts: &FramebufferOptions) -> Result<ImageInfo> {
    load_file(path, opts).map(|img| ImageInfo::of(&img))
}

fn io_error(path: &Path, e: impl std::fmt::Display) -> PanelError {
    PanelError::InvalidArgument(format!("cannot write {}: {e}", path.display()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(|e| io_error(path, e))
        }
        _ => Ok(()),
    }
}

fn frame_image(frame: &FipFrame) -> Result<image::RgbImage> {
    frame
        .to_rgb_image()
        .ok_or_else(|| PanelError::InvalidArgument("framebuffer has the wrong size".to_string()))
}

/// Write a frame as PNG, creating parent directories.
pub fn save_png(frame: &FipFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    frame_image(frame)?
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| io_error(path, e))
}

/// Write a frame as JPEG at `opts.jpeg_quality`, creating parent directories.
pub fn save_jpeg(
    frame: &FipFrame,
    path: impl AsRef<Path>,
    opts: &FramebufferOptions,
) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, opts.effective_jpeg_quality());
    frame_image(frame)?
        .write_with_encoder(encoder)
        .map_err(|e| io_error(path, e))
}
