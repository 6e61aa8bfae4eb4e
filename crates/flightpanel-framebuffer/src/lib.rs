//! FIP framebuffer pipeline.
//!
//! Turns an arbitrary raster into the 230,400-byte RGB payload the Flight
//! Instrument Panel expects: 320x240 pixels, row-major from the top-left,
//! three bytes per pixel in R, G, B order. Alpha is dropped, not blended.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod frame;
pub mod loader;
pub mod options;
pub mod patterns;
pub mod render;

pub use frame::FipFrame;
pub use loader::{ImageInfo, image_info, load_file, load_frame, save_jpeg, save_png};
pub use options::{FramebufferOptions, ResizePolicy, parse_hex_color};
pub use patterns::{Pattern, generate_test_images};
pub use render::render;
