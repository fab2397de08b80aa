//! Image decoding for pixsqueeze.
//!
//! This module provides functionality for:
//! - Decoding JPEG and PNG files into RGBA rasters, with EXIF orientation applied
//! - Resizing rasters for the downscale steps of a target-size search
//!
//! All operations are synchronous; the async boundary lives in [`crate::codec`].

mod reader;
mod resize;
mod types;

pub use reader::{decode_image, decode_image_no_orientation, get_orientation, read_dimensions};
pub use resize::{resize, scale_dimensions};
pub use types::{DecodeError, FilterType, Orientation, RasterImage};
