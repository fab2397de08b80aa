//! JPEG encoding.
//!
//! Uses the `image` crate's baseline JPEG encoder. JPEG has no alpha channel,
//! so RGBA rasters are flattened over black first, the same result a 2D
//! canvas export produces.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::{validate_raster, EncodeError, ImageFormat, Quality};
use crate::decode::RasterImage;

/// Encode a raster to JPEG bytes.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 60-90: Good quality, typical for web delivery
/// * Below 60: Low quality, visible artifacts
pub fn encode_jpeg(
    raster: &RasterImage,
    quality: impl Into<Quality>,
) -> Result<Vec<u8>, EncodeError> {
    validate_raster(raster)?;

    let rgb = flatten_to_rgb(&raster.pixels);
    let quality: Quality = quality.into();
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.get());

    encoder
        .write_image(&rgb, raster.width, raster.height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: ImageFormat::Jpeg,
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

/// Composite RGBA over opaque black, dropping the alpha channel.
fn flatten_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let alpha = u16::from(px[3]);
        if alpha == 255 {
            rgb.extend_from_slice(&px[..3]);
        } else {
            rgb.extend(
                px[..3]
                    .iter()
                    .map(|&c| ((u16::from(c) * alpha + 127) / 255) as u8),
            );
        }
    }
    rgb
}
