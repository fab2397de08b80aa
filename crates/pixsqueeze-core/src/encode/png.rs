//! Lossless PNG encoding.

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::ExtendedColorType;
use image::ImageEncoder;

use super::{validate_raster, EncodeError, ImageFormat};
use crate::decode::RasterImage;

/// Encode a raster to PNG bytes with the strongest compression setting.
///
/// Fully opaque rasters are written as RGB to avoid spending a byte per
/// pixel on a constant alpha channel.
pub fn encode_png(raster: &RasterImage) -> Result<Vec<u8>, EncodeError> {
    validate_raster(raster)?;

    let mut buffer = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, PngFilter::Adaptive);

    let result = if raster.has_transparency() {
        encoder.write_image(&raster.pixels, raster.width, raster.height, ExtendedColorType::Rgba8)
    } else {
        let rgb: Vec<u8> = raster
            .pixels
            .chunks_exact(RasterImage::CHANNELS)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        encoder.write_image(&rgb, raster.width, raster.height, ExtendedColorType::Rgb8)
    };

    result.map_err(|e| EncodeError::EncodingFailed {
        format: ImageFormat::Png,
        message: e.to_string(),
    })?;

    Ok(buffer)
}
