//! Image encoding for pixsqueeze.
//!
//! This module provides functionality for:
//! - Encoding rasters to JPEG with a 1-100 quality knob
//! - Encoding rasters to PNG losslessly
//! - The shared [`ImageFormat`] and [`Quality`] types
//!
//! # Examples
//!
//! ```ignore
//! use pixsqueeze_core::decode::RasterImage;
//! use pixsqueeze_core::encode::{encode, ImageFormat, Quality};
//!
//! let raster = RasterImage::filled(100, 100, [128, 128, 128, 255]);
//! let jpeg = encode(&raster, ImageFormat::Jpeg, Quality::new(80)).unwrap();
//! println!("Encoded {} bytes", jpeg.len());
//! ```

mod jpeg;
mod png;
mod types;

pub use jpeg::encode_jpeg;
pub use png::encode_png;
pub use types::{EncodeError, ImageFormat, Quality};

use crate::decode::RasterImage;

/// Encode a raster in the given format. Quality is ignored for lossless formats.
pub fn encode(
    raster: &RasterImage,
    format: ImageFormat,
    quality: Quality,
) -> Result<Vec<u8>, EncodeError> {
    match format {
        ImageFormat::Jpeg => encode_jpeg(raster, quality),
        ImageFormat::Png => encode_png(raster),
    }
}

fn validate_raster(raster: &RasterImage) -> Result<(), EncodeError> {
    if raster.width == 0 || raster.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: raster.width,
            height: raster.height,
        });
    }

    let expected = RasterImage::expected_len(raster.width, raster.height);
    if raster.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: raster.pixels.len(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_dispatch() {
        let raster = RasterImage::filled(8, 8, [50, 60, 70, 255]);

        let jpeg = encode(&raster, ImageFormat::Jpeg, Quality::new(70)).unwrap();
        assert_eq!(ImageFormat::sniff(&jpeg), Some(ImageFormat::Jpeg));

        let png = encode(&raster, ImageFormat::Png, Quality::new(10)).unwrap();
        assert_eq!(ImageFormat::sniff(&png), Some(ImageFormat::Png));
    }

    #[test]
    fn test_png_ignores_quality() {
        let raster = RasterImage::filled(8, 8, [50, 60, 70, 255]);
        let low = encode(&raster, ImageFormat::Png, Quality::MIN).unwrap();
        let high = encode(&raster, ImageFormat::Png, Quality::MAX).unwrap();
        assert_eq!(low, high);
    }
}
