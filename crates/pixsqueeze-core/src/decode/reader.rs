//! Image decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;

use super::{DecodeError, Orientation, RasterImage};

/// Decode a JPEG or PNG image from bytes, applying EXIF orientation correction.
///
/// This mirrors what a browser's bitmap decoder hands back: pixels in display
/// orientation, RGBA.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be recognized,
/// and `DecodeError::CorruptedFile` if the data cannot be decoded.
pub fn decode_image(bytes: &[u8]) -> Result<RasterImage, DecodeError> {
    let orientation = extract_orientation(bytes);
    let img = decode_dynamic(bytes)?;
    Ok(RasterImage::from_rgba_image(
        apply_orientation(img, orientation).into_rgba8(),
    ))
}

/// Decode an image from bytes without applying EXIF orientation.
pub fn decode_image_no_orientation(bytes: &[u8]) -> Result<RasterImage, DecodeError> {
    let img = decode_dynamic(bytes)?;
    Ok(RasterImage::from_rgba_image(img.into_rgba8()))
}

/// Extract EXIF orientation value from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}

/// Display dimensions read from the image header, without decoding pixels.
///
/// EXIF orientation is honoured, so the result matches [`decode_image`].
pub fn read_dimensions(bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
    let (width, height) = guessed_reader(bytes)?
        .into_dimensions()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if extract_orientation(bytes).swaps_dimensions() {
        Ok((height, width))
    } else {
        Ok((width, height))
    }
}

fn guessed_reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }
    Ok(reader)
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    guessed_reader(bytes)?
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{encode_jpeg, encode_png};

    fn gradient(width: u32, height: u32) -> RasterImage {
        let mut pixels = Vec::with_capacity(RasterImage::expected_len(width, height));
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[
                    (x * 255 / width) as u8,
                    (y * 255 / height) as u8,
                    90,
                    255,
                ]);
            }
        }
        RasterImage::new(width, height, pixels)
    }

    #[test]
    fn test_decode_png_roundtrip_is_lossless() {
        let raster = gradient(16, 9);
        let png = encode_png(&raster).unwrap();

        let decoded = decode_image(&png).unwrap();
        assert_eq!(decoded, raster);
    }

    #[test]
    fn test_decode_jpeg_dimensions() {
        let raster = gradient(40, 20);
        let jpeg = encode_jpeg(&raster, 90).unwrap();

        let decoded = decode_image(&jpeg).unwrap();
        assert_eq!((decoded.width, decoded.height), (40, 20));
        assert_eq!(decoded.pixels.len(), 40 * 20 * 4);
        assert!(!decoded.has_transparency());
    }

    #[test]
    fn test_decode_keeps_alpha() {
        let raster = RasterImage::filled(4, 4, [200, 10, 10, 128]);
        let png = encode_png(&raster).unwrap();

        let decoded = decode_image_no_orientation(&png).unwrap();
        assert!(decoded.has_transparency());
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(matches!(decode_image(&[]), Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_garbage() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03, 0x04, 0x05]);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_truncated_png() {
        let png = encode_png(&gradient(32, 32)).unwrap();
        let result = decode_image(&png[..png.len() / 2]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_read_dimensions_matches_decode() {
        let png = encode_png(&gradient(64, 32)).unwrap();
        assert_eq!(read_dimensions(&png).unwrap(), (64, 32));

        let jpeg = encode_jpeg(&gradient(30, 50), 75).unwrap();
        let decoded = decode_image(&jpeg).unwrap();
        assert_eq!(read_dimensions(&jpeg).unwrap(), (decoded.width, decoded.height));
    }

    #[test]
    fn test_read_dimensions_rejects_garbage() {
        assert!(matches!(read_dimensions(&[]), Err(DecodeError::InvalidFormat)));
        assert!(read_dimensions(&[0x00, 0x01, 0x02, 0x03]).is_err());
    }

    #[test]
    fn test_swaps_dimensions() {
        assert!(Orientation::Rotate90CW.swaps_dimensions());
        assert!(Orientation::Transverse.swaps_dimensions());
        assert!(!Orientation::Rotate180.swaps_dimensions());
        assert!(!Orientation::Normal.swaps_dimensions());
    }

    #[test]
    fn test_orientation_without_exif() {
        let jpeg = encode_jpeg(&gradient(8, 8), 80).unwrap();
        assert_eq!(get_orientation(&jpeg), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_swaps_dimensions() {
        let img = DynamicImage::new_rgba8(30, 10);
        let rotated = apply_orientation(img, Orientation::Rotate90CW);
        assert_eq!((rotated.width(), rotated.height()), (10, 30));
    }
}
