//! WASM-compatible wrapper types.
//!
//! JavaScript-friendly views of core types: decoded rasters and compression
//! results.

use pixsqueeze_core::decode::RasterImage;
use pixsqueeze_core::search::{EncodingCandidate, SearchResult, TargetStatus};
use wasm_bindgen::prelude::*;

/// A decoded RGBA image.
///
/// The pixel data lives in WASM memory; `pixels()` copies it out as a
/// `Uint8Array`.
#[wasm_bindgen]
pub struct JsRasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRasterImage {
    /// Create an image from RGBA pixel data (4 bytes per pixel, row-major).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsRasterImage {
        JsRasterImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4).
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// RGBA pixel data as a `Uint8Array` copy.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsRasterImage {
    pub(crate) fn from_raster(raster: RasterImage) -> Self {
        Self {
            width: raster.width,
            height: raster.height,
            pixels: raster.pixels,
        }
    }
}

/// A compressed file plus what produced it.
#[wasm_bindgen]
pub struct JsCompressionResult {
    bytes: Vec<u8>,
    mime: String,
    quality: u8,
    width: u32,
    height: u32,
    scale_percent: u8,
    original_size: u64,
    status: String,
    encode_calls: u32,
    non_monotonic: bool,
}

#[wasm_bindgen]
impl JsCompressionResult {
    /// Encoded bytes as a `Uint8Array` copy.
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// MIME type of the output, `image/jpeg` or `image/png`.
    #[wasm_bindgen(getter)]
    pub fn mime(&self) -> String {
        self.mime.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> u8 {
        self.quality
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Linear scale relative to the source, in percent.
    #[wasm_bindgen(getter)]
    pub fn scale_percent(&self) -> u8 {
        self.scale_percent
    }

    #[wasm_bindgen(getter)]
    pub fn size(&self) -> f64 {
        self.bytes.len() as f64
    }

    #[wasm_bindgen(getter)]
    pub fn original_size(&self) -> f64 {
        self.original_size as f64
    }

    /// `"unchanged"`, `"met"`, `"closest"`, or `"fixed"` for fixed-quality
    /// compression.
    #[wasm_bindgen(getter)]
    pub fn status(&self) -> String {
        self.status.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn encode_calls(&self) -> u32 {
        self.encode_calls
    }

    #[wasm_bindgen(getter)]
    pub fn non_monotonic(&self) -> bool {
        self.non_monotonic
    }

    /// The output is strictly smaller than the upload.
    pub fn is_smaller(&self) -> bool {
        (self.bytes.len() as u64) < self.original_size
    }
}

impl JsCompressionResult {
    pub(crate) fn from_candidate(candidate: EncodingCandidate, original_size: u64) -> Self {
        Self {
            mime: candidate.format.mime().to_string(),
            quality: candidate.quality.get(),
            width: candidate.width,
            height: candidate.height,
            scale_percent: candidate.scale_percent,
            original_size,
            status: "fixed".to_string(),
            encode_calls: 0,
            non_monotonic: false,
            bytes: candidate.bytes,
        }
    }

    pub(crate) fn from_search(result: SearchResult, original_size: u64) -> Self {
        let status = status_name(result.status).to_string();
        let encode_calls = result.encode_calls;
        let non_monotonic = result.non_monotonic;
        Self {
            status,
            encode_calls,
            non_monotonic,
            ..Self::from_candidate(result.candidate, original_size)
        }
    }
}

pub(crate) fn status_name(status: TargetStatus) -> &'static str {
    match status {
        TargetStatus::Unchanged => "unchanged",
        TargetStatus::Met => "met",
        TargetStatus::ClosestPossible => "closest",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixsqueeze_core::encode::{ImageFormat, Quality};
    use pixsqueeze_core::search::CandidateOrigin;

    fn candidate() -> EncodingCandidate {
        EncodingCandidate {
            quality: Quality::new(72),
            format: ImageFormat::Jpeg,
            width: 30,
            height: 20,
            scale_percent: 80,
            bytes: vec![0u8; 400],
            origin: CandidateOrigin::Reencoded,
        }
    }

    #[test]
    fn test_raster_image_accessors() {
        let img = JsRasterImage::new(10, 5, vec![0u8; 10 * 5 * 4]);
        assert_eq!(img.width(), 10);
        assert_eq!(img.height(), 5);
        assert_eq!(img.byte_length(), 200);
    }

    #[test]
    fn test_from_raster() {
        let raster = RasterImage::filled(3, 2, [1, 2, 3, 255]);
        let img = JsRasterImage::from_raster(raster);
        assert_eq!(img.width(), 3);
        assert_eq!(&img.pixels()[0..4], &[1, 2, 3, 255]);
    }

    #[test]
    fn test_result_from_candidate() {
        let result = JsCompressionResult::from_candidate(candidate(), 1000);
        assert_eq!(result.mime(), "image/jpeg");
        assert_eq!(result.quality(), 72);
        assert_eq!(result.scale_percent(), 80);
        assert_eq!(result.size(), 400.0);
        assert_eq!(result.status(), "fixed");
        assert!(result.is_smaller());
    }

    #[test]
    fn test_status_names() {
        assert_eq!(status_name(TargetStatus::Unchanged), "unchanged");
        assert_eq!(status_name(TargetStatus::Met), "met");
        assert_eq!(status_name(TargetStatus::ClosestPossible), "closest");
    }
}
