//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode a JPEG or PNG upload into an RGBA raster
//! - [`detect_format`] - MIME type of an upload from its magic bytes

use crate::types::JsRasterImage;
use pixsqueeze_core::decode;
use pixsqueeze_core::encode::ImageFormat;
use wasm_bindgen::prelude::*;

/// Decode a JPEG or PNG image from bytes.
///
/// EXIF orientation is applied so the raster matches what the browser
/// displays.
///
/// # Errors
///
/// Returns an error if the bytes are not a supported image or are corrupted.
///
/// # Example
///
/// ```typescript
/// const bytes = new Uint8Array(await file.arrayBuffer());
/// const image = decode_image(bytes);
/// console.log(`Decoded ${image.width}x${image.height}`);
/// ```
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRasterImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsRasterImage::from_raster)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// MIME type of `bytes` judged from file magic, or `undefined` when the
/// format is not supported.
#[wasm_bindgen]
pub fn detect_format(bytes: &[u8]) -> Option<String> {
    ImageFormat::sniff(bytes).map(|format| format.mime().to_string())
}
