//! Fixed-quality compression bindings.
//!
//! # Example
//!
//! ```typescript
//! import { compress_image } from '@pixsqueeze/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = await compress_image(bytes, file.type, 80);
//! const blob = new Blob([result.bytes()], { type: result.mime });
//! ```

use crate::types::JsCompressionResult;
use pixsqueeze_core::codec::{ImageCodec, ImageCrateCodec};
use pixsqueeze_core::compress::compress_at_quality;
use pixsqueeze_core::encode::{ImageFormat, Quality};
use pixsqueeze_core::search::SourceImage;
use wasm_bindgen::prelude::*;

/// Compress an upload at a fixed quality (1-100).
///
/// Below 100 the output is always JPEG. At 100 the smaller of a lossless
/// re-encode and a full-quality JPEG is used, or the original when neither
/// beats it.
///
/// `mime` is the browser-reported type; when absent the format is detected
/// from the bytes.
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded.
#[wasm_bindgen]
pub async fn compress_image(
    bytes: Vec<u8>,
    mime: Option<String>,
    quality: u8,
) -> Result<JsCompressionResult, JsValue> {
    compress_bytes(&bytes, mime.as_deref(), quality)
        .await
        .map_err(|e| JsValue::from_str(&e))
}

pub(crate) async fn compress_bytes(
    bytes: &[u8],
    mime: Option<&str>,
    quality: u8,
) -> Result<JsCompressionResult, String> {
    let codec = ImageCrateCodec::new();
    let format = source_format(bytes, mime);
    let raster = codec.decode(bytes).await.map_err(|e| e.to_string())?;
    let source = SourceImage::new(&raster, bytes, format);

    let candidate = compress_at_quality(&codec, &source, Quality::new(quality)).await;
    Ok(JsCompressionResult::from_candidate(candidate, bytes.len() as u64))
}

/// Format named by `mime`, falling back to magic-byte detection and then JPEG.
pub(crate) fn source_format(bytes: &[u8], mime: Option<&str>) -> ImageFormat {
    match mime {
        Some(mime) if !mime.is_empty() => ImageFormat::from_mime(mime),
        _ => ImageFormat::sniff(bytes).unwrap_or(ImageFormat::Jpeg),
    }
}
