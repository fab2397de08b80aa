//! Pixsqueeze WASM - WebAssembly bindings for pixsqueeze
//!
//! This crate exposes the pixsqueeze-core functionality to the browser.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for rasters and results
//! - `decode` - Image decoding and format detection
//! - `compress` - Fixed-quality compression
//! - `optimize` - Target-size search
//! - `stats` - Size and savings formatting
//!
//! # Usage
//!
//! ```typescript
//! import init, { optimize_to_target, format_stats } from '@pixsqueeze/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = await optimize_to_target(bytes, 150);
//! console.log(format_stats(result.original_size, result.size));
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod decode;
mod optimize;
mod stats;
mod types;

pub use compress::compress_image;
pub use decode::{decode_image, detect_format};
pub use optimize::optimize_to_target;
pub use stats::{compute_reduction, format_bytes, format_stats};
pub use types::{JsCompressionResult, JsRasterImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Supported output MIME types.
#[wasm_bindgen]
pub fn supported_formats() -> js_sys::Array {
    ["image/jpeg", "image/png"]
        .into_iter()
        .map(JsValue::from_str)
        .collect()
}
