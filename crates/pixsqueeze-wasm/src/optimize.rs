//! Target-size search bindings.
//!
//! # Example
//!
//! ```typescript
//! import { optimize_to_target } from '@pixsqueeze/wasm';
//!
//! const result = await optimize_to_target(bytes, 200, { rounds: 12 });
//! if (result.status === 'closest') {
//!   console.warn(`Could only reach ${result.size} bytes`);
//! }
//! ```

use crate::types::JsCompressionResult;
use pixsqueeze_core::codec::{ImageCrateCodec, ScratchSurface};
use pixsqueeze_core::config::SearchConfig;
use pixsqueeze_core::search::{optimize_encoded, Target};
use wasm_bindgen::prelude::*;

/// Re-encode an upload to land as close as possible to `target_kb`
/// kilobytes (1 KB = 1024 bytes).
///
/// `config` is an optional object with any of the search settings
/// (`rounds`, `tolerance_ratio`, `min_tolerance`, `scale_start_percent`,
/// `scale_step_percent`, `scale_floor_percent`, `resize_filter`,
/// `yield_between_rounds`); missing fields keep their defaults.
///
/// The search yields between encode rounds, so the page stays responsive
/// while it runs.
///
/// # Errors
///
/// Returns an error if the target is not a positive number, the config is
/// malformed, the bytes cannot be decoded, or no encode succeeded at all.
#[wasm_bindgen]
pub async fn optimize_to_target(
    bytes: Vec<u8>,
    target_kb: f64,
    config: JsValue,
) -> Result<JsCompressionResult, JsValue> {
    let config: SearchConfig = if config.is_undefined() || config.is_null() {
        SearchConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid search config: {}", e)))?
    };

    let result = optimize_bytes(&bytes, target_kb, &config)
        .await
        .map_err(|e| JsValue::from_str(&e))?;

    if result.non_monotonic() {
        web_sys::console::warn_1(&JsValue::from_str(
            "pixsqueeze: encoder output size was not monotonic in quality",
        ));
    }
    Ok(result)
}

pub(crate) async fn optimize_bytes(
    bytes: &[u8],
    target_kb: f64,
    config: &SearchConfig,
) -> Result<JsCompressionResult, String> {
    let target_bytes = kb_to_bytes(target_kb)
        .ok_or_else(|| "Target size must be a positive number".to_string())?;
    let target = Target::with_config(target_bytes, config)
        .map_err(|e| e.to_string())?;

    let codec = ImageCrateCodec::new();
    let mut surface = ScratchSurface::new();
    let result = optimize_encoded(&codec, bytes, target, &mut surface, config)
        .await
        .map_err(|e| e.to_string())?;

    Ok(JsCompressionResult::from_search(result, bytes.len() as u64))
}

fn kb_to_bytes(kb: f64) -> Option<u64> {
    let bytes = (kb * 1024.0).round();
    (bytes.is_finite() && bytes >= 1.0).then_some(bytes as u64)
}
