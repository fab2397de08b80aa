//! Size and savings formatting bindings.

use pixsqueeze_core::stats;
use wasm_bindgen::prelude::*;

/// Format a byte count as `B`, `KB` or `MB`.
#[wasm_bindgen]
pub fn format_bytes(bytes: f64) -> String {
    stats::format_bytes(to_byte_count(bytes))
}

/// Summary line comparing original and compressed sizes.
#[wasm_bindgen]
pub fn format_stats(original_bytes: f64, compressed_bytes: f64) -> String {
    stats::format_stats(to_byte_count(original_bytes), to_byte_count(compressed_bytes))
}

/// Percentage saved, e.g. `"37.5% smaller"`.
#[wasm_bindgen]
pub fn compute_reduction(original_bytes: f64, compressed_bytes: f64) -> String {
    stats::compute_reduction(to_byte_count(original_bytes), to_byte_count(compressed_bytes))
}

// JS numbers; negatives and NaN count as zero.
fn to_byte_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}
