//! Human-readable size and savings strings for the before/after view.

/// Format a byte count as `B`, `KB` (one decimal) or `MB` (two decimals).
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let kb = bytes as f64 / 1024.0;
    if kb < 1024.0 {
        return format!("{kb:.1} KB");
    }
    format!("{:.2} MB", kb / 1024.0)
}

/// Percentage saved, e.g. `"37.5% smaller"`. Negative when the output grew.
///
/// Returns `"—"` when either size is zero.
pub fn compute_reduction(original_bytes: u64, compressed_bytes: u64) -> String {
    if original_bytes == 0 || compressed_bytes == 0 {
        return "—".to_string();
    }
    let reduction = (1.0 - compressed_bytes as f64 / original_bytes as f64) * 100.0;
    format!("{reduction:.1}% smaller")
}

/// One-line summary: `"<reduction> • Original: <a> → Compressed: <b>"`.
pub fn format_stats(original_bytes: u64, compressed_bytes: u64) -> String {
    if original_bytes == 0 || compressed_bytes == 0 {
        return "—".to_string();
    }
    format!(
        "{} • Original: {} → Compressed: {}",
        compute_reduction(original_bytes, compressed_bytes),
        format_bytes(original_bytes),
        format_bytes(compressed_bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.00 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 / 2), "2.50 MB");
    }

    #[test]
    fn test_compute_reduction() {
        assert_eq!(compute_reduction(1000, 625), "37.5% smaller");
        assert_eq!(compute_reduction(1000, 1000), "0.0% smaller");
        assert_eq!(compute_reduction(1000, 1100), "-10.0% smaller");
        assert_eq!(compute_reduction(0, 10), "—");
        assert_eq!(compute_reduction(10, 0), "—");
    }

    #[test]
    fn test_format_stats() {
        assert_eq!(
            format_stats(512_000, 102_400),
            "80.0% smaller • Original: 500.0 KB → Compressed: 100.0 KB"
        );
        assert_eq!(format_stats(0, 0), "—");
    }
}
