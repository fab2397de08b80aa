//! Tuning knobs for the target-size search.

use serde::{Deserialize, Serialize};

use crate::decode::FilterType;

/// Parameters of a target-size search.
///
/// Every field has a default, so a partial object (or `{}`) deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Bisection rounds per search pass.
    pub rounds: u32,
    /// Tolerance as a fraction of the target size.
    pub tolerance_ratio: f64,
    /// Lower bound on the tolerance, in bytes.
    pub min_tolerance: u64,
    /// First downscale step, percent of the original linear size.
    pub scale_start_percent: u8,
    /// Decrement between downscale steps, in percent.
    pub scale_step_percent: u8,
    /// Smallest downscale step tried, in percent.
    pub scale_floor_percent: u8,
    /// Interpolation used when drawing downscaled rasters.
    pub resize_filter: FilterType,
    /// Yield to the async scheduler between rounds.
    pub yield_between_rounds: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            rounds: 12,
            tolerance_ratio: 0.02,
            min_tolerance: 1024,
            scale_start_percent: 90,
            scale_step_percent: 10,
            scale_floor_percent: 40,
            resize_filter: FilterType::Bilinear,
            yield_between_rounds: true,
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with out-of-range values pulled back to something usable.
    pub fn validated(&self) -> Self {
        let defaults = Self::default();
        let mut cfg = self.clone();

        cfg.rounds = cfg.rounds.max(1);
        if !cfg.tolerance_ratio.is_finite() || cfg.tolerance_ratio < 0.0 {
            cfg.tolerance_ratio = defaults.tolerance_ratio;
        }
        cfg.scale_start_percent = cfg.scale_start_percent.clamp(1, 100);
        if cfg.scale_step_percent == 0 {
            cfg.scale_step_percent = defaults.scale_step_percent;
        }
        cfg.scale_floor_percent = cfg.scale_floor_percent.clamp(1, cfg.scale_start_percent);
        cfg
    }

    /// Downscale steps in the order they are tried, e.g. 90, 80, ..., 40.
    pub fn scale_steps(&self) -> Vec<u8> {
        let cfg = self.validated();
        let mut steps = Vec::new();
        let mut percent = cfg.scale_start_percent;
        while percent >= cfg.scale_floor_percent {
            steps.push(percent);
            match percent.checked_sub(cfg.scale_step_percent) {
                Some(next) if next > 0 => percent = next,
                _ => break,
            }
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scale_steps() {
        assert_eq!(SearchConfig::new().scale_steps(), vec![90, 80, 70, 60, 50, 40]);
    }

    #[test]
    fn test_validated_fixes_bad_values() {
        let mut cfg = SearchConfig::new();
        cfg.rounds = 0;
        cfg.scale_step_percent = 0;
        cfg.scale_floor_percent = 95;
        cfg.tolerance_ratio = f64::NAN;

        let fixed = cfg.validated();
        assert_eq!(fixed.rounds, 1);
        assert_eq!(fixed.scale_step_percent, 10);
        assert_eq!(fixed.scale_floor_percent, 90);
        assert_eq!(fixed.tolerance_ratio, 0.02);
        assert_eq!(fixed.scale_steps(), vec![90]);
    }

    #[test]
    fn test_scale_steps_stop_before_zero() {
        let mut cfg = SearchConfig::new();
        cfg.scale_start_percent = 25;
        cfg.scale_step_percent = 10;
        cfg.scale_floor_percent = 1;
        assert_eq!(cfg.scale_steps(), vec![25, 15, 5]);
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        use serde::de::value::{Error, MapDeserializer};

        let fields = MapDeserializer::<'_, _, Error>::new(vec![("rounds", 20u32)].into_iter());
        let cfg = SearchConfig::deserialize(fields).unwrap();
        assert_eq!(cfg.rounds, 20);
        assert_eq!(cfg.min_tolerance, 1024);
        assert_eq!(cfg.resize_filter, FilterType::Bilinear);
    }
}
