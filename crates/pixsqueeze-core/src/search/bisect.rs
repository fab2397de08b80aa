//! Same-resolution quality bisection.

use tracing::{debug, warn};

use super::{CancelFlag, CandidateOrigin, EncodingCandidate, SearchError, Target};
use crate::codec::ImageCodec;
use crate::config::SearchConfig;
use crate::decode::RasterImage;
use crate::encode::{ImageFormat, Quality};

/// A target-size search bound to one codec and one target.
///
/// Use [`TargetSearch::search_quality`] for a single bisection pass, or
/// [`TargetSearch::run`] for the full search with format and scale
/// escalation.
pub struct TargetSearch<'a, C: ImageCodec + ?Sized> {
    pub(super) codec: &'a C,
    pub(super) target: Target,
    pub(super) config: SearchConfig,
    pub(super) cancel: Option<CancelFlag>,
    pub(super) encode_calls: u32,
    pub(super) non_monotonic: bool,
}

impl<'a, C: ImageCodec + ?Sized> TargetSearch<'a, C> {
    pub fn new(codec: &'a C, target: Target) -> Self {
        Self {
            codec,
            target,
            config: SearchConfig::default(),
            cancel: None,
            encode_calls: 0,
            non_monotonic: false,
        }
    }

    pub fn with_config(mut self, config: &SearchConfig) -> Self {
        self.config = config.validated();
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Encode calls made so far, failed ones included.
    pub fn encode_calls(&self) -> u32 {
        self.encode_calls
    }

    /// Bisect the quality axis for `raster` in `format`.
    ///
    /// Returns the first candidate within tolerance, otherwise the largest
    /// candidate at or under the target, otherwise the smallest one above it.
    /// `None` means every encode attempt failed.
    pub async fn search_quality(
        &mut self,
        raster: &RasterImage,
        format: ImageFormat,
    ) -> Result<Option<EncodingCandidate>, SearchError> {
        self.search_at(raster, format, 100).await
    }

    pub(super) async fn search_at(
        &mut self,
        raster: &RasterImage,
        format: ImageFormat,
        scale_percent: u8,
    ) -> Result<Option<EncodingCandidate>, SearchError> {
        // Quality has no effect on lossless output; one encode says it all.
        if format.is_lossless() {
            self.check_cancelled()?;
            return Ok(self
                .encode_candidate(raster, format, Quality::MAX, scale_percent)
                .await);
        }

        let target = self.target.bytes();
        let mut low: i32 = 1;
        let mut high: i32 = 100;
        let mut best_below: Option<EncodingCandidate> = None;
        let mut best_above: Option<EncodingCandidate> = None;
        let mut observed: Vec<(u8, u64)> = Vec::with_capacity(self.config.rounds as usize);

        for round in 0..self.config.rounds {
            self.check_cancelled()?;

            let mid = quality_midpoint(low, high);
            let Some(candidate) = self
                .encode_candidate(raster, format, mid, scale_percent)
                .await
            else {
                self.pause().await;
                continue;
            };

            let size = candidate.len();
            debug!(
                round,
                quality = mid.get(),
                size,
                target,
                scale_percent,
                "bisection round"
            );
            self.note_observation(&mut observed, mid.get(), size);

            if self.target.within_tolerance(size) {
                return Ok(Some(candidate));
            }

            if size <= target {
                if best_below.as_ref().is_none_or(|b| size > b.len()) {
                    best_below = Some(candidate);
                }
                low = i32::from(mid.get()) + 1;
            } else {
                if best_above.as_ref().is_none_or(|b| size < b.len()) {
                    best_above = Some(candidate);
                }
                high = i32::from(mid.get()) - 1;
            }

            self.pause().await;
        }

        Ok(best_below.or(best_above))
    }

    /// Encode once, turning failures and empty output into `None`.
    pub(super) async fn encode_candidate(
        &mut self,
        raster: &RasterImage,
        format: ImageFormat,
        quality: Quality,
        scale_percent: u8,
    ) -> Option<EncodingCandidate> {
        self.encode_calls += 1;
        match self.codec.encode(raster, format, quality).await {
            Ok(bytes) if !bytes.is_empty() => Some(EncodingCandidate {
                quality,
                format,
                width: raster.width,
                height: raster.height,
                scale_percent,
                bytes,
                origin: CandidateOrigin::Reencoded,
            }),
            Ok(_) => {
                warn!(%format, quality = quality.get(), "encoder produced no output");
                None
            }
            Err(err) => {
                warn!(%format, quality = quality.get(), error = %err, "encode attempt failed");
                None
            }
        }
    }

    pub(super) fn check_cancelled(&self) -> Result<(), SearchError> {
        match &self.cancel {
            Some(flag) if flag.is_cancelled() => Err(SearchError::Cancelled),
            _ => Ok(()),
        }
    }

    pub(super) async fn pause(&self) {
        if self.config.yield_between_rounds {
            tokio::task::yield_now().await;
        }
    }

    /// Record a (quality, size) sample and flag any inversion against
    /// earlier samples of the same pass.
    fn note_observation(&mut self, observed: &mut Vec<(u8, u64)>, quality: u8, size: u64) {
        let inverted = observed
            .iter()
            .any(|&(q, s)| (q < quality && s > size) || (q > quality && s < size));
        if inverted {
            warn!(quality, size, "output size is not monotonic in quality");
            self.non_monotonic = true;
        }
        observed.push((quality, size));
    }
}

/// Midpoint of the bounds, halves rounding up, clamped to a valid quality.
fn quality_midpoint(low: i32, high: i32) -> Quality {
    let mid = (low + high + 1).div_euclid(2);
    Quality::new(mid.clamp(1, 100) as u8)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::testing::FakeCodec;
    use proptest::prelude::*;

    proptest! {
        /// With a monotonic encoder whose per-quality step fits inside the
        /// tolerance, any target between the q=1 and q=100 sizes is hit.
        #[test]
        fn prop_reachable_targets_land_within_tolerance(
            side in 200u32..=800,
            fraction in 0.0f64..=1.0,
        ) {
            let codec = FakeCodec::new();
            let img = RasterImage::filled(side, side, [0, 0, 0, 255]);
            let min = codec.jpeg_size(&img, Quality::MIN) as f64;
            let max = codec.jpeg_size(&img, Quality::MAX) as f64;
            let bytes = (min + (max - min) * fraction).round() as u64;
            let target = Target::new(bytes).unwrap();

            let found = block_on(async {
                let mut cfg = SearchConfig::new();
                cfg.yield_between_rounds = false;
                let mut search = TargetSearch::new(&codec, target).with_config(&cfg);
                search.search_quality(&img, ImageFormat::Jpeg).await
            });

            let found = found.unwrap().unwrap();
            prop_assert!(
                target.within_tolerance(found.len()),
                "target {} tolerance {} got {}",
                target.bytes(),
                target.tolerance(),
                found.len()
            );
        }
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime")
            .block_on(future)
    }
}
