//! Full target-size search: format fallback and progressive downscaling.

use tracing::{debug, info, warn};

use super::{
    EncodingCandidate, SearchError, SearchResult, SourceImage, Target, TargetSearch, TargetStatus,
};
use crate::codec::{ImageCodec, ScratchSurface};
use crate::config::SearchConfig;
use crate::decode::{scale_dimensions, DecodeError};
use crate::encode::ImageFormat;

impl<C: ImageCodec + ?Sized> TargetSearch<'_, C> {
    /// Search for the candidate closest to the target.
    ///
    /// 1. A target at or above the original size returns the original bytes
    ///    without encoding anything.
    /// 2. Bisect in the source format at native resolution.
    /// 3. For lossless sources that missed, bisect again as JPEG.
    /// 4. Still over target: draw the source onto `surface` at each downscale
    ///    step and bisect as JPEG, stopping at the first step that fits.
    ///
    /// The smallest candidate seen is returned as
    /// [`TargetStatus::ClosestPossible`] when nothing fits.
    pub async fn run(
        mut self,
        source: &SourceImage<'_>,
        surface: &mut ScratchSurface,
    ) -> Result<SearchResult, SearchError> {
        let target_bytes = self.target.bytes();

        if target_bytes >= source.original_len() {
            info!(
                target = target_bytes,
                original = source.original_len(),
                "original already fits the target"
            );
            return Ok(SearchResult::unchanged(
                EncodingCandidate::original(source),
                self.target,
            ));
        }

        let mut chosen = self.search_at(source.raster, source.format, 100).await?;

        if source.format.is_lossless() && !fits(&chosen, target_bytes) {
            debug!("lossless output over target, retrying as JPEG");
            let lossy = self.search_at(source.raster, ImageFormat::Jpeg, 100).await?;
            chosen = smaller_of(chosen, lossy);
        }

        if !fits(&chosen, target_bytes) {
            chosen = self.downscale(source, surface, chosen).await?;
        }

        let Some(candidate) = chosen else {
            warn!(attempts = self.encode_calls, "no candidate could be produced");
            return Err(SearchError::SearchExhausted {
                attempts: self.encode_calls,
            });
        };

        let status = if self.target.is_met_by(candidate.len()) {
            TargetStatus::Met
        } else {
            TargetStatus::ClosestPossible
        };

        info!(
            target = target_bytes,
            size = candidate.len(),
            quality = candidate.quality.get(),
            format = %candidate.format,
            scale_percent = candidate.scale_percent,
            encode_calls = self.encode_calls,
            ?status,
            "target search finished"
        );

        Ok(SearchResult {
            candidate,
            status,
            target: self.target,
            encode_calls: self.encode_calls,
            non_monotonic: self.non_monotonic,
        })
    }

    async fn downscale(
        &mut self,
        source: &SourceImage<'_>,
        surface: &mut ScratchSurface,
        mut best: Option<EncodingCandidate>,
    ) -> Result<Option<EncodingCandidate>, SearchError> {
        let target_bytes = self.target.bytes();

        for percent in self.config.scale_steps() {
            self.check_cancelled()?;

            let (width, height) =
                scale_dimensions(source.raster.width, source.raster.height, percent);
            debug!(percent, width, height, "trying downscaled raster");

            match surface.draw_scaled(source.raster, width, height, self.config.resize_filter) {
                Ok(scaled) => {
                    if let Some(found) = self.search_at(scaled, ImageFormat::Jpeg, percent).await? {
                        if found.len() <= target_bytes {
                            return Ok(Some(found));
                        }
                        best = smaller_of(best, Some(found));
                    }
                }
                Err(err) => warn!(percent, error = %err, "could not draw downscaled raster"),
            }

            self.pause().await;
        }

        Ok(best)
    }
}

/// Run a full target-size search with a fresh [`TargetSearch`].
pub async fn optimize_to_target<C: ImageCodec + ?Sized>(
    codec: &C,
    source: &SourceImage<'_>,
    target: Target,
    surface: &mut ScratchSurface,
    config: &SearchConfig,
) -> Result<SearchResult, SearchError> {
    TargetSearch::new(codec, target)
        .with_config(config)
        .run(source, surface)
        .await
}

/// Like [`optimize_to_target`], starting from encoded bytes whose format is
/// detected from their magic bytes.
///
/// The bytes are only decoded when the target is below their size.
pub async fn optimize_encoded<C: ImageCodec + ?Sized>(
    codec: &C,
    original: &[u8],
    target: Target,
    surface: &mut ScratchSurface,
    config: &SearchConfig,
) -> Result<SearchResult, OptimizeError> {
    let format = ImageFormat::sniff(original).unwrap_or(ImageFormat::Jpeg);
    optimize_encoded_as(codec, original, format, target, surface, config).await
}

/// Like [`optimize_encoded`] with the source format given by the caller.
///
/// When the original already fits, only its header is read so the result
/// still carries the real dimensions.
pub async fn optimize_encoded_as<C: ImageCodec + ?Sized>(
    codec: &C,
    original: &[u8],
    format: ImageFormat,
    target: Target,
    surface: &mut ScratchSurface,
    config: &SearchConfig,
) -> Result<SearchResult, OptimizeError> {
    if target.bytes() >= original.len() as u64 {
        let (width, height) = codec.read_dimensions(original).await?;
        info!(
            target = target.bytes(),
            original = original.len(),
            width,
            height,
            "original already fits the target"
        );
        let candidate = EncodingCandidate::untouched(original, format, width, height);
        return Ok(SearchResult::unchanged(candidate, target));
    }

    let raster = codec.decode(original).await?;
    let source = SourceImage::new(&raster, original, format);
    Ok(optimize_to_target(codec, &source, target, surface, config).await?)
}

/// Errors from [`optimize_encoded`].
#[derive(Debug, thiserror::Error)]
pub enum OptimizeError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

fn fits(candidate: &Option<EncodingCandidate>, target_bytes: u64) -> bool {
    candidate.as_ref().is_some_and(|c| c.len() <= target_bytes)
}

/// Prefer `next` when it is strictly smaller or `current` is missing.
fn smaller_of(
    current: Option<EncodingCandidate>,
    next: Option<EncodingCandidate>,
) -> Option<EncodingCandidate> {
    match (current, next) {
        (Some(current), Some(next)) if next.len() < current.len() => Some(next),
        (Some(current), _) => Some(current),
        (None, next) => next,
    }
}
