//! Types shared by the bisection and escalation stages.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::config::SearchConfig;
use crate::decode::RasterImage;
use crate::encode::{ImageFormat, Quality};

/// Failures surfaced by a target-size search.
///
/// A single failed encode is never an error; it only counts as an unusable
/// round. Missing the target is not an error either, see
/// [`TargetStatus::ClosestPossible`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("Target size must be a positive number of bytes")]
    InvalidTarget,

    /// No encode attempt produced any output.
    #[error("Could not produce any candidate after {attempts} encode attempts")]
    SearchExhausted { attempts: u32 },

    #[error("Search was cancelled")]
    Cancelled,
}

/// The byte budget a search aims for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    bytes: u64,
    tolerance: u64,
}

impl Target {
    /// Target with the default tolerance: 2% of the target, at least 1 KiB.
    pub fn new(bytes: u64) -> Result<Self, SearchError> {
        Self::with_config(bytes, &SearchConfig::default())
    }

    /// Target whose tolerance follows `config`.
    pub fn with_config(bytes: u64, config: &SearchConfig) -> Result<Self, SearchError> {
        if bytes == 0 {
            return Err(SearchError::InvalidTarget);
        }
        let config = config.validated();
        let proportional = (bytes as f64 * config.tolerance_ratio).round() as u64;
        Ok(Self {
            bytes,
            tolerance: proportional.max(config.min_tolerance),
        })
    }

    /// Target given in kilobytes (1 KB = 1024 bytes).
    pub fn from_kb(kb: u64) -> Result<Self, SearchError> {
        Self::new(kb.saturating_mul(1024))
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn tolerance(&self) -> u64 {
        self.tolerance
    }

    pub fn within_tolerance(&self, size: u64) -> bool {
        size.abs_diff(self.bytes) <= self.tolerance
    }

    pub fn is_met_by(&self, size: u64) -> bool {
        size <= self.bytes
    }
}

/// Where a candidate's bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOrigin {
    /// The caller's original file, untouched.
    Original,
    /// Output of an encode attempt.
    Reencoded,
}

/// One encode attempt's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingCandidate {
    pub quality: Quality,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    /// Linear scale relative to the source, in percent.
    pub scale_percent: u8,
    pub bytes: Vec<u8>,
    pub origin: CandidateOrigin,
}

impl EncodingCandidate {
    /// Wrap the source's original bytes as a full-quality candidate.
    pub fn original(source: &SourceImage<'_>) -> Self {
        Self::untouched(
            source.original,
            source.format,
            source.raster.width,
            source.raster.height,
        )
    }

    /// Wrap encoded bytes that were never decoded. The dimensions come from
    /// the caller, typically read from the file header.
    pub fn untouched(original: &[u8], format: ImageFormat, width: u32, height: u32) -> Self {
        Self {
            quality: Quality::MAX,
            format,
            width,
            height,
            scale_percent: 100,
            bytes: original.to_vec(),
            origin: CandidateOrigin::Original,
        }
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_original(&self) -> bool {
        self.origin == CandidateOrigin::Original
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// The image a search works on. Borrowed; the caller keeps ownership.
#[derive(Debug, Clone, Copy)]
pub struct SourceImage<'a> {
    pub raster: &'a RasterImage,
    pub original: &'a [u8],
    pub format: ImageFormat,
}

impl<'a> SourceImage<'a> {
    pub fn new(raster: &'a RasterImage, original: &'a [u8], format: ImageFormat) -> Self {
        Self {
            raster,
            original,
            format,
        }
    }

    /// Build a source, detecting the format from the original bytes.
    /// Unrecognized data is treated as JPEG.
    pub fn sniffed(raster: &'a RasterImage, original: &'a [u8]) -> Self {
        let format = ImageFormat::sniff(original).unwrap_or(ImageFormat::Jpeg);
        Self::new(raster, original, format)
    }

    pub fn original_len(&self) -> u64 {
        self.original.len() as u64
    }
}

/// How the chosen candidate relates to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    /// The original already fit the budget and is returned as-is.
    Unchanged,
    /// The candidate is at or under the target.
    Met,
    /// Every option exceeded the target; this is the closest one found.
    ClosestPossible,
}

/// Outcome of a successful target-size search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub candidate: EncodingCandidate,
    pub status: TargetStatus,
    pub target: Target,
    /// Encode calls spent, failed ones included.
    pub encode_calls: u32,
    /// Whether any pass saw a higher quality produce smaller output than a
    /// lower one.
    pub non_monotonic: bool,
}

impl SearchResult {
    /// Result for an original that already fits: nothing was encoded.
    pub fn unchanged(candidate: EncodingCandidate, target: Target) -> Self {
        Self {
            candidate,
            status: TargetStatus::Unchanged,
            target,
            encode_calls: 0,
            non_monotonic: false,
        }
    }

    pub fn within_tolerance(&self) -> bool {
        self.target.within_tolerance(self.candidate.len())
    }

    pub fn meets_target(&self) -> bool {
        self.status != TargetStatus::ClosestPossible
    }
}

/// Shared flag a caller can set to stop a running search between rounds.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
