//! Target-size quality search.
//!
//! Given a decoded image and a byte budget, find the re-encoding (quality,
//! format, and if needed a smaller resolution) whose size best approaches the
//! budget.
//!
//! # Stages
//!
//! 1. **Bisection** ([`TargetSearch::search_quality`]): up to 12 rounds over
//!    quality 1-100 at native resolution, returning early once a candidate is
//!    within tolerance (2% of the target, at least 1 KiB).
//! 2. **Format fallback**: a lossless source that misses is retried as JPEG.
//! 3. **Downscaling**: 90%, 80%, ..., 40% of the original linear size, each
//!    step bisected again, until something fits.
//!
//! The search is async and yields to the scheduler between rounds so that a
//! single-threaded host stays responsive. Encode failures are absorbed round
//! by round; only a search where nothing could be encoded fails.
//!
//! # Examples
//!
//! ```ignore
//! use pixsqueeze_core::codec::{ImageCrateCodec, ScratchSurface};
//! use pixsqueeze_core::search::{optimize_to_target, SourceImage, Target};
//!
//! let codec = ImageCrateCodec::new();
//! let mut surface = ScratchSurface::new();
//! let source = SourceImage::sniffed(&raster, &original_bytes);
//! let target = Target::from_kb(100)?;
//! let result = optimize_to_target(&codec, &source, target, &mut surface, &config).await?;
//! println!("{} bytes at {}", result.candidate.len(), result.candidate.quality);
//! ```

mod bisect;
mod optimize;
mod types;

pub use bisect::TargetSearch;
pub use optimize::{optimize_encoded, optimize_encoded_as, optimize_to_target, OptimizeError};
pub use types::{
    CancelFlag, CandidateOrigin, EncodingCandidate, SearchError, SearchResult, SourceImage, Target,
    TargetStatus,
};
