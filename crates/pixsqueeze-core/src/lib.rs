//! Pixsqueeze Core - image compression library
//!
//! This crate provides the core functionality for pixsqueeze: decoding
//! uploads, fixed-quality compression, and a search that re-encodes an image
//! to land as close as possible to a byte budget.

pub mod batch;
pub mod codec;
pub mod compress;
pub mod config;
pub mod decode;
pub mod encode;
pub mod search;
pub mod stats;

#[cfg(test)]
mod testing;

pub use batch::{compressed_name, BatchError, BatchItem, BulkReport, CachedResult, ImageBatch};
pub use codec::{ImageCodec, ImageCrateCodec, ScratchSurface};
pub use compress::compress_at_quality;
pub use config::SearchConfig;
pub use encode::{ImageFormat, Quality};
pub use search::{
    optimize_encoded, optimize_encoded_as, optimize_to_target, EncodingCandidate, SearchError,
    SearchResult, SourceImage, Target, TargetStatus,
};
pub use stats::{compute_reduction, format_bytes, format_stats};
