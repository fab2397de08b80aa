//! Fixed-quality compression.
//!
//! Below 100% everything is re-encoded as JPEG. At 100% the compressor tries
//! a lossless re-encode (PNG sources only) and then JPEG at maximum quality,
//! keeping whichever is first to beat the original; if neither does, the
//! original is returned untouched. Compression at full quality therefore never
//! grows a file.

use tracing::{debug, warn};

use crate::codec::ImageCodec;
use crate::encode::{ImageFormat, Quality};
use crate::search::{CandidateOrigin, EncodingCandidate, SourceImage};

/// Compress `source` at a fixed quality.
///
/// Encode failures fall back to the original, so this never fails.
pub async fn compress_at_quality<C: ImageCodec + ?Sized>(
    codec: &C,
    source: &SourceImage<'_>,
    quality: Quality,
) -> EncodingCandidate {
    if quality.is_max() {
        return compress_lossless_first(codec, source).await;
    }

    match encode_as(codec, source, ImageFormat::Jpeg, quality).await {
        Some(candidate) => candidate,
        None => EncodingCandidate::original(source),
    }
}

async fn compress_lossless_first<C: ImageCodec + ?Sized>(
    codec: &C,
    source: &SourceImage<'_>,
) -> EncodingCandidate {
    let original_len = source.original_len();

    if source.format.is_lossless() {
        if let Some(candidate) = encode_as(codec, source, source.format, Quality::MAX).await {
            if candidate.len() < original_len {
                return candidate;
            }
            debug!(size = candidate.len(), original_len, "lossless re-encode is not smaller");
        }
    }

    if let Some(candidate) = encode_as(codec, source, ImageFormat::Jpeg, Quality::MAX).await {
        if candidate.len() < original_len {
            return candidate;
        }
        debug!(size = candidate.len(), original_len, "full-quality JPEG is not smaller");
    }

    EncodingCandidate::original(source)
}

async fn encode_as<C: ImageCodec + ?Sized>(
    codec: &C,
    source: &SourceImage<'_>,
    format: ImageFormat,
    quality: Quality,
) -> Option<EncodingCandidate> {
    match codec.encode(source.raster, format, quality).await {
        Ok(bytes) if !bytes.is_empty() => Some(EncodingCandidate {
            quality,
            format,
            width: source.raster.width,
            height: source.raster.height,
            scale_percent: 100,
            bytes,
            origin: CandidateOrigin::Reencoded,
        }),
        Ok(_) => {
            warn!(%format, "encoder produced no output");
            None
        }
        Err(err) => {
            warn!(%format, error = %err, "compression failed");
            None
        }
    }
}
