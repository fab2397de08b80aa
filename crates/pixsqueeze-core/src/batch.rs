//! The list of uploaded images and their cached compression results.
//!
//! Each item remembers the last result it was compressed to, keyed by
//! quality, so moving back and forth in the UI does not re-encode.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::codec::{ImageCodec, ImageCrateCodec, ScratchSurface};
use crate::compress::compress_at_quality;
use crate::config::SearchConfig;
use crate::decode::DecodeError;
use crate::encode::{ImageFormat, Quality};
use crate::search::{
    optimize_encoded_as, EncodingCandidate, OptimizeError, SearchError, SearchResult, SourceImage,
    Target,
};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("No image with id {0}")]
    UnknownItem(String),

    #[error("{0} is not an image")]
    NotAnImage(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

impl From<OptimizeError> for BatchError {
    fn from(err: OptimizeError) -> Self {
        match err {
            OptimizeError::Decode(err) => BatchError::Decode(err),
            OptimizeError::Search(err) => BatchError::Search(err),
        }
    }
}

/// A cached compression result and the quality it was produced at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResult {
    pub quality: Quality,
    pub candidate: EncodingCandidate,
}

/// One uploaded image.
#[derive(Debug, Clone)]
pub struct BatchItem {
    id: String,
    name: String,
    original: Vec<u8>,
    format: ImageFormat,
    cached: Option<CachedResult>,
}

impl BatchItem {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn original(&self) -> &[u8] {
        &self.original
    }

    pub fn original_len(&self) -> u64 {
        self.original.len() as u64
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn cached(&self) -> Option<&CachedResult> {
        self.cached.as_ref()
    }

    /// A result has been computed for this item.
    pub fn is_compressed(&self) -> bool {
        self.cached.is_some()
    }

    /// The cached result is strictly smaller than the upload.
    pub fn is_smaller(&self) -> bool {
        self.cached
            .as_ref()
            .is_some_and(|c| c.candidate.len() < self.original_len())
    }

    /// Download name for the cached result: `photo.png` becomes
    /// `photo-compressed.jpg` when the result is JPEG.
    pub fn compressed_name(&self) -> String {
        let format = self
            .cached
            .as_ref()
            .map_or(self.format, |c| c.candidate.format);
        compressed_name(&self.name, self.format, format)
    }
}

/// Build the download name for a compressed file.
///
/// `-compressed` goes in front of the last extension, which is kept when the
/// format did not change and replaced when it did. A leading dot counts as an
/// extension, so `.hidden` becomes `-compressed.hidden`. Names without an
/// extension get one appended.
pub fn compressed_name(name: &str, original: ImageFormat, output: ImageFormat) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => {
            if original == output {
                format!("{stem}-compressed.{ext}")
            } else {
                format!("{stem}-compressed.{}", output.extension())
            }
        }
        _ => format!("{name}-compressed.{}", output.extension()),
    }
}

/// Outcome of [`ImageBatch::compress_all`].
#[derive(Debug, Default)]
pub struct BulkReport {
    pub compressed: usize,
    pub failed: Vec<(String, BatchError)>,
}

/// The flat list of uploaded images.
pub struct ImageBatch<C: ImageCodec = ImageCrateCodec> {
    codec: C,
    config: SearchConfig,
    surface: ScratchSurface,
    items: Vec<BatchItem>,
    next_id: u64,
}

impl ImageBatch<ImageCrateCodec> {
    pub fn new() -> Self {
        Self::with_codec(ImageCrateCodec::new())
    }
}

impl Default for ImageBatch<ImageCrateCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ImageCodec> ImageBatch<C> {
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            config: SearchConfig::default(),
            surface: ScratchSurface::new(),
            items: Vec::new(),
            next_id: 1,
        }
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config.validated();
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Add an upload and return its id.
    ///
    /// `mime` is the browser-reported type; uploads whose type does not start
    /// with `image/` are rejected. Without a type the format is sniffed.
    pub fn add(
        &mut self,
        name: &str,
        bytes: Vec<u8>,
        mime: Option<&str>,
    ) -> Result<String, BatchError> {
        let format = match mime {
            Some(mime) if !mime.starts_with("image/") => {
                return Err(BatchError::NotAnImage(name.to_string()));
            }
            Some(mime) => ImageFormat::from_mime(mime),
            None => ImageFormat::sniff(&bytes)
                .ok_or_else(|| BatchError::NotAnImage(name.to_string()))?,
        };

        let id = format!("img-{}", self.next_id);
        self.next_id += 1;
        debug!(%id, name, size = bytes.len(), %format, "image added");

        self.items.push(BatchItem {
            id: id.clone(),
            name: name.to_string(),
            original: bytes,
            format,
            cached: None,
        });
        Ok(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<BatchItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn get(&self, id: &str) -> Option<&BatchItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[BatchItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Compressed result for `id` at `quality`, reusing the cache when the
    /// quality matches.
    pub async fn ensure_compressed(
        &mut self,
        id: &str,
        quality: Quality,
    ) -> Result<&CachedResult, BatchError> {
        let index = self.index_of(id)?;

        let cache_hit = self.items[index]
            .cached
            .as_ref()
            .is_some_and(|c| c.quality == quality);

        if !cache_hit {
            let item = &self.items[index];
            let raster = self.codec.decode(&item.original).await?;
            let source = SourceImage::new(&raster, &item.original, item.format);
            let candidate = compress_at_quality(&self.codec, &source, quality).await;

            self.items[index].cached = Some(CachedResult { quality, candidate });
        }

        self.items[index]
            .cached
            .as_ref()
            .ok_or_else(|| BatchError::UnknownItem(id.to_string()))
    }

    /// Run a target-size search for `id` and cache the result at the quality
    /// it settled on.
    pub async fn optimize_item(
        &mut self,
        id: &str,
        target: Target,
    ) -> Result<SearchResult, BatchError> {
        let index = self.index_of(id)?;
        let item = &self.items[index];

        let result = optimize_encoded_as(
            &self.codec,
            &item.original,
            item.format,
            target,
            &mut self.surface,
            &self.config,
        )
        .await?;

        self.items[index].cached = Some(CachedResult {
            quality: result.candidate.quality,
            candidate: result.candidate.clone(),
        });
        Ok(result)
    }

    /// Compress every item at `quality`, one after another. A failing item
    /// is reported and skipped.
    pub async fn compress_all(&mut self, quality: Quality) -> BulkReport {
        let ids: Vec<String> = self.items.iter().map(|item| item.id.clone()).collect();
        let mut report = BulkReport::default();

        for id in ids {
            match self.ensure_compressed(&id, quality).await {
                Ok(_) => report.compressed += 1,
                Err(err) => {
                    warn!(%id, error = %err, "failed to compress item");
                    report.failed.push((id, err));
                }
            }
        }

        info!(
            compressed = report.compressed,
            failed = report.failed.len(),
            quality = quality.get(),
            "bulk compression finished"
        );
        report
    }

    fn index_of(&self, id: &str) -> Result<usize, BatchError> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| BatchError::UnknownItem(id.to_string()))
    }
}
