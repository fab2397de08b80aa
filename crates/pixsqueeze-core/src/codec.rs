//! The codec capability the search runs against, and its scratch surface.
//!
//! [`ImageCodec`] is the seam between the search and whatever actually turns
//! pixels into bytes. [`ImageCrateCodec`] is the bundled implementation; hosts
//! with a native encoder (a browser canvas, a GPU encoder) can provide their
//! own.

use async_trait::async_trait;

use crate::decode::{self, DecodeError, FilterType, RasterImage};
use crate::encode::{self, EncodeError, ImageFormat, Quality};

/// Decode and encode capability.
///
/// Output size must be a pure function of (raster, format, quality); the
/// search relies on it.
#[async_trait]
pub trait ImageCodec: Send + Sync {
    /// Decode encoded bytes into an RGBA raster in display orientation.
    async fn decode(&self, bytes: &[u8]) -> Result<RasterImage, DecodeError>;

    /// Encode a raster. `quality` is ignored by lossless formats.
    async fn encode(
        &self,
        raster: &RasterImage,
        format: ImageFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, EncodeError>;

    /// Display dimensions of encoded bytes. Falls back to a full decode.
    async fn read_dimensions(&self, bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
        let raster = self.decode(bytes).await?;
        Ok((raster.width, raster.height))
    }
}

/// [`ImageCodec`] backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateCodec;

impl ImageCrateCodec {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageCodec for ImageCrateCodec {
    async fn decode(&self, bytes: &[u8]) -> Result<RasterImage, DecodeError> {
        decode::decode_image(bytes)
    }

    async fn encode(
        &self,
        raster: &RasterImage,
        format: ImageFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, EncodeError> {
        encode::encode(raster, format, quality)
    }

    async fn read_dimensions(&self, bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
        decode::read_dimensions(bytes)
    }
}

/// Raster surface that holds the current downscaled frame.
///
/// A search borrows the surface mutably for its whole duration, so one
/// surface can never serve two in-flight searches. Each draw replaces the
/// previous frame.
#[derive(Debug, Default)]
pub struct ScratchSurface {
    raster: RasterImage,
}

impl ScratchSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw `source` scaled to `width` x `height`, replacing the previous
    /// frame.
    pub fn draw_scaled(
        &mut self,
        source: &RasterImage,
        width: u32,
        height: u32,
        filter: FilterType,
    ) -> Result<&RasterImage, DecodeError> {
        self.raster = decode::resize(source, width, height, filter)?;
        Ok(&self.raster)
    }

    /// Current surface contents.
    pub fn raster(&self) -> &RasterImage {
        &self.raster
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.raster.width, self.raster.height)
    }
}
