//! Deterministic in-memory codec for tests.
//!
//! Output length is a closed-form function of (format, quality, pixel count),
//! so search scenarios on multi-megapixel rasters run without real encoding.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use crate::codec::ImageCodec;
use crate::decode::{DecodeError, RasterImage};
use crate::encode::{EncodeError, ImageFormat, Quality};

pub(crate) struct FakeCodec {
    /// Fixed container overhead per file.
    pub header: f64,
    /// JPEG bytes per pixel at quality zero.
    pub jpeg_base: f64,
    /// Additional JPEG bytes per pixel per quality point.
    pub jpeg_per_quality: f64,
    /// PNG bytes per pixel.
    pub png_per_pixel: f64,
    /// Odd qualities get a large bump, breaking monotonicity.
    pub sawtooth: bool,
    /// Every encode fails.
    pub fail: bool,
    /// Raster handed back by `decode`.
    pub decoded: RasterImage,
    calls: AtomicU32,
    decodes: AtomicU32,
}

impl FakeCodec {
    pub fn new() -> Self {
        Self {
            header: 600.0,
            jpeg_base: 0.002,
            jpeg_per_quality: 0.0005,
            png_per_pixel: 0.125,
            sawtooth: false,
            fail: false,
            decoded: RasterImage::filled(4, 4, [0, 0, 0, 255]),
            calls: AtomicU32::new(0),
            decodes: AtomicU32::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn decoding_to(raster: RasterImage) -> Self {
        Self {
            decoded: raster,
            ..Self::new()
        }
    }

    /// Encode calls so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn decodes(&self) -> u32 {
        self.decodes.load(Ordering::SeqCst)
    }

    pub fn jpeg_size(&self, raster: &RasterImage, quality: Quality) -> usize {
        let pixels = raster.pixel_count() as f64;
        let q = f64::from(quality.get());
        let mut size = self.header + pixels * (self.jpeg_base + self.jpeg_per_quality * q);
        if self.sawtooth && quality.get() % 2 == 1 {
            size += pixels * 0.02;
        }
        size.round() as usize
    }

    pub fn png_size(&self, raster: &RasterImage) -> usize {
        (self.header + raster.pixel_count() as f64 * self.png_per_pixel).round() as usize
    }
}

#[async_trait]
impl ImageCodec for FakeCodec {
    async fn decode(&self, _bytes: &[u8]) -> Result<RasterImage, DecodeError> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        Ok(self.decoded.clone())
    }

    async fn encode(
        &self,
        raster: &RasterImage,
        format: ImageFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, EncodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EncodeError::EncodingFailed {
                format,
                message: "fake failure".to_string(),
            });
        }
        let size = match format {
            ImageFormat::Jpeg => self.jpeg_size(raster, quality),
            ImageFormat::Png => self.png_size(raster),
        };
        Ok(vec![0u8; size])
    }

    async fn read_dimensions(&self, _bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
        Ok((self.decoded.width, self.decoded.height))
    }
}
