//! # Single-Image Compressor Module
//!
//! Turns one source file plus a settings snapshot into a `ProcessedImage`.
//!
//! ## Pipeline per file:
//! 1. Probe original dimensions
//! 2. Vector exception: SVG sources keep their bytes verbatim, since pushing
//!    them through the raster path would rasterize them
//! 3. Re-encode through the codec capability with the longest-edge bound,
//!    the quality fraction and the source's media type when it is a known
//!    raster type (never upscaling)
//! 4. Probe compressed dimensions
//! 5. Allocate a fresh preview handle for the compressed blob
//! 6. Assemble the result with a fresh identity
//!
//! Re-encoding is CPU-bound and runs on `tokio::task::spawn_blocking` so the
//! caller's task is never blocked. Failures in steps 1-4 propagate as
//! `CompressError::Decode`/`Encode` tagged with the source filename.

use crate::codec::{ImageCodec, ReencodeRequest};
use crate::config::CompressionSettings;
use crate::error::{CodecError, CompressError};
use crate::handle::DisplayHandles;
use crate::media::MediaType;
use crate::probe::probe_dimensions;
use crate::results::ProcessedImage;
use crate::source::SourceFile;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Compresses one source file at a time through the codec capability.
pub struct ImageCompressor {
    codec: Arc<dyn ImageCodec>,
    handles: Arc<dyn DisplayHandles>,
}

impl ImageCompressor {
    pub fn new(codec: Arc<dyn ImageCodec>, handles: Arc<dyn DisplayHandles>) -> Self {
        Self { codec, handles }
    }

    /// Compress a single source file under the given settings snapshot.
    pub async fn compress(
        &self,
        source: &SourceFile,
        settings: &CompressionSettings,
    ) -> Result<ProcessedImage, CompressError> {
        let original_dimensions = probe_dimensions(self.handles.as_ref(), &source.bytes)
            .map_err(|e| CompressError::from_codec(&source.name, e))?;

        let (blob, media_type): (Arc<[u8]>, MediaType) = if source.media_type == MediaType::Svg {
            debug!("vector source, skipping raster re-encode: {}", source.name);
            (source.bytes.clone(), MediaType::Svg)
        } else {
            let request = ReencodeRequest {
                target_longest_edge: settings.target_longest_edge(),
                quality: settings.quality,
                output_type: source
                    .media_type
                    .is_raster()
                    .then(|| source.media_type.clone()),
            };

            let codec = self.codec.clone();
            let bytes = source.bytes.clone();
            let encoded = tokio::task::spawn_blocking(move || codec.reencode(&bytes, &request))
                .await
                .map_err(|e| {
                    CompressError::from_codec(&source.name, CodecError::Encode(e.to_string()))
                })?
                .map_err(|e| CompressError::from_codec(&source.name, e))?;

            (Arc::from(encoded.bytes), encoded.media_type)
        };

        let compressed_dimensions = probe_dimensions(self.handles.as_ref(), &blob)
            .map_err(|e| CompressError::from_codec(&source.name, e))?;

        let preview = self.handles.create(blob.clone());

        debug!(
            "compressed {}: {} -> {} bytes, {}x{} -> {}x{}",
            source.name,
            source.size(),
            blob.len(),
            original_dimensions.width,
            original_dimensions.height,
            compressed_dimensions.width,
            compressed_dimensions.height,
        );

        Ok(ProcessedImage {
            id: Uuid::new_v4(),
            name: source.name.clone(),
            original_size: source.size(),
            compressed_size: blob.len() as u64,
            original_dimensions,
            compressed_dimensions,
            media_type,
            blob,
            preview,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::RasterCodec;
    use crate::handle::HandleRegistry;
    use crate::probe::Dimensions;
    use image::{DynamicImage, ImageOutputFormat, RgbImage};
    use std::io::Cursor;

    fn png_source(name: &str, width: u32, height: u32) -> SourceFile {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x * 7 % 256) as u8, (y * 3 % 256) as u8, 99])
        }));
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, ImageOutputFormat::Png).unwrap();
        SourceFile::new(name, cursor.into_inner())
    }

    fn compressor(registry: &Arc<HandleRegistry>) -> ImageCompressor {
        ImageCompressor::new(Arc::new(RasterCodec::new()), registry.clone())
    }

    fn settings(quality: f64, edge: u32) -> CompressionSettings {
        CompressionSettings {
            quality,
            max_width: edge,
            max_height: edge,
        }
    }

    #[tokio::test]
    async fn test_compress_resizes_and_records_metrics() {
        let registry = Arc::new(HandleRegistry::new());
        let compressor = compressor(&registry);
        let source = png_source("big.png", 800, 600);

        let result = compressor
            .compress(&source, &settings(0.7, 400))
            .await
            .unwrap();

        assert_eq!(result.name, "big.png");
        assert_eq!(result.original_size, source.size());
        assert_eq!(result.compressed_size, result.blob.len() as u64);
        assert_eq!(result.original_dimensions, Dimensions { width: 800, height: 600 });
        assert_eq!(result.compressed_dimensions, Dimensions { width: 400, height: 300 });
        assert_eq!(result.media_type, MediaType::Png);

        // The preview handle is live and resolves to the compressed blob
        assert_eq!(
            registry.resolve(result.preview).as_deref(),
            Some(result.blob.as_ref())
        );
        assert_eq!(registry.live_count(), 1);
    }

    #[tokio::test]
    async fn test_svg_passthrough_is_verbatim() {
        let registry = Arc::new(HandleRegistry::new());
        let compressor = compressor(&registry);
        let svg = br#"<svg width="50" height="40" xmlns="http://www.w3.org/2000/svg"/>"#;
        let source = SourceFile::new("logo.svg", svg.to_vec());

        let result = compressor
            .compress(&source, &settings(0.3, 320))
            .await
            .unwrap();

        assert_eq!(result.compressed_size, result.original_size);
        assert_eq!(result.blob.as_ref(), svg.as_ref());
        assert_eq!(result.original_dimensions, result.compressed_dimensions);
        assert_eq!(result.media_type, MediaType::Svg);
    }

    #[tokio::test]
    async fn test_each_result_gets_a_fresh_identity() {
        let registry = Arc::new(HandleRegistry::new());
        let compressor = compressor(&registry);
        let source = png_source("twice.png", 40, 40);

        let a = compressor.compress(&source, &settings(0.7, 320)).await.unwrap();
        let b = compressor.compress(&source, &settings(0.7, 320)).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.preview, b.preview);
    }

    #[tokio::test]
    async fn test_decode_failure_is_tagged_with_filename() {
        let registry = Arc::new(HandleRegistry::new());
        let compressor = compressor(&registry);
        let source = SourceFile::new("broken.png", b"garbage bytes".to_vec());

        let err = compressor
            .compress(&source, &settings(0.7, 320))
            .await
            .unwrap_err();
        assert!(matches!(err, CompressError::Decode { ref name, .. } if name == "broken.png"));
        // No handle may leak on the failure path
        assert_eq!(registry.live_count(), 0);
    }

    #[tokio::test]
    async fn test_rerun_with_same_settings_is_dimension_idempotent() {
        let registry = Arc::new(HandleRegistry::new());
        let compressor = compressor(&registry);
        let source = png_source("stable.png", 640, 480);
        let settings = settings(0.8, 320);

        let a = compressor.compress(&source, &settings).await.unwrap();
        let b = compressor.compress(&source, &settings).await.unwrap();
        assert_eq!(a.compressed_dimensions, b.compressed_dimensions);
        assert_eq!(a.compressed_size, b.compressed_size);
    }
}
