//! # Image Codec Module
//!
//! The re-encode capability consumed by the single-image compressor.
//!
//! ## Responsibilities:
//! - `ImageCodec` capability trait: `(blob, request) -> encoded blob`
//! - `RasterCodec` default implementation backed by the `image` crate
//! - Bounded longest-edge resizing with preserved aspect ratio
//!
//! ## Re-encode semantics:
//! - The target longest edge, when present, only ever shrinks the image; the
//!   codec never upscales
//! - Quality is a fraction in (0.0, 1.0], mapped to the encoder's 1-100 scale
//! - JPEG output honors the quality setting; PNG, GIF and WebP re-encodes are
//!   lossless so quality is ignored for them
//! - When no output type is requested the codec keeps the format it detected
//!   in the input blob
//!
//! Decoding and encoding are CPU-bound; callers are expected to run
//! `reencode` on a blocking-friendly context (`tokio::task::spawn_blocking`).

use crate::error::CodecError;
use crate::media::MediaType;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{ColorType, GenericImageView, ImageFormat, ImageOutputFormat};
use std::io::Cursor;

/// Parameters for one re-encode call.
#[derive(Debug, Clone)]
pub struct ReencodeRequest {
    /// Cap on the longest output edge in pixels; `None` leaves size untouched.
    pub target_longest_edge: Option<u32>,
    /// Output quality as a fraction (0.0 < q <= 1.0).
    pub quality: f64,
    /// Requested output type; `None` lets the codec infer from the blob.
    pub output_type: Option<MediaType>,
}

/// A re-encoded blob together with the media type it was written as.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub media_type: MediaType,
}

/// Capability that decodes, resizes and re-encodes a raster image blob.
pub trait ImageCodec: Send + Sync {
    fn reencode(&self, blob: &[u8], request: &ReencodeRequest) -> Result<EncodedImage, CodecError>;
}

/// Default codec backed by the `image` crate.
#[derive(Default)]
pub struct RasterCodec;

impl RasterCodec {
    pub fn new() -> Self {
        Self
    }
}

impl ImageCodec for RasterCodec {
    fn reencode(&self, blob: &[u8], request: &ReencodeRequest) -> Result<EncodedImage, CodecError> {
        let reader = image::io::Reader::new(Cursor::new(blob))
            .with_guessed_format()
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        let input_format = reader
            .format()
            .ok_or_else(|| CodecError::Decode("unrecognized image format".to_string()))?;
        let mut img = reader
            .decode()
            .map_err(|e| CodecError::Decode(e.to_string()))?;

        if let Some(edge) = request.target_longest_edge {
            let (width, height) = img.dimensions();
            if edge > 0 && width.max(height) > edge {
                let (new_width, new_height) = resized_dimensions(width, height, edge);
                img = img.resize_exact(new_width, new_height, FilterType::Lanczos3);
            }
        }

        let media_type = match &request.output_type {
            Some(requested) => requested.clone(),
            None => media_type_for_format(input_format),
        };

        let mut cursor = Cursor::new(Vec::new());
        match media_type {
            MediaType::Jpeg => {
                // JPEG has no alpha channel
                let rgb = img.to_rgb8();
                let mut encoder =
                    JpegEncoder::new_with_quality(&mut cursor, quality_percent(request.quality));
                encoder
                    .encode_image(&rgb)
                    .map_err(|e| CodecError::Encode(e.to_string()))?;
            }
            MediaType::Png => {
                img.write_to(&mut cursor, ImageOutputFormat::Png)
                    .map_err(|e| CodecError::Encode(e.to_string()))?;
            }
            MediaType::Gif => {
                img.write_to(&mut cursor, ImageOutputFormat::Gif)
                    .map_err(|e| CodecError::Encode(e.to_string()))?;
            }
            MediaType::WebP => {
                let rgba = img.to_rgba8();
                let (width, height) = rgba.dimensions();
                WebPEncoder::new_lossless(&mut cursor)
                    .encode(rgba.as_raw(), width, height, ColorType::Rgba8)
                    .map_err(|e| CodecError::Encode(e.to_string()))?;
            }
            other => {
                return Err(CodecError::Encode(format!(
                    "unsupported output type: {}",
                    other
                )));
            }
        }

        Ok(EncodedImage {
            bytes: cursor.into_inner(),
            media_type,
        })
    }
}

/// Output dimensions for a longest-edge cap, aspect ratio preserved.
///
/// The shorter edge is rounded to the nearest pixel and never drops below 1.
pub(crate) fn resized_dimensions(width: u32, height: u32, edge: u32) -> (u32, u32) {
    if width >= height {
        let scaled = (edge as f64 * height as f64 / width as f64).round() as u32;
        (edge, scaled.max(1))
    } else {
        let scaled = (edge as f64 * width as f64 / height as f64).round() as u32;
        (scaled.max(1), edge)
    }
}

/// Map the quality fraction to the 1-100 scale used by the JPEG encoder.
fn quality_percent(quality: f64) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

fn media_type_for_format(format: ImageFormat) -> MediaType {
    match format {
        ImageFormat::Jpeg => MediaType::Jpeg,
        ImageFormat::Png => MediaType::Png,
        ImageFormat::WebP => MediaType::WebP,
        ImageFormat::Gif => MediaType::Gif,
        // Decodable but not an output target: fall back to JPEG
        _ => MediaType::Jpeg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn png_blob(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 37])
        }));
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, ImageOutputFormat::Png).unwrap();
        cursor.into_inner()
    }

    fn decoded_dimensions(blob: &[u8]) -> (u32, u32) {
        image::load_from_memory(blob).unwrap().dimensions()
    }

    #[test]
    fn test_resized_dimensions_rounding() {
        assert_eq!(resized_dimensions(4000, 3000, 1920), (1920, 1440));
        assert_eq!(resized_dimensions(3000, 4000, 1920), (1440, 1920));
        assert_eq!(resized_dimensions(10_000, 1, 100), (100, 1));
    }

    #[test]
    fn test_reencode_caps_longest_edge() {
        let codec = RasterCodec::new();
        let request = ReencodeRequest {
            target_longest_edge: Some(200),
            quality: 0.7,
            output_type: Some(MediaType::Png),
        };
        let encoded = codec.reencode(&png_blob(400, 300), &request).unwrap();
        assert_eq!(encoded.media_type, MediaType::Png);
        assert_eq!(decoded_dimensions(&encoded.bytes), (200, 150));
    }

    #[test]
    fn test_reencode_never_upscales() {
        let codec = RasterCodec::new();
        let request = ReencodeRequest {
            target_longest_edge: Some(2000),
            quality: 0.7,
            output_type: Some(MediaType::Png),
        };
        let encoded = codec.reencode(&png_blob(400, 300), &request).unwrap();
        assert_eq!(decoded_dimensions(&encoded.bytes), (400, 300));
    }

    #[test]
    fn test_reencode_to_jpeg_with_quality() {
        let codec = RasterCodec::new();
        let request = ReencodeRequest {
            target_longest_edge: None,
            quality: 0.5,
            output_type: Some(MediaType::Jpeg),
        };
        let encoded = codec.reencode(&png_blob(120, 80), &request).unwrap();
        assert_eq!(encoded.media_type, MediaType::Jpeg);
        assert_eq!(decoded_dimensions(&encoded.bytes), (120, 80));
    }

    #[test]
    fn test_reencode_infers_type_from_blob() {
        let codec = RasterCodec::new();
        let request = ReencodeRequest {
            target_longest_edge: None,
            quality: 0.7,
            output_type: None,
        };
        let encoded = codec.reencode(&png_blob(32, 32), &request).unwrap();
        assert_eq!(encoded.media_type, MediaType::Png);
    }

    #[test]
    fn test_reencode_rejects_garbage() {
        let codec = RasterCodec::new();
        let request = ReencodeRequest {
            target_longest_edge: None,
            quality: 0.7,
            output_type: None,
        };
        assert!(matches!(
            codec.reencode(b"not an image", &request),
            Err(CodecError::Decode(_))
        ));
    }

    #[test]
    fn test_quality_percent_mapping() {
        assert_eq!(quality_percent(0.7), 70);
        assert_eq!(quality_percent(1.0), 100);
        assert_eq!(quality_percent(0.004), 1);
    }
}
