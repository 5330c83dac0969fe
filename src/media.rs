//! # Media Type Module
//!
//! Declared media types for source and compressed blobs.
//!
//! ## Responsibilities:
//! - Identify a media type from a file extension (case-insensitive)
//! - Classify types as image vs non-image, raster vs vector
//! - Map a type to its MIME essence and preferred output extension
//!
//! The vector exception matters for the compression pipeline: SVG sources are
//! never pushed through the raster re-encode path, since rasterizing them would
//! destroy resolution independence.

use std::fmt;

/// Declared media type of a byte blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaType {
    Jpeg,
    Png,
    WebP,
    Gif,
    /// Scalable vector graphics, passed through verbatim by the compressor.
    Svg,
    /// Anything else, carried as its MIME essence string.
    Other(String),
}

impl MediaType {
    /// Determine the media type from a filename's extension.
    pub fn from_filename(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            "webp" => Self::WebP,
            "gif" => Self::Gif,
            "svg" => Self::Svg,
            _ => Self::Other("application/octet-stream".to_string()),
        }
    }

    /// MIME essence string for this type.
    pub fn essence(&self) -> &str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
            Self::Svg => "image/svg+xml",
            Self::Other(essence) => essence,
        }
    }

    /// Check if this type is an image type (raster or vector).
    pub fn is_image(&self) -> bool {
        match self {
            Self::Jpeg | Self::Png | Self::WebP | Self::Gif | Self::Svg => true,
            Self::Other(essence) => essence.starts_with("image/"),
        }
    }

    /// Check if this type goes through the raster re-encode path.
    pub fn is_raster(&self) -> bool {
        matches!(self, Self::Jpeg | Self::Png | Self::WebP | Self::Gif)
    }

    /// Preferred file extension for blobs of this type, if one is known.
    pub fn extension(&self) -> Option<&str> {
        match self {
            Self::Jpeg => Some("jpg"),
            Self::Png => Some("png"),
            Self::WebP => Some("webp"),
            Self::Gif => Some("gif"),
            Self::Svg => Some("svg"),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.essence())
    }
}
