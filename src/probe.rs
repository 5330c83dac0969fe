//! # Dimension Prober Module
//!
//! Reads the natural pixel dimensions of an image blob without a full decode.
//!
//! ## Contract:
//! - Raster formats are probed through the image decoding facility (header
//!   read only)
//! - SVG blobs are probed from the root tag's `width`/`height` attributes,
//!   falling back to the `viewBox`, then to 0x0 when the document declares no
//!   intrinsic size
//! - A scoped display handle is allocated for the duration of the probe and
//!   released on every exit path, success or failure
//! - Unrecognizable blobs fail with `CodecError::Decode`

use crate::error::CodecError;
use crate::handle::{DisplayHandles, ScopedHandle};
use std::io::Cursor;
use std::sync::Arc;

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// The larger of width and height.
    pub fn longest_edge(&self) -> u32 {
        self.width.max(self.height)
    }
}

/// Probe the natural dimensions of an image blob.
pub fn probe_dimensions(
    handles: &dyn DisplayHandles,
    blob: &Arc<[u8]>,
) -> Result<Dimensions, CodecError> {
    // Held for the whole probe; Drop releases it on both the error and the
    // success path.
    let _scope = ScopedHandle::new(handles, blob.clone());

    let reader = image::io::Reader::new(Cursor::new(blob.as_ref()))
        .with_guessed_format()
        .map_err(|e| CodecError::Decode(e.to_string()))?;

    if reader.format().is_some() {
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        return Ok(Dimensions { width, height });
    }

    if looks_like_svg(blob) {
        return Ok(svg_dimensions(blob));
    }

    Err(CodecError::Decode(
        "blob is not recognizable image data".to_string(),
    ))
}

/// Sniff for an SVG root tag near the start of the blob.
fn looks_like_svg(blob: &[u8]) -> bool {
    let head = &blob[..blob.len().min(1024)];
    String::from_utf8_lossy(head).contains("<svg")
}

/// Extract declared dimensions from an SVG document.
///
/// Prefers explicit `width`/`height` attributes, falls back to the `viewBox`
/// extent, and reports 0x0 when neither is declared.
fn svg_dimensions(blob: &[u8]) -> Dimensions {
    let text = String::from_utf8_lossy(blob);
    let tag = match svg_root_tag(&text) {
        Some(tag) => tag,
        None => return Dimensions { width: 0, height: 0 },
    };

    let width = attribute(tag, "width").and_then(parse_length);
    let height = attribute(tag, "height").and_then(parse_length);
    if let (Some(width), Some(height)) = (width, height) {
        return Dimensions { width, height };
    }

    if let Some(view_box) = attribute(tag, "viewBox") {
        let parts: Vec<f64> = view_box
            .split_whitespace()
            .filter_map(|p| p.parse().ok())
            .collect();
        if parts.len() == 4 && parts[2] > 0.0 && parts[3] > 0.0 {
            return Dimensions {
                width: parts[2].round() as u32,
                height: parts[3].round() as u32,
            };
        }
    }

    Dimensions { width: 0, height: 0 }
}

/// The attribute region of the root `<svg ...>` tag.
fn svg_root_tag(text: &str) -> Option<&str> {
    let start = text.find("<svg")?;
    let rest = &text[start..];
    let end = rest.find('>')?;
    Some(&rest[..end])
}

/// Look up an attribute value inside a tag, handling both quote styles.
/// The name must start at a token boundary so that `width` does not match
/// inside `stroke-width`.
fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    for quote in ['"', '\''] {
        let needle = format!("{}={}", name, quote);
        let mut search = 0;
        while let Some(pos) = tag[search..].find(&needle) {
            let abs = search + pos;
            let at_boundary = tag[..abs]
                .chars()
                .last()
                .map_or(true, |c| c.is_whitespace());
            if at_boundary {
                let value = &tag[abs + needle.len()..];
                let end = value.find(quote)?;
                return Some(&value[..end]);
            }
            search = abs + needle.len();
        }
    }
    None
}

/// Parse an SVG length, tolerating a `px` suffix. Percentages and other units
/// carry no intrinsic pixel size and are rejected.
fn parse_length(value: &str) -> Option<u32> {
    let trimmed = value.trim().trim_end_matches("px");
    let parsed: f64 = trimmed.parse().ok()?;
    (parsed > 0.0).then(|| parsed.round() as u32)
}
