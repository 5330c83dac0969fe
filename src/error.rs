//! # Error Types Module
//!
//! Custom error types for the compression pipeline and its capabilities.
//!
//! ## Categories:
//! - `CodecError`: decode/encode failures reported by the codec capability and
//!   the dimension prober, without file context
//! - `CompressError`: run-level errors, tagged with the offending filename where
//!   one exists, surfaced at the pipeline/session boundary
//!
//! Batch-run failures abort the in-flight run (fail-fast); export failures are
//! reported without touching the retained result set.

/// Errors reported by the codec capability and the dimension prober.
#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("decode failed: {0}")]
    Decode(String),

    #[error("encode failed: {0}")]
    Encode(String),
}

/// Run-level errors for batch compression and export.
#[derive(thiserror::Error, Debug)]
pub enum CompressError {
    /// The selection contained no files with an image media type.
    #[error("no image files in the selection")]
    InvalidSelection,

    #[error("failed to decode {name}: {reason}")]
    Decode { name: String, reason: String },

    #[error("failed to encode {name}: {reason}")]
    Encode { name: String, reason: String },

    #[error("export failed: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings: {0}")]
    Validation(String),
}

impl CompressError {
    /// Tag a codec-level error with the filename it occurred on.
    pub fn from_codec(name: &str, err: CodecError) -> Self {
        match err {
            CodecError::Decode(reason) => Self::Decode {
                name: name.to_string(),
                reason,
            },
            CodecError::Encode(reason) => Self::Encode {
                name: name.to_string(),
                reason,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_tagging() {
        let err = CompressError::from_codec("photo.jpg", CodecError::Decode("bad header".into()));
        assert!(matches!(err, CompressError::Decode { ref name, .. } if name == "photo.jpg"));
        assert_eq!(err.to_string(), "failed to decode photo.jpg: bad header");

        let err = CompressError::from_codec("photo.jpg", CodecError::Encode("oom".into()));
        assert!(matches!(err, CompressError::Encode { .. }));
    }
}
