//! # Source File Module
//!
//! Immutable source blobs selected by the user, plus CLI-side discovery.
//!
//! ## Responsibilities:
//! - `SourceFile`: filename + declared media type + byte blob
//! - Loading a source from disk
//! - Recursive discovery of image files under a directory
//!
//! Sources are retained for the lifetime of a session: a settings change
//! followed by a re-run re-derives results from these originals, never from a
//! previous run's compressed outputs.

use crate::error::CompressError;
use crate::media::MediaType;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// One selected input file, retained for the session.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub media_type: MediaType,
    pub bytes: Arc<[u8]>,
}

impl SourceFile {
    /// Create a source from in-memory bytes, deriving the media type from the
    /// filename.
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let media_type = MediaType::from_filename(&name);
        Self {
            name,
            media_type,
            bytes: bytes.into(),
        }
    }

    /// Read a source file from disk.
    pub async fn from_path(path: &Path) -> Result<Self, CompressError> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Whether the declared media type is an image type (raster or vector).
    pub fn is_image(&self) -> bool {
        self.media_type.is_image()
    }
}

/// Find all image files under a path, recursing into directories.
pub fn find_image_files(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }

    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| MediaType::from_filename(&e.file_name().to_string_lossy()).is_image())
        .map(|e| e.path().to_path_buf())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_source_media_type_from_name() {
        let source = SourceFile::new("photo.jpg", b"fake".to_vec());
        assert_eq!(source.media_type, MediaType::Jpeg);
        assert!(source.is_image());
        assert_eq!(source.size(), 4);

        let other = SourceFile::new("notes.txt", b"text".to_vec());
        assert!(!other.is_image());
    }

    #[tokio::test]
    async fn test_source_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logo.svg");
        tokio::fs::write(&path, b"<svg/>").await.unwrap();

        let source = SourceFile::from_path(&path).await.unwrap();
        assert_eq!(source.name, "logo.svg");
        assert_eq!(source.media_type, MediaType::Svg);
        assert_eq!(source.bytes.as_ref(), b"<svg/>");
    }

    #[test]
    fn test_find_image_files() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(temp_dir.path().join("a.png"), b"png").unwrap();
        std::fs::write(nested.join("b.jpg"), b"jpg").unwrap();
        std::fs::write(nested.join("skip.txt"), b"txt").unwrap();

        let mut found = find_image_files(temp_dir.path());
        found.sort();
        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("a.png"));
        assert!(found[1].ends_with("b.jpg"));
    }
}
